use super::*;

fn block(id: u32, start: u64, end: u64) -> BlockDef {
    BlockDef {
        id,
        start,
        end,
        ..BlockDef::default()
    }
}

#[test]
fn insert_is_idempotent_by_id() {
    let mut store = CfgStore::new();
    store.insert(block(0, 0x100, 0x110));
    store.insert(block(0, 0x999, 0x9999));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).map(|b| b.start), Some(0x100));
}

#[test]
fn edges_stay_bidirectional() {
    let mut store = CfgStore::new();
    store.insert(block(0, 0x100, 0x110));
    store.insert(block(1, 0x110, 0x120));
    store.add_edge(0, 1);
    store.add_edge(0, 1);

    assert_eq!(store.succs_of(0), &[1]);
    assert_eq!(store.preds_of(1), &[0]);
    // every succ edge has its mirror pred edge
    for b in store.blocks() {
        for &s in &b.succs {
            assert!(store.preds_of(s).contains(&b.id));
        }
        for &p in &b.preds {
            assert!(store.succs_of(p).contains(&b.id));
        }
    }
}

#[test]
fn edge_to_unknown_block_is_ignored() {
    let mut store = CfgStore::new();
    store.insert(block(0, 0x100, 0x110));
    store.add_edge(0, 7);
    assert!(store.succs_of(0).is_empty());
}

#[test]
fn find_by_addr_returns_containing_block() {
    let mut store = CfgStore::new();
    store.insert(block(0, 0x100, 0x110));
    store.insert(block(1, 0x110, 0x120));

    assert_eq!(store.find_by_addr(0x100).map(|b| b.id), Some(0));
    assert_eq!(store.find_by_addr(0x10f).map(|b| b.id), Some(0));
    assert_eq!(store.find_by_addr(0x110).map(|b| b.id), Some(1));
    assert!(store.find_by_addr(0x120).is_none());
}

#[test]
fn blocks_iterate_in_insertion_order() {
    let mut store = CfgStore::new();
    for id in 0..5 {
        store.insert(block(id, u64::from(id) * 0x10, u64::from(id) * 0x10 + 0x10));
    }
    let ids: Vec<u32> = store.blocks().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}
