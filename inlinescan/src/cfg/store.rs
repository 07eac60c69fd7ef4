use rustc_hash::FxHashMap;

use super::BlockDef;

/// In-memory CFG of one function, keyed by block id.
///
/// Iteration order over [`CfgStore::blocks`] is insertion order, which
/// frontends keep equal to ascending block id. The store is the sole owner
/// of its blocks; edges reference blocks by id only.
#[derive(Debug, Default, Clone)]
pub struct CfgStore {
    blocks: Vec<BlockDef>,
    index: FxHashMap<u32, usize>,
}

impl CfgStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block. A second insert with an already-present id is ignored.
    pub fn insert(&mut self, block: BlockDef) {
        if self.index.contains_key(&block.id) {
            return;
        }
        self.index.insert(block.id, self.blocks.len());
        self.blocks.push(block);
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the store holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&BlockDef> {
        self.index.get(&id).map(|&i| &self.blocks[i])
    }

    /// Mutable block by id.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut BlockDef> {
        self.index.get(&id).map(|&i| &mut self.blocks[i])
    }

    /// All blocks in insertion order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockDef] {
        &self.blocks
    }

    /// Successor ids of `id`, empty for unknown blocks.
    #[must_use]
    pub fn succs_of(&self, id: u32) -> &[u32] {
        self.get(id).map_or(&[], |b| &b.succs)
    }

    /// Predecessor ids of `id`, empty for unknown blocks.
    #[must_use]
    pub fn preds_of(&self, id: u32) -> &[u32] {
        self.get(id).map_or(&[], |b| &b.preds)
    }

    /// Link `from -> to`, maintaining both edge lists. Duplicate edges and
    /// edges naming unknown blocks are ignored.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        if !self.index.contains_key(&from) || !self.index.contains_key(&to) {
            return;
        }
        if let Some(block) = self.get_mut(from) {
            if !block.succs.contains(&to) {
                block.succs.push(to);
            }
        }
        if let Some(block) = self.get_mut(to) {
            if !block.preds.contains(&from) {
                block.preds.push(from);
            }
        }
    }

    /// The unique block containing `addr`, if any. Linear scan; block counts
    /// per function are small.
    #[must_use]
    pub fn find_by_addr(&self, addr: u64) -> Option<&BlockDef> {
        self.blocks.iter().find(|b| b.contains(addr))
    }
}
