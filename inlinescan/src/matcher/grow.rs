use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::fingerprint::{sha1_hex, FingerprintKind};

use super::{MatchError, PathStore, SubgraphMatcher};

/// Signature of a matched subgraph: SHA-1 over the concatenated per-node
/// fingerprints in path order.
fn subgraph_signature(path: &[u32], node_hashes: &FxHashMap<u32, String>) -> String {
    let mut concat = String::new();
    for id in path {
        if let Some(h) = node_hashes.get(id) {
            concat.push_str(h);
        }
    }
    sha1_hex(concat.as_bytes())
}

/// Append `path1` and `path2` to the bucket, each only if not already
/// present as an exact list.
fn record_paths(store: &mut PathStore, seed: &str, signature: &str, path1: &[u32], path2: &[u32]) {
    let bucket = store
        .entry(seed.to_owned())
        .or_default()
        .entry(signature.to_owned())
        .or_default();
    for path in [path1, path2] {
        if !bucket.iter().any(|existing| existing == path) {
            bucket.push(path.to_vec());
        }
    }
}

impl SubgraphMatcher<'_> {
    /// Grow a matched subgraph pair from every ordered seed pair that shares
    /// a fingerprint.
    pub(crate) fn find_subgraphs(&mut self) -> Result<(), MatchError> {
        let seeds: Vec<(String, Vec<u32>)> = self
            .m
            .iter()
            .map(|(h, ids)| (h.clone(), ids.clone()))
            .collect();
        for (seed_hash, group) in seeds {
            for z in 0..group.len().saturating_sub(1) {
                for &other in &group[z + 1..] {
                    self.grow_pair(&seed_hash, group[z], other)?;
                }
            }
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }
        Ok(())
    }

    /// Coupled BFS from the seed pair `(a, b)`.
    ///
    /// Each newly visited successor on side A is paired with the first
    /// not-yet-paired successor on side B that matches under the prioritized
    /// fallback itype1 -> itype2 -> freq. The scratch set of side-B
    /// candidates examined by a trial is restored to its pre-trial state
    /// before each fallback trial, so every trial sees the same search
    /// space; whatever the last trial examined is folded into `visited2`
    /// once the successor list is exhausted.
    fn grow_pair(&mut self, seed_hash: &str, a: u32, b: u32) -> Result<(), MatchError> {
        let mut visited1: FxHashSet<u32> = FxHashSet::default();
        let mut visited2: FxHashSet<u32> = FxHashSet::default();
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
        let mut path1 = vec![a];
        let mut path2 = vec![b];
        let mut node_hashes: FxHashMap<u32, String> = FxHashMap::default();

        if let Some(h) = self
            .cfg
            .get(a)
            .and_then(|blk| blk.fingerprint(FingerprintKind::Itype2))
        {
            node_hashes.insert(a, h.to_owned());
        }
        queue.push_back((a, b));

        while let Some((x, y)) = queue.pop_front() {
            let mut scratch2: FxHashSet<u32> = FxHashSet::default();
            let succs1: Vec<u32> = self.cfg.succs_of(x).to_vec();
            for l in succs1 {
                if visited1.contains(&l) || l == x || path1.contains(&l) {
                    continue;
                }
                visited1.insert(l);

                let snapshot = scratch2.clone();
                let mut kind = FingerprintKind::Itype1;
                let mut found = self.find_match_in_succs(l, y, kind, &visited2, &mut scratch2, &path2);
                if found.is_none() {
                    kind = FingerprintKind::Itype2;
                    scratch2.clone_from(&snapshot);
                    found = self.find_match_in_succs(l, y, kind, &visited2, &mut scratch2, &path2);
                }
                if found.is_none() {
                    kind = FingerprintKind::Freq;
                    scratch2.clone_from(&snapshot);
                    found = self.find_match_in_succs(l, y, kind, &visited2, &mut scratch2, &path2);
                }

                if let Some(m) = found {
                    if let Some(h) = self.cfg.get(l).and_then(|blk| blk.fingerprint(kind)) {
                        node_hashes.insert(l, h.to_owned());
                    }
                    path1.push(l);
                    path2.push(m);
                    queue.push_back((l, m));
                    visited2.insert(m);
                }
            }
            visited2.extend(scratch2);
        }

        if path1.len() != path2.len() {
            self.mismatched_lengths += 1;
            return Ok(());
        }
        if path1.len() > 1 {
            let signature = subgraph_signature(&path1, &node_hashes);
            record_paths(
                &mut self.path_per_node_hash_full,
                seed_hash,
                &signature,
                &path1,
                &path2,
            );

            let (trimmed1, trimmed2) = self.make_single_entry(&path1, &path2)?;
            if trimmed1.len() > 1 {
                let signature = subgraph_signature(&trimmed1, &node_hashes);
                record_paths(
                    &mut self.path_per_node_hash,
                    seed_hash,
                    &signature,
                    &trimmed1,
                    &trimmed2,
                );
            }
        }
        Ok(())
    }

    /// First successor of `parent2` that is unclaimed on side B and matches
    /// `node1` under `kind`. Every candidate examined lands in `scratch2`.
    fn find_match_in_succs(
        &mut self,
        node1: u32,
        parent2: u32,
        kind: FingerprintKind,
        visited2: &FxHashSet<u32>,
        scratch2: &mut FxHashSet<u32>,
        path2: &[u32],
    ) -> Option<u32> {
        let succs: Vec<u32> = self.cfg.succs_of(parent2).to_vec();
        for m in succs {
            if visited2.contains(&m) || m == parent2 || path2.contains(&m) {
                continue;
            }
            scratch2.insert(m);
            if self.match_blocks(node1, m, kind) {
                if node1 == m {
                    continue;
                }
                return Some(m);
            }
        }
        None
    }
}
