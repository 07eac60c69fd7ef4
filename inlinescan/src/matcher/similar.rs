use rustc_hash::FxHashSet;

use super::SubgraphMatcher;

impl SubgraphMatcher<'_> {
    /// All other subgraphs matched with one containing `node_list`.
    ///
    /// A single node queries its raw equivalence group. For larger sets, the
    /// recorded full matches are scanned for one that starts at a node of
    /// `node_list` and contains the whole set; the aligned subset is then
    /// extracted from every sibling path of that bucket. Returns an empty
    /// list when no containing match exists.
    #[must_use]
    pub fn find_similar(&self, node_list: &[u32]) -> Vec<Vec<u32>> {
        let Some(&first) = node_list.first() else {
            return Vec::new();
        };
        if node_list.len() == 1 {
            let Some(hashes) = self.node_hashes.get(&first) else {
                return Vec::new();
            };
            return self
                .m
                .get(&hashes.itype2)
                .map(|group| group.iter().map(|&id| vec![id]).collect())
                .unwrap_or_default();
        }

        let wanted: FxHashSet<u32> = node_list.iter().copied().collect();
        for &head in node_list {
            let Some(hashes) = self.node_hashes.get(&head) else {
                continue;
            };
            let Some(buckets) = self.path_per_node_hash_full.get(&hashes.itype2) else {
                continue;
            };
            let mut result: Vec<Vec<u32>> = Vec::new();
            for paths in buckets.values() {
                let Some(representative) = paths.first() else {
                    continue;
                };
                if node_list.len() > representative.len() {
                    continue;
                }
                let containing = paths.iter().find(|path| {
                    path.first() == Some(&head) && wanted.iter().all(|n| path.contains(n))
                });
                let Some(containing) = containing else {
                    continue;
                };
                // Indices the queried nodes occupy in the containing match.
                let positions: Vec<usize> = node_list
                    .iter()
                    .filter_map(|n| containing.iter().position(|v| v == n))
                    .collect();
                if positions.len() != node_list.len() {
                    continue;
                }
                for sibling in paths {
                    let subset: Vec<u32> = positions
                        .iter()
                        .filter_map(|&i| sibling.get(i).copied())
                        .collect();
                    if subset.len() == positions.len() && !result.contains(&subset) {
                        result.push(subset);
                    }
                }
            }
            if !result.is_empty() {
                return result;
            }
        }
        Vec::new()
    }
}
