use super::SubgraphMatcher;

impl SubgraphMatcher<'_> {
    /// Index normalized buckets by the length of their first path.
    pub(crate) fn sort_by_path_len(&mut self) {
        for (seed, buckets) in &self.path_per_node_hash {
            for (signature, paths) in buckets {
                if let Some(first) = paths.first() {
                    self.size_index
                        .entry(first.len())
                        .or_default()
                        .push((seed.clone(), signature.clone()));
                }
            }
        }
    }

    /// Whether any interior node of `subgraph` has a predecessor outside it.
    fn has_external_jumps(&self, subgraph: &[u32]) -> bool {
        subgraph.iter().skip(1).any(|&node| {
            self.cfg
                .preds_of(node)
                .iter()
                .any(|pred| !subgraph.contains(pred))
        })
    }

    fn address_in_subgraph(&self, addr: u64, subgraph: &[u32]) -> bool {
        subgraph
            .iter()
            .filter_map(|&id| self.cfg.get(id))
            .any(|block| block.contains(addr))
    }

    /// The first four 2-byte slots of the head block must fall inside the
    /// subgraph for it to count as a function head.
    fn head_big_enough(&self, path: &[u32]) -> bool {
        let Some(start) = path.first().and_then(|&id| self.cfg.get(id)).map(|b| b.start) else {
            return false;
        };
        (start..start + 8).step_by(2).all(|addr| self.address_in_subgraph(addr, path))
    }

    /// Keep only the well-formed classes, largest first.
    ///
    /// Classes whose representative path has external jumps into interior
    /// nodes are dropped whole. Within a surviving class, a path already
    /// contained in a kept larger subgraph is suppressed; classes left with
    /// fewer than two occurrences are discarded, as are classes failing the
    /// optional head-size probe.
    pub(crate) fn well_formed_filter(&mut self) {
        let min_blocks = self.config.min_function_size_in_blocks;
        let min_head = self.config.min_function_head_size;
        let mut moved: Vec<Vec<u32>> = Vec::new();

        let sizes: Vec<usize> = self.size_index.keys().rev().copied().collect();
        for size in sizes {
            if size < min_blocks {
                break;
            }
            let entries = self.size_index.get(&size).cloned().unwrap_or_default();
            for (seed, signature) in entries {
                self.normalized
                    .entry(seed.clone())
                    .or_default()
                    .entry(signature.clone())
                    .or_default();

                let Some(paths) = self
                    .path_per_node_hash
                    .get(&seed)
                    .and_then(|buckets| buckets.get(&signature))
                else {
                    continue;
                };
                let Some(first) = paths.first() else {
                    continue;
                };
                if self.has_external_jumps(first) {
                    continue;
                }

                let mut kept: Vec<Vec<u32>> = Vec::new();
                for path in paths {
                    let subsumed = moved
                        .iter()
                        .any(|larger| path.iter().all(|node| larger.contains(node)));
                    if !subsumed {
                        kept.push(path.clone());
                    }
                }

                if kept.len() < 2 {
                    kept.clear();
                } else if min_head > 0 && !kept.first().is_some_and(|p| self.head_big_enough(p)) {
                    kept.clear();
                }

                moved.extend(kept.iter().cloned());
                if let Some(bucket) = self
                    .normalized
                    .get_mut(&seed)
                    .and_then(|buckets| buckets.get_mut(&signature))
                {
                    *bucket = kept;
                }
            }
        }
    }
}
