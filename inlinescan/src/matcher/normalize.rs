use super::{MatchError, SubgraphMatcher};

impl SubgraphMatcher<'_> {
    /// Trim a matched pair down to its single-entry variant.
    ///
    /// Repeatedly removes the first index whose node on either side is
    /// non-head and has a CFG predecessor outside its own path, until a
    /// fixed point. Removing an index drops the paired node from both paths,
    /// so at exit every surviving non-head node of either path has all of
    /// its predecessors inside that path.
    pub(crate) fn make_single_entry(
        &self,
        path1: &[u32],
        path2: &[u32],
    ) -> Result<(Vec<u32>, Vec<u32>), MatchError> {
        if path1.len() != path2.len() {
            return Err(MatchError::LengthMismatch {
                left: path1.len(),
                right: path2.len(),
            });
        }

        let mut trimmed1 = path1.to_vec();
        let mut trimmed2 = path2.to_vec();
        loop {
            let leaks = |path: &[u32], idx: usize| {
                self.cfg
                    .preds_of(path[idx])
                    .iter()
                    .any(|pred| !path.contains(pred))
            };
            let leaking = (1..trimmed1.len())
                .find(|&idx| leaks(&trimmed1, idx) || leaks(&trimmed2, idx));
            match leaking {
                Some(idx) => {
                    trimmed1.remove(idx);
                    trimmed2.remove(idx);
                }
                None => break,
            }
        }
        Ok((trimmed1, trimmed2))
    }
}
