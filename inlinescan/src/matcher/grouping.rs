use crate::fingerprint::{
    block_frequency, coverage_threshold, intersection_fingerprint, match_block_frequencies,
    FingerprintKind,
};

use super::SubgraphMatcher;

impl SubgraphMatcher<'_> {
    /// Compare two blocks under the chosen fingerprint.
    ///
    /// `Itype1`/`Itype2` compare the precomputed context hashes. `Freq`
    /// recomputes both frequency fingerprints, applies the size-scaled
    /// coverage threshold plus the configured per-bucket ratio, and on
    /// success binds the same synthetic fingerprint to both blocks so the
    /// caller can read it back like any other hash.
    pub(crate) fn match_blocks(&mut self, id1: u32, id2: u32, kind: FingerprintKind) -> bool {
        let (Some(b1), Some(b2)) = (self.cfg.get(id1), self.cfg.get(id2)) else {
            return false;
        };
        match kind {
            FingerprintKind::Itype1 | FingerprintKind::Itype2 => {
                match (b1.fingerprint(kind), b2.fingerprint(kind)) {
                    (Some(h1), Some(h2)) => h1 == h2,
                    _ => false,
                }
            }
            FingerprintKind::Freq => {
                let f1 = block_frequency(self.decoder, self.primes, b1.start, b1.end);
                let f2 = block_frequency(self.decoder, self.primes, b2.start, b2.end);
                let coverage = coverage_threshold(f1.total, f2.total);
                let (ok1, ok2) = match_block_frequencies(
                    &f1,
                    &f2,
                    coverage,
                    self.config.frequency_ratio_threshold,
                );
                if !(ok1 && ok2) {
                    return false;
                }
                let bound = intersection_fingerprint(&f1, &f2);
                for id in [id1, id2] {
                    if let Some(ctx) = self.cfg.get_mut(id).and_then(|b| b.ctx.as_mut()) {
                        ctx.freq_hash = Some(bound.clone());
                    }
                }
                true
            }
        }
    }

    /// Bucket all blocks by the chosen fingerprint.
    ///
    /// Walks ordered pairs `(i, j)` with `i < j` in block order and records
    /// both ids under the shared fingerprint, preserving first-appearance
    /// order and skipping duplicates. Quadratic in the block count, which is
    /// small per function.
    pub(crate) fn hash_bb_match(&mut self, kind: FingerprintKind) {
        let count = self.cfg.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let id_i = self.cfg.blocks()[i].id;
                let id_j = self.cfg.blocks()[j].id;
                if !self.match_blocks(id_i, id_j, kind) {
                    continue;
                }
                let Some(key) = self
                    .cfg
                    .get(id_i)
                    .and_then(|b| b.fingerprint(kind))
                    .map(str::to_owned)
                else {
                    continue;
                };
                if let Some(group) = self.m.get_mut(&key) {
                    if !group.contains(&id_j) {
                        group.push(id_j);
                    }
                } else {
                    self.m.insert(key, vec![id_i, id_j]);
                }
            }
        }
    }
}
