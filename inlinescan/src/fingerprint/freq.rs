use std::collections::BTreeMap;

use num_bigint::BigUint;

/// Order-insensitive fingerprint of a block: instruction count plus a
/// histogram keyed by prime characteristic.
///
/// `total` may exceed the histogram sum when decoding aborted mid-block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFrequency {
    /// Total decoded instructions.
    pub total: u32,
    /// Characteristic -> occurrence count.
    pub histogram: BTreeMap<BigUint, u32>,
}

impl BlockFrequency {
    /// Number of distinct characteristics.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.histogram.len()
    }
}

/// Coverage threshold for the frequency fallback, scaled down for small
/// blocks where a few instructions dominate the histogram.
#[must_use]
pub const fn coverage_threshold(t1: u32, t2: u32) -> f64 {
    let min = if t1 < t2 { t1 } else { t2 };
    if min <= 4 {
        50.0
    } else if min <= 6 {
        60.0
    } else if min <= 8 {
        75.0
    } else {
        85.0
    }
}

/// Compare two frequency fingerprints under two thresholds.
///
/// `ok1` requires the common characteristics to cover strictly more than
/// `p1` percent of both blocks' instructions. `ok2` requires the average
/// per-bucket count ratio over the common characteristics to strictly exceed
/// `p2` percent. Both comparisons are strict; a zero total on either side
/// fails the coverage check.
#[must_use]
pub fn match_block_frequencies(
    ft1: &BlockFrequency,
    ft2: &BlockFrequency,
    p1: f64,
    p2: f64,
) -> (bool, bool) {
    // Walk the smaller-keyed histogram looking for common characteristics.
    let (fs, fb) = if ft1.histogram.len() > ft2.histogram.len() {
        (&ft2.histogram, &ft1.histogram)
    } else {
        (&ft1.histogram, &ft2.histogram)
    };

    let mut tp = 0.0f64;
    let mut comm_count = 0u32;
    let mut ct1 = 0u32;
    let mut ct2 = 0u32;

    for (key, &v1) in fs {
        let Some(&v2) = fb.get(key) else {
            continue;
        };
        comm_count += 1;
        ct1 += v1;
        ct2 += v2;
        tp += f64::from(v1.min(v2) * 100) / f64::from(v1.max(v2));
    }

    let ok1 = if ft1.total == 0 || ft2.total == 0 {
        false
    } else {
        let cp1 = f64::from(100 * ct1) / f64::from(ft1.total);
        let cp2 = f64::from(100 * ct2) / f64::from(ft2.total);
        cp1 > p1 && cp2 > p1
    };

    let ok2 = if comm_count == 0 {
        false
    } else {
        tp / f64::from(comm_count) > p2
    };

    (ok1, ok2)
}
