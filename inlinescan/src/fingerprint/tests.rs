use std::collections::BTreeMap;

use num_bigint::BigUint;

use super::*;
use crate::decode::{DecodedInsn, OperandSlot, TableDecoder};
use crate::primes::{shared_primes, PrimeTable};

fn insn(itype: u32, ops: &[(u8, u8)], size: u32) -> DecodedInsn {
    DecodedInsn {
        itype,
        operands: ops
            .iter()
            .map(|&(index, kind)| OperandSlot { index, kind })
            .collect(),
        size,
    }
}

fn straight_line(itypes: &[u32]) -> (TableDecoder, u64, u64) {
    let mut table = TableDecoder::new();
    let start = 0x1000u64;
    let mut addr = start;
    for &t in itypes {
        table.insert(addr, insn(t, &[(0, 1)], 2));
        addr += 2;
    }
    (table, start, addr)
}

#[test]
fn empty_range_hashes() {
    let table = TableDecoder::new();
    let primes = shared_primes();
    assert_eq!(
        hash_itype1(&table, 0x1000, 0x1000),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
    assert_eq!(
        hash_itype2(&table, primes, 0x1000, 0x1000),
        "356a192b7913b04c54574d18c28d46e6395428ab"
    );
    let freq = block_frequency(&table, primes, 0x1000, 0x1000);
    assert_eq!(freq.total, 0);
    assert!(freq.histogram.is_empty());
}

#[test]
fn itype1_is_the_digest_of_the_decimal_sequence() {
    let (table, start, end) = straight_line(&[16, 16, 42]);
    // sha1("161642")
    assert_eq!(
        hash_itype1(&table, start, end),
        "b197a88a5602148f4bedef461a57c81417c6bc2e"
    );
}

#[test]
fn fingerprints_are_deterministic() {
    let (table, start, end) = straight_line(&[7, 9, 7]);
    let primes = shared_primes();
    assert_eq!(hash_itype1(&table, start, end), hash_itype1(&table, start, end));
    assert_eq!(
        hash_itype2(&table, primes, start, end),
        hash_itype2(&table, primes, start, end)
    );
}

#[test]
fn itype2_distinguishes_operand_kinds() {
    let primes = shared_primes();
    let mut a = TableDecoder::new();
    a.insert(0x0, insn(5, &[(0, 1)], 2));
    let mut b = TableDecoder::new();
    b.insert(0x0, insn(5, &[(0, 2)], 2));
    assert_eq!(hash_itype1(&a, 0, 2), hash_itype1(&b, 0, 2));
    assert_ne!(hash_itype2(&a, primes, 0, 2), hash_itype2(&b, primes, 0, 2));
}

#[test]
fn reordered_blocks_share_frequency_but_not_sequence() {
    let primes = shared_primes();
    let (a, sa, ea) = straight_line(&[3, 4, 5]);
    let (b, sb, eb) = straight_line(&[5, 3, 4]);
    assert_ne!(hash_itype1(&a, sa, ea), hash_itype1(&b, sb, eb));
    let fa = block_frequency(&a, primes, sa, ea);
    let fb = block_frequency(&b, primes, sb, eb);
    assert_eq!(fa.histogram, fb.histogram);
    assert_eq!(fa.total, 3);
}

#[test]
fn decode_failure_truncates_all_fingerprints() {
    let primes = shared_primes();
    let mut table = TableDecoder::new();
    table.insert(0x1000, insn(1, &[], 2));
    // hole at 0x1002, then more instructions that must be ignored
    table.insert(0x1004, insn(2, &[], 2));

    assert_eq!(
        hash_itype1(&table, 0x1000, 0x1006),
        hash_itype1(&table, 0x1000, 0x1002)
    );
    assert_eq!(instruction_count(&table, 0x1000, 0x1006), 1);
    assert_eq!(block_frequency(&table, primes, 0x1000, 0x1006).total, 1);
}

#[test]
fn prime_characteristic_multiplies_operand_slots() {
    let primes = PrimeTable::with_count(crate::primes::MAX_PRIMES);
    let plain = insn(3, &[], 1);
    let with_op = insn(3, &[(1, 4)], 1);
    let base = prime_characteristic(&plain, &primes);
    let combined = prime_characteristic(&with_op, &primes);
    assert_eq!(base, BigUint::from(primes[3]));
    assert!(combined > base);
    assert_eq!(combined.clone() % base, BigUint::from(0u32));
}

fn freq(total: u32, pairs: &[(u64, u32)]) -> BlockFrequency {
    let histogram: BTreeMap<BigUint, u32> = pairs
        .iter()
        .map(|&(k, v)| (BigUint::from(k), v))
        .collect();
    BlockFrequency { total, histogram }
}

#[test]
fn near_identical_histograms_fail_on_bucket_ratio() {
    // One shared characteristic occurs 5x on one side and 1x on the other:
    // full coverage on both sides, but the average bucket ratio collapses.
    let ft1 = freq(7, &[(21_614_129, 5), (4_790_013_691_321, 1), (722_682_555_311, 1)]);
    let ft2 = freq(3, &[(21_614_129, 1), (4_790_013_691_321, 1), (722_682_555_311, 1)]);
    let (ok1, ok2) = match_block_frequencies(&ft1, &ft2, 90.0, 90.0);
    assert!(ok1);
    assert!(!ok2);
}

#[test]
fn empty_intersection_fails_both_checks() {
    let ft1 = freq(2, &[(11, 2)]);
    let ft2 = freq(2, &[(13, 2)]);
    let (ok1, ok2) = match_block_frequencies(&ft1, &ft2, 10.0, 10.0);
    assert!(!ok1);
    assert!(!ok2);
}

#[test]
fn zero_total_fails_coverage() {
    let ft1 = freq(0, &[]);
    let ft2 = freq(3, &[(11, 3)]);
    let (ok1, _) = match_block_frequencies(&ft1, &ft2, 0.0, 0.0);
    assert!(!ok1);
}

#[test]
fn identical_histograms_pass_both_checks() {
    let ft1 = freq(4, &[(11, 2), (13, 2)]);
    let ft2 = ft1.clone();
    let (ok1, ok2) = match_block_frequencies(&ft1, &ft2, 90.0, 90.0);
    assert!(ok1);
    assert!(ok2);
}

#[test]
fn coverage_threshold_ladder() {
    assert!((coverage_threshold(3, 100) - 50.0).abs() < f64::EPSILON);
    assert!((coverage_threshold(100, 5) - 60.0).abs() < f64::EPSILON);
    assert!((coverage_threshold(7, 8) - 75.0).abs() < f64::EPSILON);
    assert!((coverage_threshold(9, 20) - 85.0).abs() < f64::EPSILON);
}

#[test]
fn intersection_fingerprint_is_order_insensitive() {
    let a = freq(3, &[(11, 1), (13, 1), (17, 1)]);
    let b = freq(3, &[(13, 2), (11, 1)]);
    let c = freq(3, &[(11, 4), (13, 4)]);
    assert_eq!(intersection_fingerprint(&a, &b), intersection_fingerprint(&b, &c));
}
