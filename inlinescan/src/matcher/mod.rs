//! Repeated-subgraph matching inside one function's CFG.
//!
//! A [`SubgraphMatcher`] is bound to a single function at construction. It
//! fingerprints every block, groups blocks that share a fingerprint, grows
//! each seed pair into a matched subgraph pair with a coupled BFS, and keeps
//! only the well-formed classes: single entry, no external jumps into
//! interior nodes, at least the configured number of blocks, at least two
//! occurrences.
//!
//! `analyze` is one-shot; distinct functions get distinct matcher instances
//! and can run in parallel without shared mutable state.

mod errors;
mod grouping;
mod grow;
mod normalize;
mod similar;
mod state;
mod wellformed;

pub use errors::{MatchError, StateError};

use std::collections::BTreeMap;
use std::sync::Arc;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use crate::cfg::{BlockContext, BlockDef, CfgSource, CfgStore};
use crate::config::MatcherConfig;
use crate::decode::InsnDecoder;
use crate::fingerprint::{hash_itype1, hash_itype2, instruction_count};
use crate::primes::PrimeTable;

/// Two-level store of matched node-id paths:
/// seed fingerprint -> subgraph signature -> literal paths.
pub type PathStore = BTreeMap<String, BTreeMap<String, Vec<Vec<u32>>>>;

/// Per-node fingerprints recorded at analyze time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFingerprints {
    /// Instruction-type sequence hash.
    pub itype1: String,
    /// Prime-characteristic product hash.
    pub itype2: String,
}

/// One reported class of repeated subgraphs.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedClass {
    /// Fingerprint shared by the seed blocks.
    pub seed_hash: String,
    /// Signature of the matched subgraph shape.
    pub subgraph_hash: String,
    /// The matched node-id paths, head first, BFS order.
    pub paths: Vec<Vec<u32>>,
}

/// Matcher for the repeated control-flow subgraphs of one function.
pub struct SubgraphMatcher<'a> {
    pub(crate) decoder: &'a dyn InsnDecoder,
    pub(crate) primes: &'a PrimeTable,
    pub(crate) config: MatcherConfig,
    pub(crate) cfg: CfgStore,
    /// Fingerprint -> block ids sharing it, in first-appearance order.
    pub(crate) m: BTreeMap<String, Vec<u32>>,
    /// Single-entry-normalized matched paths.
    pub(crate) path_per_node_hash: PathStore,
    /// Every matched path pair, regardless of external entries.
    pub(crate) path_per_node_hash_full: PathStore,
    /// Classes surviving the well-formedness filter.
    pub(crate) normalized: PathStore,
    /// Path length -> (seed, signature) pairs, for size-descending filtering.
    pub(crate) size_index: BTreeMap<usize, Vec<(String, String)>>,
    pub(crate) node_hashes: BTreeMap<u32, NodeFingerprints>,
    pub(crate) mismatched_lengths: u32,
    /// Progress bar shared with the caller, if any.
    pub progress: Option<Arc<ProgressBar>>,
}

impl<'a> SubgraphMatcher<'a> {
    /// Build a matcher over an already-populated CFG store.
    #[must_use]
    pub fn new(
        decoder: &'a dyn InsnDecoder,
        primes: &'a PrimeTable,
        cfg: CfgStore,
        config: MatcherConfig,
    ) -> Self {
        Self {
            decoder,
            primes,
            config,
            cfg,
            m: BTreeMap::new(),
            path_per_node_hash: PathStore::new(),
            path_per_node_hash_full: PathStore::new(),
            normalized: PathStore::new(),
            size_index: BTreeMap::new(),
            node_hashes: BTreeMap::new(),
            mismatched_lengths: 0,
            progress: None,
        }
    }

    /// Build the CFG of the function at `entry` from `source`, fingerprint
    /// every block, and bind the matcher to the result.
    ///
    /// Frontend failures are propagated as-is; no partial graph is kept.
    pub fn from_source(
        decoder: &'a dyn InsnDecoder,
        primes: &'a PrimeTable,
        source: &dyn CfgSource,
        entry: u64,
        config: MatcherConfig,
    ) -> Result<Self, MatchError> {
        let mut raw = source.build_cfg(entry)?;
        raw.sort_by_key(|b| b.id);

        let mut cfg = CfgStore::new();
        for block in &raw {
            let ctx = BlockContext {
                bytes: block.bytes.clone(),
                hash_itype1: hash_itype1(decoder, block.start, block.end),
                hash_itype2: hash_itype2(decoder, primes, block.start, block.end),
                inst_count: instruction_count(decoder, block.start, block.end),
                freq_hash: None,
            };
            cfg.insert(BlockDef {
                id: block.id,
                start: block.start,
                end: block.end,
                label: block.label.as_deref().unwrap_or_default().into(),
                preds: Vec::new(),
                succs: Vec::new(),
                ctx: Some(ctx),
            });
        }
        for block in &raw {
            for &succ in &block.succs {
                cfg.add_edge(block.id, succ);
            }
            for &pred in &block.preds {
                cfg.add_edge(pred, block.id);
            }
        }
        Ok(Self::new(decoder, primes, cfg, config))
    }

    /// Run the full pipeline and return the well-formed classes.
    ///
    /// One-shot: group blocks by the `itype2` fingerprint, grow every seed
    /// pair, index by path length, filter, and emit. An empty CFG yields an
    /// empty list.
    pub fn analyze(&mut self) -> Result<Vec<MatchedClass>, MatchError> {
        if self.cfg.is_empty() {
            return Ok(Vec::new());
        }
        for block in self.cfg.blocks() {
            if let Some(ctx) = &block.ctx {
                self.node_hashes.insert(
                    block.id,
                    NodeFingerprints {
                        itype1: ctx.hash_itype1.clone(),
                        itype2: ctx.hash_itype2.clone(),
                    },
                );
            }
        }
        self.hash_bb_match(crate::fingerprint::FingerprintKind::Itype2);
        self.find_subgraphs()?;
        self.sort_by_path_len();
        self.well_formed_filter();
        Ok(self.matched_classes())
    }

    /// The classes surviving the well-formedness filter, skipping buckets
    /// the filter emptied.
    #[must_use]
    pub fn matched_classes(&self) -> Vec<MatchedClass> {
        let mut result = Vec::new();
        for (seed_hash, buckets) in &self.normalized {
            for (subgraph_hash, paths) in buckets {
                if paths.is_empty() {
                    continue;
                }
                result.push(MatchedClass {
                    seed_hash: seed_hash.clone(),
                    subgraph_hash: subgraph_hash.clone(),
                    paths: paths.clone(),
                });
            }
        }
        result
    }

    /// The function's CFG.
    #[must_use]
    pub fn cfg(&self) -> &CfgStore {
        &self.cfg
    }

    /// Fingerprint -> block ids sharing it.
    #[must_use]
    pub fn equivalence_groups(&self) -> &BTreeMap<String, Vec<u32>> {
        &self.m
    }

    /// Every matched path pair, head-anchored at its seed.
    #[must_use]
    pub fn full_paths(&self) -> &PathStore {
        &self.path_per_node_hash_full
    }

    /// Single-entry-normalized matched paths.
    #[must_use]
    pub fn normalized_paths(&self) -> &PathStore {
        &self.path_per_node_hash
    }

    /// Per-node fingerprints recorded by `analyze`.
    #[must_use]
    pub fn node_fingerprints(&self) -> &BTreeMap<u32, NodeFingerprints> {
        &self.node_hashes
    }

    /// Seed pairs whose coupled BFS produced unequal path lengths.
    #[must_use]
    pub const fn mismatched_length_count(&self) -> u32 {
        self.mismatched_lengths
    }
}
