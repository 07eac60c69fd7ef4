use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cfg::CfgStore;
use crate::matcher::MatchedClass;

/// One matched block with its address span, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSpan {
    /// Block id.
    pub id: u32,
    /// Start address.
    pub start: u64,
    /// End address.
    pub end: u64,
}

/// A finding for JSON output, representing one repeated-subgraph class.
#[derive(Debug, Clone, Serialize)]
pub struct InlineFinding {
    /// Label of the analyzed function.
    pub function: String,
    /// Listing file the function came from.
    pub file: PathBuf,
    /// Fingerprint shared by the seed blocks.
    pub seed_hash: String,
    /// Signature of the repeated subgraph shape.
    pub subgraph_hash: String,
    /// Number of occurrences of the subgraph.
    pub occurrences: usize,
    /// Blocks per occurrence.
    pub blocks: usize,
    /// The matched block sets, one per occurrence.
    pub paths: Vec<Vec<NodeSpan>>,
}

impl InlineFinding {
    /// Build a finding from a matched class and the CFG it refers to.
    #[must_use]
    pub fn from_class(class: &MatchedClass, cfg: &CfgStore, function: &str, file: &Path) -> Self {
        let paths: Vec<Vec<NodeSpan>> = class
            .paths
            .iter()
            .map(|path| {
                path.iter()
                    .map(|&id| {
                        let (start, end) =
                            cfg.get(id).map_or((0, 0), |b| (b.start, b.end));
                        NodeSpan { id, start, end }
                    })
                    .collect()
            })
            .collect();
        Self {
            function: function.to_owned(),
            file: file.to_path_buf(),
            seed_hash: class.seed_hash.clone(),
            subgraph_hash: class.subgraph_hash.clone(),
            occurrences: class.paths.len(),
            blocks: class.paths.first().map_or(0, Vec::len),
            paths,
        }
    }
}
