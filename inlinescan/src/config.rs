//! Matcher tunables and their on-disk configuration.
//!
//! A `.inlinescan.toml` found in the analysis root or any parent directory
//! supplies defaults; command-line flags override them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration file name searched for in the analysis root and above.
pub const CONFIG_FILENAME: &str = ".inlinescan.toml";

/// Tunables of one matcher run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Minimum blocks a reported class must span.
    pub min_function_size_in_blocks: usize,
    /// When non-zero, require the head block's first bytes to lie inside
    /// the matched subgraph.
    pub min_function_head_size: u64,
    /// Per-bucket percentage the frequency fallback must strictly exceed.
    pub frequency_ratio_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_function_size_in_blocks: 4,
            min_function_head_size: 0,
            frequency_ratio_threshold: 95.0,
        }
    }
}

impl MatcherConfig {
    /// Override the minimum class size in blocks.
    #[must_use]
    pub const fn with_min_blocks(mut self, blocks: usize) -> Self {
        self.min_function_size_in_blocks = blocks;
        self
    }

    /// Override the head-size requirement.
    #[must_use]
    pub const fn with_min_head_size(mut self, bytes: u64) -> Self {
        self.min_function_head_size = bytes;
        self
    }

    /// Override the frequency per-bucket threshold.
    #[must_use]
    pub const fn with_frequency_ratio(mut self, percent: f64) -> Self {
        self.frequency_ratio_threshold = percent;
        self
    }
}

/// Top-level configuration struct.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// The main configuration section.
    #[serde(default)]
    pub inlinescan: FileConfig,
    /// The path this configuration was loaded from, `None` for defaults.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

/// The `[inlinescan]` table of `.inlinescan.toml`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FileConfig {
    /// Minimum blocks a reported class must span.
    pub min_function_size_in_blocks: Option<usize>,
    /// Head-size requirement in bytes.
    pub min_function_head_size: Option<u64>,
    /// Frequency per-bucket threshold percentage.
    pub frequency_ratio_threshold: Option<f64>,
}

impl Config {
    /// Loads configuration from the current directory upward.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from `path` and traversing up.
    ///
    /// Falls back to defaults when no file is found or a file fails to
    /// parse.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                if let Ok(content) = fs::read_to_string(&candidate) {
                    if let Ok(mut config) = toml::from_str::<Self>(&content) {
                        config.config_file_path = Some(candidate);
                        return config;
                    }
                }
            }
            if !current.pop() {
                return Self::default();
            }
        }
    }

    /// Fold the file values into a [`MatcherConfig`].
    #[must_use]
    pub fn matcher_config(&self) -> MatcherConfig {
        let mut cfg = MatcherConfig::default();
        if let Some(v) = self.inlinescan.min_function_size_in_blocks {
            cfg.min_function_size_in_blocks = v;
        }
        if let Some(v) = self.inlinescan.min_function_head_size {
            cfg.min_function_head_size = v;
        }
        if let Some(v) = self.inlinescan.frequency_ratio_threshold {
            cfg.frequency_ratio_threshold = v;
        }
        cfg
    }
}
