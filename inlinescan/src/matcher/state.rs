//! Persistence of the matcher's derived state.
//!
//! The stream carries a human-readable report of the matched classes
//! followed by five labeled records, each introduced by a magic-header
//! sentinel. Records are JSON payloads over deterministically-ordered maps,
//! so saving, loading, and saving again reproduces the records byte for
//! byte.

use std::io::Write;

use super::{PathStore, StateError, SubgraphMatcher};

const MAGIC_HEADER: &str = "--CONTEXT--";
const PATH_INFO_MARKER: &str = "PATH_INFO\n";
const PATH_PER_NODE_HASH_MARKER: &str = "PathPerNodeHash\n";
const PATH_PER_NODE_HASH_FULL_MARKER: &str = "PathPerNodeHashFullMarker\n";
const SIZE_DIC_MARKER: &str = "Size_Dic\n";
const NODE_HASHES_MARKER: &str = "Node_Hashes\n";
const NODE_HASH_MATCHES_MARKER: &str = "Node_Hash_Matches\n";

impl SubgraphMatcher<'_> {
    /// Write one `ID:...;NODESET:...` line per surviving class.
    ///
    /// Each tuple group encloses one matched path as
    /// `(id : start_hex : end_hex, ...)`; groups are comma-separated and the
    /// line ends with a semicolon.
    pub fn write_report(&self, writer: &mut impl Write) -> Result<(), StateError> {
        for buckets in self.normalized.values() {
            for (signature, paths) in buckets {
                let mut reduced: Vec<&Vec<u32>> = Vec::new();
                for path in paths {
                    if !reduced.iter().any(|p| *p == path) {
                        reduced.push(path);
                    }
                }
                if reduced.is_empty() {
                    continue;
                }
                write!(writer, "ID:{signature};NODESET:")?;
                for (group_idx, path) in reduced.iter().enumerate() {
                    write!(writer, "(")?;
                    for (node_idx, &id) in path.iter().enumerate() {
                        let (start, end) = self
                            .cfg
                            .get(id)
                            .map_or((0, 0), |block| (block.start, block.end));
                        write!(writer, "{id} : {start:x} : {end:x}")?;
                        if node_idx + 1 < path.len() {
                            write!(writer, ", ")?;
                        }
                    }
                    write!(writer, ")")?;
                    if group_idx + 1 < reduced.len() {
                        write!(writer, ", ")?;
                    }
                }
                writeln!(writer, ";")?;
            }
        }
        Ok(())
    }

    /// The five labeled state records as one string.
    pub fn state_records(&self) -> Result<String, StateError> {
        let mut out = String::new();
        let records = [
            (
                PATH_PER_NODE_HASH_MARKER,
                serde_json::to_string(&self.path_per_node_hash).map_err(StateError::Encode)?,
            ),
            (
                PATH_PER_NODE_HASH_FULL_MARKER,
                serde_json::to_string(&self.path_per_node_hash_full).map_err(StateError::Encode)?,
            ),
            (
                SIZE_DIC_MARKER,
                serde_json::to_string(&self.size_index).map_err(StateError::Encode)?,
            ),
            (
                NODE_HASHES_MARKER,
                serde_json::to_string(&self.node_hashes).map_err(StateError::Encode)?,
            ),
            (
                NODE_HASH_MATCHES_MARKER,
                serde_json::to_string(&self.m).map_err(StateError::Encode)?,
            ),
        ];
        for (marker, payload) in records {
            out.push_str(MAGIC_HEADER);
            out.push_str(marker);
            out.push_str(&payload);
            out.push('\n');
        }
        Ok(out)
    }

    /// Write the report section and the five state records.
    pub fn save_state(&self, writer: &mut impl Write) -> Result<(), StateError> {
        write!(writer, "{MAGIC_HEADER}{PATH_INFO_MARKER}")?;
        self.write_report(writer)?;
        writer.write_all(self.state_records()?.as_bytes())?;
        Ok(())
    }

    /// Restore the five state records from a previously saved stream.
    ///
    /// Segments with unknown markers (including the report section) are
    /// ignored. On a decode failure the matcher is left untouched.
    pub fn load_state(&mut self, input: &str) -> Result<(), StateError> {
        let mut path_per_node_hash: Option<PathStore> = None;
        let mut path_per_node_hash_full: Option<PathStore> = None;
        let mut size_index = None;
        let mut node_hashes = None;
        let mut matches = None;

        for segment in input.split(MAGIC_HEADER).skip(1) {
            if let Some(payload) = segment.strip_prefix(PATH_PER_NODE_HASH_MARKER) {
                path_per_node_hash =
                    Some(serde_json::from_str(payload).map_err(StateError::Decode)?);
            } else if let Some(payload) = segment.strip_prefix(PATH_PER_NODE_HASH_FULL_MARKER) {
                path_per_node_hash_full =
                    Some(serde_json::from_str(payload).map_err(StateError::Decode)?);
            } else if let Some(payload) = segment.strip_prefix(SIZE_DIC_MARKER) {
                size_index = Some(serde_json::from_str(payload).map_err(StateError::Decode)?);
            } else if let Some(payload) = segment.strip_prefix(NODE_HASHES_MARKER) {
                node_hashes = Some(serde_json::from_str(payload).map_err(StateError::Decode)?);
            } else if let Some(payload) = segment.strip_prefix(NODE_HASH_MATCHES_MARKER) {
                matches = Some(serde_json::from_str(payload).map_err(StateError::Decode)?);
            }
        }

        if let Some(v) = path_per_node_hash {
            self.path_per_node_hash = v;
        }
        if let Some(v) = path_per_node_hash_full {
            self.path_per_node_hash_full = v;
        }
        if let Some(v) = size_index {
            self.size_index = v;
        }
        if let Some(v) = node_hashes {
            self.node_hashes = v;
        }
        if let Some(v) = matches {
            self.m = v;
        }
        Ok(())
    }
}
