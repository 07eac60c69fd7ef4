//! Shared utilities for command implementations.

use std::path::{Path, PathBuf};

/// Finds all listing files under the given roots.
///
/// Files are taken as-is; directories are walked (gitignore-aware) and every
/// `*.json` file below them is collected. The result is sorted for
/// deterministic processing order.
#[must_use]
pub fn find_listing_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        for entry in ignore::WalkBuilder::new(root).build().flatten() {
            let path = entry.path();
            if path.is_file() && is_listing_path(path) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_listing_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_json_files_count_as_listings() {
        assert!(is_listing_path(Path::new("a/b/func.json")));
        assert!(!is_listing_path(Path::new("a/b/func.txt")));
        assert!(!is_listing_path(Path::new("a/b/json")));
    }
}
