//! Workspace root discovery.

use std::path::{Path, PathBuf};

const MARKERS: &[&str] = &[".vscode", ".git"];

/// Walk up from `start` to the first directory holding a `.vscode/` or `.git/` entry.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if MARKERS.iter().any(|marker| current.join(marker).exists()) {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Pick the workspace root: an explicit one wins, otherwise discover from `start`.
pub fn resolve_workspace(explicit: Option<&Path>, start: Option<&Path>) -> Option<PathBuf> {
    if let Some(root) = explicit {
        return Some(root.to_path_buf());
    }
    start.and_then(find_workspace_root)
}
