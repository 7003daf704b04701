use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regular files under `root`, sorted so callers get a stable order.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}

pub fn read_to_string_if_exists(path: &Path) -> Option<std::io::Result<String>> {
    match std::fs::read_to_string(path) {
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        other => Some(other),
    }
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}
