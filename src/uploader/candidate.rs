use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

use crate::constants::{LOG_FILE_SUFFIX, READY_MARKER};

/// True if the file name ends with `.log`, ignoring case
pub fn has_log_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(LOG_FILE_SUFFIX))
        .unwrap_or(false)
}

/// True if the producer has marked the content as closed
pub fn contains_ready_marker(contents: &[u8]) -> bool {
    let marker = READY_MARKER.as_bytes();
    contents.len() >= marker.len() && contents.windows(marker.len()).any(|w| w == marker)
}

/// Object name a file is stored under: its base name
pub fn object_name_for(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Invalid file path - no filename component: {}", path.display()))
}

/// Regular files directly under `dir`, sorted by name.
///
/// Order carries no meaning; sorting only keeps cycles reproducible.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| anyhow!("Failed to enumerate {}: {}", dir.display(), e))?;
        // Follows symlinks so a linked log file is still shipped.
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
