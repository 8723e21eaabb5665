//! Library folders listed in `steamapps/libraryfolders.vdf`.

use std::path::PathBuf;

use steampath_vdf::{Object, Value};

use crate::SteamError;
use crate::diagnostics::{DiagnosticSink, Warning};
use crate::paths::SteamLayout;

const LIBRARY_FOLDERS_KEY: &str = "libraryfolders";

/// Reads and parses `libraryfolders.vdf` for the given install.
///
/// The document must contain a top-level `libraryfolders` entry.
pub fn read_config(layout: &SteamLayout) -> Result<Object, SteamError> {
    let path = layout.library_folders_path();
    let config = crate::read_vdf_file(&path)?;

    if !config.contains_key(LIBRARY_FOLDERS_KEY) {
        return Err(SteamError::Schema(format!(
            "{} has no '{LIBRARY_FOLDERS_KEY}' entry",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "read library folder config");
    Ok(config)
}

/// Extracts library paths from a parsed config, keeping those that exist as
/// directories.
///
/// Missing folders and non-directories are skipped and reported to `sink`;
/// a malformed entry fails the whole call.
pub fn paths_from_config(
    config: &Object,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<PathBuf>, SteamError> {
    let folders = match config.get(LIBRARY_FOLDERS_KEY) {
        Some(Value::Object(folders)) => folders,
        Some(other) => {
            return Err(SteamError::Schema(format!(
                "'{LIBRARY_FOLDERS_KEY}' has type {}, expected object",
                other.kind()
            )));
        }
        None => {
            return Err(SteamError::Schema(format!(
                "missing '{LIBRARY_FOLDERS_KEY}' entry"
            )));
        }
    };

    let mut paths = Vec::new();
    for (index, entry) in folders.iter() {
        let path = entry
            .as_object()
            .and_then(|folder| folder.get_str("path"))
            .ok_or_else(|| {
                SteamError::Schema(format!(
                    "library folder '{index}' has no string 'path' (found {})",
                    entry.kind()
                ))
            })?;
        let path = PathBuf::from(path);

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => paths.push(path),
            Ok(_) => sink.report(Warning::LibraryNotDirectory { path }),
            Err(_) => sink.report(Warning::LibraryMissing { path }),
        }
    }

    Ok(paths)
}
