//! Steam install discovery: the client's install directory, its library
//! folders, installed application manifests and per-user remote save folders.
//!
//! Every call re-reads the registry and the files it needs; nothing is
//! cached. The free functions use the platform's install-path provider and
//! the built-in save-path table; use [`Steam`] to inject either.

pub mod apps;
pub mod diagnostics;
pub mod library;
pub mod paths;
#[cfg(target_os = "windows")]
pub mod paths_windows;
pub mod remote;
pub mod resolver;
pub mod save_paths;

use std::path::{Path, PathBuf};

use steampath_vdf::{Object, VdfError};

// Re-export primary types.
pub use apps::{AppIdPolicy, Application};
pub use diagnostics::{CollectingSink, DiagnosticSink, NullSink, TracingSink, Warning};
pub use paths::{FixedInstallPath, InstallPathProvider, PlatformProvider, SteamLayout};
pub use resolver::Steam;
pub use save_paths::{SavePathTable, expand_env_placeholders, known_apps};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("value missing: {0}")]
    ValueMissing(String),

    #[error("unexpected layout: {0}")]
    Schema(String),

    #[error("failed to parse {path:?}: {source}")]
    Parse { path: PathBuf, source: VdfError },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("steam discovery is not supported on {0}")]
    PlatformUnsupported(&'static str),

    #[error("manifest for app {requested} reports appid {reported}")]
    AppIdMismatch { requested: String, reported: String },

    #[error("invalid save path table: {0}")]
    SavePaths(#[from] serde_json::Error),
}

impl SteamError {
    /// Maps an I/O error on `path`, keeping not-found distinguishable.
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound(path.display().to_string())
        } else {
            SteamError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Reads and parses a text KeyValues file.
///
/// A file that was read but is not UTF-8 is a `Parse` error, not `Io`.
pub(crate) fn read_vdf_file(path: &Path) -> Result<Object, SteamError> {
    let bytes = std::fs::read(path).map_err(|e| SteamError::from_io(path, e))?;
    steampath_vdf::parse_bytes(&bytes).map_err(|source| SteamError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns Steam's install directory from the platform registration store.
pub fn resolve_install_path() -> Result<PathBuf, SteamError> {
    Steam::new().resolve_install_path()
}

/// Reads `<install>/steamapps/libraryfolders.vdf`.
pub fn read_library_config() -> Result<Object, SteamError> {
    Steam::new().read_library_config()
}

/// Returns the configured library folders that exist on disk.
pub fn list_library_paths() -> Result<Vec<PathBuf>, SteamError> {
    Steam::new().list_library_paths()
}

/// Resolves an installed application by id.
pub fn get_application(
    id: &str,
    fallback_save_path: Option<&str>,
) -> Result<Application, SteamError> {
    Steam::new().get_application(id, fallback_save_path)
}

/// Returns every `userdata/<user>/<id>/remote` folder.
pub fn list_remote_paths(id: &str) -> Result<Vec<PathBuf>, SteamError> {
    Steam::new().list_remote_paths(id)
}
