use std::path::{Path, PathBuf};

use crate::SteamError;

/// Source of the Steam client's install directory.
pub trait InstallPathProvider: Send + Sync {
    fn install_path(&self) -> Result<PathBuf, SteamError>;
}

/// Platform default: the registry on Windows, unsupported elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProvider;

impl InstallPathProvider for PlatformProvider {
    fn install_path(&self) -> Result<PathBuf, SteamError> {
        get_base_dir()
    }
}

/// A caller-supplied install directory.
#[derive(Debug, Clone)]
pub struct FixedInstallPath(PathBuf);

impl FixedInstallPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl InstallPathProvider for FixedInstallPath {
    fn install_path(&self) -> Result<PathBuf, SteamError> {
        if self.0.as_os_str().is_empty() {
            return Err(SteamError::ValueMissing("install path is empty".into()));
        }
        Ok(self.0.clone())
    }
}

/// Well-known locations inside a Steam install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamLayout {
    base_dir: PathBuf,
}

impl SteamLayout {
    /// Creates a layout rooted at the given install directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam install directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn steamapps_dir(&self) -> PathBuf {
        self.base_dir.join("steamapps")
    }

    /// Returns the path to `libraryfolders.vdf`.
    ///
    /// Only the lowercase name is used; older clients that wrote
    /// `LibraryFolders.vdf` are not found on case-sensitive filesystems.
    pub fn library_folders_path(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific local user.
    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.user_data_dir().join(user)
    }

    /// Returns the remote save folder for a user and app.
    pub fn remote_dir(&self, user: &str, app_id: &str) -> PathBuf {
        self.user_dir(user).join(app_id).join("remote")
    }
}

/// Returns `<library>/steamapps/appmanifest_<id>.acf`.
pub fn manifest_path(library: &Path, app_id: &str) -> PathBuf {
    library.join("steamapps").join(manifest_filename(app_id))
}

/// Returns `<library>/steamapps/common/<install_dir>`.
pub fn game_path(library: &Path, install_dir: &str) -> PathBuf {
    library.join("steamapps").join("common").join(install_dir)
}

fn manifest_filename(app_id: &str) -> String {
    format!("appmanifest_{app_id}.acf")
}

#[cfg(target_os = "windows")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_windows::RegistryProvider.install_path()
}

#[cfg(not(target_os = "windows"))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::PlatformUnsupported(std::env::consts::OS))
}
