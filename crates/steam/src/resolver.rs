use std::path::PathBuf;
use std::sync::Arc;

use steampath_vdf::Object;

use crate::SteamError;
use crate::apps::{self, AppIdPolicy, Application};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::library;
use crate::paths::{InstallPathProvider, PlatformProvider, SteamLayout};
use crate::remote;
use crate::save_paths::SavePathTable;

/// Steam path resolver.
///
/// Holds only configuration: the install-path provider, the save-path table,
/// the app-id policy and the diagnostics sink. Each operation re-reads
/// everything it needs from the registry and disk.
pub struct Steam {
    provider: Box<dyn InstallPathProvider>,
    save_paths: SavePathTable,
    app_id_policy: AppIdPolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Steam {
    fn default() -> Self {
        Self::new()
    }
}

impl Steam {
    /// Creates a resolver using the platform provider and built-in save paths.
    pub fn new() -> Self {
        Self::with_provider(PlatformProvider)
    }

    /// Creates a resolver with a custom install-path provider.
    pub fn with_provider(provider: impl InstallPathProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            save_paths: SavePathTable::builtin(),
            app_id_policy: AppIdPolicy::default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the save-path table.
    pub fn save_paths(mut self, table: SavePathTable) -> Self {
        self.save_paths = table;
        self
    }

    /// Sets how a manifest/appid mismatch is handled.
    pub fn app_id_policy(mut self, policy: AppIdPolicy) -> Self {
        self.app_id_policy = policy;
        self
    }

    /// Routes warnings to `sink` instead of `tracing`.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn save_path_table(&self) -> &SavePathTable {
        &self.save_paths
    }

    /// Returns Steam's install directory.
    pub fn resolve_install_path(&self) -> Result<PathBuf, SteamError> {
        let path = self.provider.install_path()?;
        tracing::debug!(path = %path.display(), "resolved steam install path");
        Ok(path)
    }

    /// Returns the layout of the current install.
    pub fn layout(&self) -> Result<SteamLayout, SteamError> {
        Ok(SteamLayout::new(self.resolve_install_path()?))
    }

    /// Reads `<install>/steamapps/libraryfolders.vdf`.
    pub fn read_library_config(&self) -> Result<Object, SteamError> {
        library::read_config(&self.layout()?)
    }

    /// Returns configured library folders that currently exist as directories.
    pub fn list_library_paths(&self) -> Result<Vec<PathBuf>, SteamError> {
        let config = self.read_library_config()?;
        library::paths_from_config(&config, self.sink.as_ref())
    }

    /// Resolves an installed application.
    ///
    /// `fallback_save_path` is used only when the save-path table has no entry
    /// for `id`.
    pub fn get_application(
        &self,
        id: &str,
        fallback_save_path: Option<&str>,
    ) -> Result<Application, SteamError> {
        let libraries = self.list_library_paths()?;
        apps::resolve(
            &libraries,
            id,
            fallback_save_path,
            &self.save_paths,
            self.app_id_policy,
            self.sink.as_ref(),
        )
    }

    /// Returns every per-user remote save folder for `id`.
    pub fn list_remote_paths(&self, id: &str) -> Result<Vec<PathBuf>, SteamError> {
        remote::find_remote_dirs(&self.layout()?, id)
    }
}
