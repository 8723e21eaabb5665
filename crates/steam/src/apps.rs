//! Installed application lookup through `appmanifest_<id>.acf`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use steampath_vdf::Object;

use crate::SteamError;
use crate::diagnostics::{DiagnosticSink, Warning};
use crate::paths;
use crate::save_paths::SavePathTable;

/// An installed Steam application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Id as requested by the caller.
    pub id: String,
    /// Id as recorded in the manifest.
    pub app_id: String,
    pub name: String,
    /// Directory name under `steamapps/common`.
    pub install_dir: String,
    /// `<library>/steamapps/common/<install_dir>`.
    pub game_path: PathBuf,
    /// Save location from the save-path table or the caller's fallback.
    pub save_path: Option<String>,
    /// Library folder the manifest was found in.
    pub library_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// How to treat a manifest whose `appid` differs from the requested id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppIdPolicy {
    /// Keep both ids and report a warning.
    #[default]
    Tolerate,
    /// Fail with [`SteamError::AppIdMismatch`].
    Strict,
}

/// Fields read from the `AppState` block.
struct AppState {
    app_id: String,
    name: String,
    install_dir: String,
}

/// Whether `id` can name a Steam app: a non-empty run of ASCII digits.
///
/// Ids are embedded in file names, so anything else could escape the library
/// or userdata directory. No installed app has such an id.
pub fn is_valid_app_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the first library holding a manifest for `id`.
///
/// Returns `(manifest_path, library_path)`.
pub fn find_manifest(libraries: &[PathBuf], id: &str) -> Option<(PathBuf, PathBuf)> {
    libraries.iter().find_map(|library| {
        let manifest = paths::manifest_path(library, id);
        manifest
            .is_file()
            .then(|| (manifest, library.clone()))
    })
}

/// Resolves an application from the given libraries.
///
/// The save path comes from `save_paths` when it has an entry for `id`, else
/// from `fallback_save_path`. An id that cannot name an app is `NotFound`
/// without touching the libraries.
pub fn resolve(
    libraries: &[PathBuf],
    id: &str,
    fallback_save_path: Option<&str>,
    save_paths: &SavePathTable,
    policy: AppIdPolicy,
    sink: &dyn DiagnosticSink,
) -> Result<Application, SteamError> {
    let not_found = || SteamError::NotFound(format!("app manifest for {id:?}"));
    if !is_valid_app_id(id) {
        return Err(not_found());
    }

    let (manifest_path, library_path) = find_manifest(libraries, id).ok_or_else(not_found)?;
    tracing::debug!(app_id = id, manifest = %manifest_path.display(), "found app manifest");

    let manifest = crate::read_vdf_file(&manifest_path)?;
    let state = read_app_state(&manifest, &manifest_path)?;

    if state.app_id != id {
        match policy {
            AppIdPolicy::Strict => {
                return Err(SteamError::AppIdMismatch {
                    requested: id.to_owned(),
                    reported: state.app_id,
                });
            }
            AppIdPolicy::Tolerate => sink.report(Warning::AppIdMismatch {
                requested: id.to_owned(),
                reported: state.app_id.clone(),
            }),
        }
    }

    let save_path = save_paths
        .get(id)
        .or(fallback_save_path)
        .map(str::to_owned);

    Ok(Application {
        id: id.to_owned(),
        game_path: paths::game_path(&library_path, &state.install_dir),
        app_id: state.app_id,
        name: state.name,
        install_dir: state.install_dir,
        save_path,
        library_path,
        manifest_path,
    })
}

fn read_app_state(manifest: &Object, path: &Path) -> Result<AppState, SteamError> {
    let state = manifest.get_object("AppState").ok_or_else(|| {
        SteamError::Schema(format!("{} has no 'AppState' block", path.display()))
    })?;

    let field = |key: &str| -> Result<String, SteamError> {
        match state.get(key) {
            Some(value) => value.as_str().map(str::to_owned).ok_or_else(|| {
                SteamError::Schema(format!(
                    "'AppState.{key}' in {} has type {}, expected string",
                    path.display(),
                    value.kind()
                ))
            }),
            None => Err(SteamError::Schema(format!(
                "{} is missing 'AppState.{key}'",
                path.display()
            ))),
        }
    };

    let app_state = AppState {
        app_id: field("appid")?,
        name: field("name")?,
        install_dir: field("installdir")?,
    };

    if app_state.install_dir.is_empty() {
        return Err(SteamError::Schema(format!(
            "'AppState.installdir' in {} is empty",
            path.display()
        )));
    }

    Ok(app_state)
}
