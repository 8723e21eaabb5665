use std::fs;
use std::path::PathBuf;

use crate::SteamError;
use crate::apps::is_valid_app_id;
use crate::paths::SteamLayout;

/// Returns every `userdata/<user>/<app_id>/remote` directory, in listing order.
///
/// `<user>` is Steam's local account folder name. Users without a remote
/// folder for the app are skipped; an empty result is not an error. An id
/// that cannot name an app matches nothing.
pub fn find_remote_dirs(layout: &SteamLayout, app_id: &str) -> Result<Vec<PathBuf>, SteamError> {
    if !is_valid_app_id(app_id) {
        tracing::debug!(app_id, "ignoring remote lookup for non-numeric app id");
        return Ok(Vec::new());
    }

    let user_data_dir = layout.user_data_dir();

    let entries =
        fs::read_dir(&user_data_dir).map_err(|e| SteamError::from_io(&user_data_dir, e))?;

    let mut remotes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io {
            path: user_data_dir.clone(),
            source: e,
        })?;

        // Joined from the OS path so non-UTF-8 user folders still resolve.
        let remote = entry.path().join(app_id).join("remote");
        if remote.is_dir() {
            remotes.push(remote);
        }
    }

    tracing::debug!(app_id, found = remotes.len(), "scanned userdata for remote folders");
    Ok(remotes)
}
