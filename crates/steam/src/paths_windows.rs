use std::path::PathBuf;

use winreg::RegKey;
use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE};

use crate::SteamError;
use crate::paths::InstallPathProvider;

/// Registry keys that may hold `InstallPath`, WOW6432Node (32-bit client on
/// 64-bit Windows) first.
const STEAM_KEYS: [&str; 2] = [r"SOFTWARE\Wow6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"];

const INSTALL_PATH_VALUE: &str = "InstallPath";

/// Reads the Steam install directory from `HKEY_LOCAL_MACHINE`.
///
/// Keys are opened with query access only and closed when dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryProvider;

impl InstallPathProvider for RegistryProvider {
    fn install_path(&self) -> Result<PathBuf, SteamError> {
        let mut key_without_value = None;

        for subkey in STEAM_KEYS {
            match read_steam_registry(subkey) {
                Ok(path) => return Ok(path),
                Err(SteamError::ValueMissing(msg)) => {
                    tracing::debug!(subkey, "steam registry key has no install path");
                    key_without_value.get_or_insert(msg);
                }
                Err(_) => continue,
            }
        }

        match key_without_value {
            Some(msg) => Err(SteamError::ValueMissing(msg)),
            None => Err(SteamError::NotFound(format!(
                r"registry key HKLM\{}",
                STEAM_KEYS[0]
            ))),
        }
    }
}

fn read_steam_registry(subkey: &str) -> Result<PathBuf, SteamError> {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = hklm
        .open_subkey_with_flags(subkey, KEY_QUERY_VALUE)
        .map_err(|_| SteamError::NotFound(format!(r"registry key HKLM\{subkey}")))?;

    let missing = || SteamError::ValueMissing(format!(r"{INSTALL_PATH_VALUE} in HKLM\{subkey}"));
    let install_path: String = key.get_value(INSTALL_PATH_VALUE).map_err(|_| missing())?;
    if install_path.is_empty() {
        return Err(missing());
    }
    Ok(PathBuf::from(install_path))
}
