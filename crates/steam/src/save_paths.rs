//! Known save-data locations.
//!
//! Steam's own config does not record where a game keeps its saves, so the
//! resolver consults a table of known locations keyed by app id. Templates
//! may contain `%VAR%` placeholders; the resolver returns them unexpanded and
//! [`expand_env_placeholders`] is available to callers that want them filled.
//!
//! Additional entries can be loaded from a JSON object file:
//!
//! ```json
//! { "546430": "%LOCALAPPDATA%\\Robotality\\Pathway" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SteamError;

/// App ids with built-in entries.
pub mod known_apps {
    pub const PATHWAY: &str = "546430";
}

/// Mapping from app id to save-path template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavePathTable {
    entries: BTreeMap<String, String>,
}

impl SavePathTable {
    /// Returns an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the table shipped with the crate.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.insert(known_apps::PATHWAY, r"%LOCALAPPDATA%\Robotality\Pathway");
        table
    }

    /// Parses a JSON object of `"<appid>": "<template>"` pairs.
    pub fn from_json_str(json: &str) -> Result<Self, SteamError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SteamError> {
        let content = std::fs::read_to_string(path).map_err(|e| SteamError::from_io(path, e))?;
        let table = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded save path table");
        Ok(table)
    }

    /// Loads a JSON file and layers it over the built-in entries.
    pub fn builtin_with_overrides(path: &Path) -> Result<Self, SteamError> {
        let mut table = Self::builtin();
        table.extend(Self::load(path)?);
        Ok(table)
    }

    /// Adds or replaces an entry, returning the previous template.
    pub fn insert(
        &mut self,
        app_id: impl Into<String>,
        template: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(app_id.into(), template.into())
    }

    pub fn get(&self, app_id: &str) -> Option<&str> {
        self.entries.get(app_id).map(String::as_str)
    }

    /// Merges `other` into this table; entries in `other` win.
    pub fn extend(&mut self, other: SavePathTable) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expands `%VAR%` placeholders from the process environment.
///
/// Unknown variables are left as written.
pub fn expand_env_placeholders(template: &str) -> String {
    expand_placeholders_with(template, |name| std::env::var(name).ok())
}

fn expand_placeholders_with(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        let valid = !name.is_empty() && !name.chars().any(char::is_whitespace);
        match valid.then(|| lookup(name)).flatten() {
            Some(value) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                // Keep the '%' and rescan from the next character so the
                // closing '%' can open another placeholder.
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
