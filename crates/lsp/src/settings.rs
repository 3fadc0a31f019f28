//! Client-provided server settings.
//!
//! Settings arrive as `initializationOptions` on startup and may be
//! replaced later by `workspace/didChangeConfiguration`. Both payloads
//! are accepted either bare or nested under a `hyprls` key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration file names shared by other tools in the ecosystem.
pub const DEFAULT_IGNORED: &[&str] = &["hyprlock.conf", "hypridle.conf"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// File names for which every feature returns nothing.
    pub ignore: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ignore: DEFAULT_IGNORED.iter().map(|name| (*name).to_owned()).collect(),
        }
    }
}

impl Settings {
    /// Read settings from a client payload, falling back to the defaults
    /// when the payload is absent or does not deserialize.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Settings::default();
        };
        let scoped = value.get("hyprls").unwrap_or(value);
        match serde_json::from_value(scoped.clone()) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed settings");
                Settings::default()
            }
        }
    }

    /// Whether the document at `path` should be left alone.
    pub fn ignores(&self, path: &std::path::Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.ignore.iter().any(|ignored| ignored == name))
    }
}
