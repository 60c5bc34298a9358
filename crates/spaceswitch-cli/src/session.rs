//! Per-user session context.
//!
//! Remembers the last preset, the directory it came from and the last
//! explicit frame window between runs. The value is loaded once at startup,
//! handed to the command that needs it and written back at the end; nothing
//! about it is global.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use spaceswitch_spec::FrameWindow;
use std::fs;
use std::path::{Path, PathBuf};

/// File name under the per-user config directory.
pub const SESSION_FILE: &str = "session.json";

/// Persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    /// Directory of the last preset used.
    pub last_directory: Option<PathBuf>,
    /// Last preset used.
    pub last_preset: Option<PathBuf>,
    /// Last explicit frame window.
    pub last_window: Option<FrameWindow>,
}

impl SessionContext {
    /// Default session file location, `<config dir>/spaceswitch/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spaceswitch").join(SESSION_FILE))
    }

    /// Loads a session, returning an empty one if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))
    }

    /// Writes the session, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))
    }

    /// Records `preset` as the last preset and its directory as the last
    /// directory.
    pub fn remember_preset(&mut self, preset: &Path) {
        self.last_directory = preset.parent().map(Path::to_path_buf);
        self.last_preset = Some(preset.to_path_buf());
    }

    /// Resolves a preset argument. Relative paths that do not exist are
    /// tried against the last directory; no argument falls back to the last
    /// preset.
    pub fn resolve_preset(&self, arg: Option<&str>) -> Result<PathBuf> {
        match arg {
            Some(arg) => {
                let path = PathBuf::from(arg);
                if path.is_relative() && !path.exists() {
                    if let Some(dir) = &self.last_directory {
                        let candidate = dir.join(&path);
                        if candidate.exists() {
                            return Ok(candidate);
                        }
                    }
                }
                Ok(path)
            }
            None => match &self.last_preset {
                Some(path) => Ok(path.clone()),
                None => bail!("no preset given and no previous preset in session"),
            },
        }
    }

    /// Clears every remembered value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
