//! Preset files: one JSON document per saved switch.
//!
//! The document is the flat serialized form of [`SwitchSpec`]. There is no
//! version field; a preset written by an incompatible build fails to parse.

use std::fs;
use std::path::Path;

use crate::error::PresetError;
use crate::switch::SwitchSpec;

impl SwitchSpec {
    /// Parses a preset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses a preset from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serializes the preset to a compact JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the preset to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Reads a preset file.
pub fn load_preset(path: &Path) -> Result<SwitchSpec, PresetError> {
    let json = fs::read_to_string(path).map_err(|source| PresetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SwitchSpec::from_json(&json)?)
}

/// Writes a preset file, replacing any existing one.
pub fn save_preset(spec: &SwitchSpec, path: &Path) -> Result<(), PresetError> {
    let json = spec.to_json_pretty()?;
    fs::write(path, json).map_err(|source| PresetError::Write {
        path: path.to_path_buf(),
        source,
    })
}
