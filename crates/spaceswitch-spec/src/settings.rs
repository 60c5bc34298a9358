//! Tunable settings for switch planning and execution.

use serde::{Deserialize, Serialize};

/// Pole-vector distance multiplier that has been used on production rigs.
pub const DEFAULT_POLE_DISTANCE: f64 = 4.0;

/// Number of wrist constraint probes that gives a stable, non-flipped result.
pub const DEFAULT_PROBE_ITERATIONS: u32 = 2;

/// Settings shared by every switch of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchSettings {
    /// How far the pole-vector control sits from the shoulder-wrist midpoint,
    /// as a multiple of the elbow's offset from it.
    #[serde(default = "default_pole_distance")]
    pub pole_distance: f64,
    /// How many times the wrist is probed and re-applied on FK to IK.
    #[serde(default = "default_probe_iterations")]
    pub probe_iterations: u32,
    /// Set visibility attributes at the switch frame (otherwise they are only
    /// keyed on the frame before).
    #[serde(default)]
    pub drive_visibility: bool,
    /// Treat a joint/FK control rotate-order mismatch as an error.
    #[serde(default)]
    pub strict_rotate_order: bool,
    /// Return the time cursor to its starting frame after a switch.
    #[serde(default = "default_true")]
    pub restore_time: bool,
}

fn default_pole_distance() -> f64 {
    DEFAULT_POLE_DISTANCE
}

fn default_probe_iterations() -> u32 {
    DEFAULT_PROBE_ITERATIONS
}

fn default_true() -> bool {
    true
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self {
            pole_distance: default_pole_distance(),
            probe_iterations: default_probe_iterations(),
            drive_visibility: false,
            strict_rotate_order: false,
            restore_time: true,
        }
    }
}

impl SwitchSettings {
    /// Creates settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the pole-vector distance multiplier.
    pub fn with_pole_distance(mut self, distance: f64) -> Self {
        self.pole_distance = distance;
        self
    }

    /// Sets the wrist probe iteration count.
    pub fn with_probe_iterations(mut self, iterations: u32) -> Self {
        self.probe_iterations = iterations;
        self
    }

    /// Sets whether visibility attributes are driven at the switch frame.
    pub fn with_drive_visibility(mut self, drive: bool) -> Self {
        self.drive_visibility = drive;
        self
    }

    /// Sets strict rotate-order checking.
    pub fn with_strict_rotate_order(mut self, strict: bool) -> Self {
        self.strict_rotate_order = strict;
        self
    }

    /// Sets whether the time cursor is restored.
    pub fn with_restore_time(mut self, restore: bool) -> Self {
        self.restore_time = restore;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = SwitchSettings::from_json("{}").unwrap();
        assert_eq!(settings, SwitchSettings::default());
        assert_eq!(settings.pole_distance, 4.0);
        assert_eq!(settings.probe_iterations, 2);
        assert!(settings.restore_time);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(SwitchSettings::from_json(r#"{"pole_distanse": 3.0}"#).is_err());
    }
}
