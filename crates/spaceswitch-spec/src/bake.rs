//! Bake modes and frame windows.

use serde::{Deserialize, Serialize};

/// Most frames a single every-frame bake may visit.
pub const MAX_BAKE_FRAMES: u64 = 100_000;

/// Which times a switch visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BakeMode {
    /// One boundary switch at the scene's current frame.
    #[default]
    CurrentFrame,
    /// Re-key at every existing keyframe of the driven controls.
    BakeAtExistingKeyframes,
    /// Re-key at every integer frame of the window or playback range.
    BakeEveryFrame,
}

impl BakeMode {
    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BakeMode::CurrentFrame => "current_frame",
            BakeMode::BakeAtExistingKeyframes => "bake_at_existing_keyframes",
            BakeMode::BakeEveryFrame => "bake_every_frame",
        }
    }

    /// Returns true for the two multi-frame modes.
    pub fn is_bake(&self) -> bool {
        !matches!(self, BakeMode::CurrentFrame)
    }
}

impl std::fmt::Display for BakeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive frame range restricting a bake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameWindow {
    /// First frame (inclusive).
    pub start: f64,
    /// Last frame (inclusive).
    pub end: f64,
}

impl FrameWindow {
    /// Creates a new window. Use [`crate::validation::validate_request`] to
    /// reject inverted windows.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns true if `frame` lies inside the window.
    pub fn contains(&self, frame: f64) -> bool {
        self.start <= frame && frame <= self.end
    }

    /// Number of integer frames inside the window, saturating at `u64::MAX`.
    pub fn frame_count(&self) -> u64 {
        let span = self.end.floor() - self.start.ceil() + 1.0;
        if span > 0.0 {
            span as u64
        } else {
            0
        }
    }

    /// Integer frames inside the window, in ascending order. Check
    /// [`FrameWindow::frame_count`] first for windows from user input.
    pub fn integer_frames(&self) -> Vec<f64> {
        let first = self.start.ceil() as i64;
        let last = self.end.floor() as i64;
        (first..=last).map(|frame| frame as f64).collect()
    }
}

/// A bake mode plus an optional explicit window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BakeRequest {
    /// Which times to visit.
    #[serde(default)]
    pub mode: BakeMode,
    /// Optional explicit window (ignored for `CurrentFrame`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<FrameWindow>,
}

impl BakeRequest {
    /// A single switch at the current frame.
    pub fn current_frame() -> Self {
        Self::default()
    }

    /// A bake at existing keyframes.
    pub fn existing_keyframes() -> Self {
        Self {
            mode: BakeMode::BakeAtExistingKeyframes,
            window: None,
        }
    }

    /// A bake at every frame.
    pub fn every_frame() -> Self {
        Self {
            mode: BakeMode::BakeEveryFrame,
            window: None,
        }
    }

    /// Restricts the bake to an inclusive window.
    pub fn with_window(mut self, start: f64, end: f64) -> Self {
        self.window = Some(FrameWindow::new(start, end));
        self
    }
}
