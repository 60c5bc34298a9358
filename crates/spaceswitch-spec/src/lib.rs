//! Spaceswitch Switch Spec Library
//!
//! This crate provides the data side of a control switch: which controls to
//! keep in place, which driver attributes to flip, how many frames to visit,
//! and the tunables that shape the result. It knows nothing about scenes; the
//! `spaceswitch-bake` crate turns these values into keyframes.
//!
//! # Overview
//!
//! - **Switch specs**: a tagged union of a space switch (one control, one
//!   driver) and an IK/FK switch (a three-joint limb with both control chains)
//! - **Bake requests**: current frame, existing keyframes, or every frame,
//!   with an optional inclusive window
//! - **Settings**: pole distance, probe iterations and execution toggles
//! - **Presets**: the JSON form of a switch spec, read and written as files
//!
//! # Example
//!
//! ```
//! use spaceswitch_spec::{AttributeRef, BakeRequest, SpaceSwitchSpec, SwitchSpec};
//! use spaceswitch_spec::validation::{validate_request, validate_switch};
//!
//! let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
//!     "hand_l_ctl",
//!     AttributeRef::new("hand_l_ctl", "space", 0.0),
//!     AttributeRef::new("hand_l_ctl", "space", 2.0),
//! ));
//! let request = BakeRequest::existing_keyframes().with_window(10.0, 40.0);
//!
//! assert!(validate_switch(&spec).is_ok());
//! assert!(validate_request(&request).is_ok());
//!
//! let json = spec.to_json().unwrap();
//! assert_eq!(SwitchSpec::from_json(&json).unwrap(), spec);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation and presets
//! - [`refs`]: Control and driver attribute references
//! - [`pose`]: World poses, channel masks and rotate orders
//! - [`switch`]: Space and IK/FK switch specs
//! - [`bake`]: Bake modes and frame windows
//! - [`settings`]: Tunable switch settings
//! - [`preset`]: Preset file I/O
//! - [`validation`]: Structural validation

pub mod bake;
pub mod error;
pub mod pose;
pub mod preset;
pub mod refs;
pub mod settings;
pub mod switch;
pub mod validation;

// Re-export commonly used types at the crate root
pub use bake::{BakeMode, BakeRequest, FrameWindow, MAX_BAKE_FRAMES};
pub use error::{
    AttributePathError, ErrorCode, PresetError, ReportableError, ValidationError,
    ValidationResult, ValidationWarning, WarningCode,
};
pub use pose::{angle_delta_degrees, ChannelMask, Pose, RotateOrder};
pub use preset::{load_preset, save_preset};
pub use refs::{AttributeRef, ControlRef};
pub use settings::{SwitchSettings, DEFAULT_POLE_DISTANCE, DEFAULT_PROBE_ITERATIONS};
pub use switch::{IkFkDirection, IkFkSwitchSpec, SpaceSwitchSpec, SwitchSpec};
pub use validation::{check_frame_count, validate_request, validate_settings, validate_switch};
