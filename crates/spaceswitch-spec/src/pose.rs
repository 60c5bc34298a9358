//! World-space pose, transform channel masks and rotate orders.

use serde::{Deserialize, Serialize};

// =============================================================================
// Pose
// =============================================================================

/// World-space position and rotation of a transform at one point in time.
///
/// Rotation is in degrees, expressed in the rotate order of the node it was
/// read from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pose {
    /// World position [X, Y, Z].
    pub position: [f64; 3],
    /// World rotation [X, Y, Z] in degrees.
    pub rotation: [f64; 3],
}

impl Pose {
    /// Creates a new pose.
    pub fn new(position: [f64; 3], rotation: [f64; 3]) -> Self {
        Self { position, rotation }
    }

    /// Creates a pose with only a position.
    pub fn at(position: [f64; 3]) -> Self {
        Self::new(position, [0.0; 3])
    }

    /// Returns true if both poses match within `tolerance`.
    ///
    /// Rotations are compared per axis modulo 360 degrees.
    pub fn approx_eq(&self, other: &Pose, tolerance: f64) -> bool {
        let position_ok = self
            .position
            .iter()
            .zip(other.position.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance);
        let rotation_ok = self
            .rotation
            .iter()
            .zip(other.rotation.iter())
            .all(|(a, b)| angle_delta_degrees(*a, *b).abs() <= tolerance);
        position_ok && rotation_ok
    }
}

/// Signed smallest difference between two angles, in degrees.
pub fn angle_delta_degrees(a: f64, b: f64) -> f64 {
    let delta = (a - b).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

// =============================================================================
// Channels
// =============================================================================

bitflags::bitflags! {
    /// Selectable subset of the nine transform channels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelMask: u16 {
        const TRANSLATE_X = 1 << 0;
        const TRANSLATE_Y = 1 << 1;
        const TRANSLATE_Z = 1 << 2;
        const ROTATE_X = 1 << 3;
        const ROTATE_Y = 1 << 4;
        const ROTATE_Z = 1 << 5;
        const SCALE_X = 1 << 6;
        const SCALE_Y = 1 << 7;
        const SCALE_Z = 1 << 8;

        const TRANSLATE = Self::TRANSLATE_X.bits()
            | Self::TRANSLATE_Y.bits()
            | Self::TRANSLATE_Z.bits();
        const ROTATE = Self::ROTATE_X.bits()
            | Self::ROTATE_Y.bits()
            | Self::ROTATE_Z.bits();
        const SCALE = Self::SCALE_X.bits()
            | Self::SCALE_Y.bits()
            | Self::SCALE_Z.bits();
        const TRANSFORM = Self::TRANSLATE.bits() | Self::ROTATE.bits();
    }
}

const CHANNEL_ATTRIBUTES: [(ChannelMask, &str); 9] = [
    (ChannelMask::TRANSLATE_X, "translateX"),
    (ChannelMask::TRANSLATE_Y, "translateY"),
    (ChannelMask::TRANSLATE_Z, "translateZ"),
    (ChannelMask::ROTATE_X, "rotateX"),
    (ChannelMask::ROTATE_Y, "rotateY"),
    (ChannelMask::ROTATE_Z, "rotateZ"),
    (ChannelMask::SCALE_X, "scaleX"),
    (ChannelMask::SCALE_Y, "scaleY"),
    (ChannelMask::SCALE_Z, "scaleZ"),
];

impl ChannelMask {
    /// Attribute names of the selected channels, in tx..sz order.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        CHANNEL_ATTRIBUTES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl Serialize for ChannelMask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.attribute_names())
    }
}

// =============================================================================
// Rotate Order
// =============================================================================

/// Euler rotation order of a transform; `Xyz` applies X first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateOrder {
    #[default]
    Xyz,
    Yzx,
    Zxy,
    Xzy,
    Yxz,
    Zyx,
}

impl RotateOrder {
    /// Returns the rotate order as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RotateOrder::Xyz => "xyz",
            RotateOrder::Yzx => "yzx",
            RotateOrder::Zxy => "zxy",
            RotateOrder::Xzy => "xzy",
            RotateOrder::Yxz => "yxz",
            RotateOrder::Zyx => "zyx",
        }
    }
}

impl std::fmt::Display for RotateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mask_names() {
        assert_eq!(
            ChannelMask::ROTATE.attribute_names(),
            vec!["rotateX", "rotateY", "rotateZ"]
        );
        assert_eq!(ChannelMask::TRANSFORM.attribute_names().len(), 6);
        assert!(!ChannelMask::TRANSFORM.intersects(ChannelMask::SCALE));
    }

    #[test]
    fn test_channel_mask_serializes_as_names() {
        let json = serde_json::to_string(&ChannelMask::TRANSLATE).unwrap();
        assert_eq!(json, r#"["translateX","translateY","translateZ"]"#);
    }

    #[test]
    fn test_pose_approx_eq_wraps_angles() {
        let a = Pose::new([1.0, 2.0, 3.0], [179.999_999, 0.0, -90.0]);
        let b = Pose::new([1.0, 2.0, 3.000_001], [-180.0, 360.0, 270.0]);
        assert!(a.approx_eq(&b, 1e-5));
        assert!(!a.approx_eq(&Pose::at([1.0, 2.0, 3.0]), 1e-5));
    }

    #[test]
    fn test_rotate_order_serde() {
        let json = serde_json::to_string(&RotateOrder::Zxy).unwrap();
        assert_eq!(json, "\"zxy\"");
        let parsed: RotateOrder = serde_json::from_str("\"yxz\"").unwrap();
        assert_eq!(parsed, RotateOrder::Yxz);
    }
}
