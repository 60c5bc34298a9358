//! Switch specifications: what to flip and which controls to keep in place.
//!
//! A [`SwitchSpec`] is built once per invocation, validated right before use
//! and discarded afterwards. Its JSON form is the preset format: a flat map
//! whose `"mode"` field selects the variant.

use serde::{Deserialize, Serialize};

use crate::refs::{AttributeRef, ControlRef};

// =============================================================================
// Switch Spec
// =============================================================================

/// The full user intent for one switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum SwitchSpec {
    /// Move a control from one parent space to another.
    #[serde(rename = "space switch")]
    Space(SpaceSwitchSpec),
    /// Match an FK chain to its IK chain or back.
    #[serde(rename = "ikfk switch")]
    IkFk(IkFkSwitchSpec),
}

impl SwitchSpec {
    /// Returns the preset mode string of this spec.
    pub fn mode_name(&self) -> &'static str {
        match self {
            SwitchSpec::Space(_) => "space switch",
            SwitchSpec::IkFk(_) => "ikfk switch",
        }
    }

    /// Driver configuration that holds before the switch.
    pub fn source(&self) -> &AttributeRef {
        match self {
            SwitchSpec::Space(spec) => &spec.source,
            SwitchSpec::IkFk(spec) => spec.source_switch(),
        }
    }

    /// Driver configuration that holds after the switch.
    pub fn target(&self) -> &AttributeRef {
        match self {
            SwitchSpec::Space(spec) => &spec.target,
            SwitchSpec::IkFk(spec) => spec.target_switch(),
        }
    }

    /// Every control and joint named by the switch, with its preset field name.
    pub fn controls(&self) -> Vec<(&'static str, &ControlRef)> {
        match self {
            SwitchSpec::Space(spec) => vec![("target control", &spec.control)],
            SwitchSpec::IkFk(spec) => vec![
                ("shoulder joint", &spec.shoulder_joint),
                ("elbow joint", &spec.elbow_joint),
                ("wrist joint", &spec.wrist_joint),
                ("fk shoulder", &spec.fk_shoulder),
                ("fk elbow", &spec.fk_elbow),
                ("fk wrist", &spec.fk_wrist),
                ("ik elbow", &spec.ik_elbow),
                ("ik wrist", &spec.ik_wrist),
            ],
        }
    }

    /// Every driver attribute named by the switch, with its preset field name.
    pub fn attributes(&self) -> Vec<(&'static str, &AttributeRef)> {
        match self {
            SwitchSpec::Space(spec) => vec![
                ("source space", &spec.source),
                ("target space", &spec.target),
            ],
            SwitchSpec::IkFk(spec) => vec![
                ("fk switch", &spec.fk_switch),
                ("fk visibility", &spec.fk_visibility),
                ("ik switch", &spec.ik_switch),
                ("ik visibility", &spec.ik_visibility),
            ],
        }
    }

    /// Controls whose existing keyframes define the bake reference set.
    pub fn key_reference_controls(&self) -> Vec<&ControlRef> {
        match self {
            SwitchSpec::Space(spec) => vec![&spec.control],
            SwitchSpec::IkFk(spec) => {
                let mut controls: Vec<&ControlRef> = spec.fk_controls().to_vec();
                controls.extend(spec.ik_controls());
                controls
            }
        }
    }
}

// =============================================================================
// Space Switch
// =============================================================================

/// A space switch: one control, one driver flipped from source to target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceSwitchSpec {
    /// The control whose world pose is preserved.
    #[serde(rename = "target control")]
    pub control: ControlRef,
    /// Driver attribute and value of the current space.
    #[serde(rename = "source space")]
    pub source: AttributeRef,
    /// Driver attribute and value of the space to switch to.
    #[serde(rename = "target space")]
    pub target: AttributeRef,
}

impl SpaceSwitchSpec {
    /// Creates a new space switch spec.
    pub fn new(control: impl Into<ControlRef>, source: AttributeRef, target: AttributeRef) -> Self {
        Self {
            control: control.into(),
            source,
            target,
        }
    }
}

// =============================================================================
// IK/FK Switch
// =============================================================================

/// Direction of an IK/FK switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IkFkDirection {
    /// Match FK controls to the IK-driven skeleton, then flip to FK.
    #[default]
    #[serde(rename = "ik to fk")]
    IkToFk,
    /// Match IK wrist and pole controls to the FK-driven skeleton, then flip to IK.
    #[serde(rename = "fk to ik")]
    FkToIk,
}

impl IkFkDirection {
    /// Returns the direction as its preset string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IkFkDirection::IkToFk => "ik to fk",
            IkFkDirection::FkToIk => "fk to ik",
        }
    }
}

/// An IK/FK switch over a three-joint limb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkFkSwitchSpec {
    /// Skeleton shoulder joint.
    #[serde(rename = "shoulder joint")]
    pub shoulder_joint: ControlRef,
    /// Skeleton elbow joint.
    #[serde(rename = "elbow joint")]
    pub elbow_joint: ControlRef,
    /// Skeleton wrist joint.
    #[serde(rename = "wrist joint")]
    pub wrist_joint: ControlRef,
    /// FK shoulder control (rotation only).
    #[serde(rename = "fk shoulder")]
    pub fk_shoulder: ControlRef,
    /// FK elbow control (rotation only).
    #[serde(rename = "fk elbow")]
    pub fk_elbow: ControlRef,
    /// FK wrist control (rotation only).
    #[serde(rename = "fk wrist")]
    pub fk_wrist: ControlRef,
    /// Switch attribute and the value selecting FK.
    #[serde(rename = "fk switch")]
    pub fk_switch: AttributeRef,
    /// FK visibility attribute and its visible value.
    #[serde(rename = "fk visibility")]
    pub fk_visibility: AttributeRef,
    /// IK pole-vector (elbow) control.
    #[serde(rename = "ik elbow")]
    pub ik_elbow: ControlRef,
    /// IK wrist (handle) control.
    #[serde(rename = "ik wrist")]
    pub ik_wrist: ControlRef,
    /// Switch attribute and the value selecting IK.
    #[serde(rename = "ik switch")]
    pub ik_switch: AttributeRef,
    /// IK visibility attribute and its visible value.
    #[serde(rename = "ik visibility")]
    pub ik_visibility: AttributeRef,
    /// Which way to switch.
    #[serde(default)]
    pub direction: IkFkDirection,
}

impl IkFkSwitchSpec {
    /// Sets the switch direction.
    pub fn with_direction(mut self, direction: IkFkDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Skeleton joints, shoulder to wrist.
    pub fn joints(&self) -> [&ControlRef; 3] {
        [&self.shoulder_joint, &self.elbow_joint, &self.wrist_joint]
    }

    /// FK controls, shoulder to wrist.
    pub fn fk_controls(&self) -> [&ControlRef; 3] {
        [&self.fk_shoulder, &self.fk_elbow, &self.fk_wrist]
    }

    /// IK controls, wrist then elbow.
    pub fn ik_controls(&self) -> [&ControlRef; 2] {
        [&self.ik_wrist, &self.ik_elbow]
    }

    /// Switch attribute holding before the switch.
    pub fn source_switch(&self) -> &AttributeRef {
        match self.direction {
            IkFkDirection::IkToFk => &self.ik_switch,
            IkFkDirection::FkToIk => &self.fk_switch,
        }
    }

    /// Switch attribute holding after the switch.
    pub fn target_switch(&self) -> &AttributeRef {
        match self.direction {
            IkFkDirection::IkToFk => &self.fk_switch,
            IkFkDirection::FkToIk => &self.ik_switch,
        }
    }

    /// Visibility attribute of the mode being switched to.
    pub fn target_visibility(&self) -> &AttributeRef {
        match self.direction {
            IkFkDirection::IkToFk => &self.fk_visibility,
            IkFkDirection::FkToIk => &self.ik_visibility,
        }
    }

    /// Visibility attribute of the mode being switched away from.
    pub fn source_visibility(&self) -> &AttributeRef {
        match self.direction {
            IkFkDirection::IkToFk => &self.ik_visibility,
            IkFkDirection::FkToIk => &self.fk_visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm_spec() -> IkFkSwitchSpec {
        IkFkSwitchSpec {
            shoulder_joint: "rig:shoulder_l".into(),
            elbow_joint: "rig:elbow_l".into(),
            wrist_joint: "rig:wrist_l".into(),
            fk_shoulder: "rig:fk_shoulder_l".into(),
            fk_elbow: "rig:fk_elbow_l".into(),
            fk_wrist: "rig:fk_wrist_l".into(),
            fk_switch: AttributeRef::new("rig:arm_settings_l", "IKFK", 1.0),
            fk_visibility: AttributeRef::new("rig:arm_settings_l", "fkVis", 1.0),
            ik_elbow: "rig:ik_elbow_l".into(),
            ik_wrist: "rig:ik_hand_l".into(),
            ik_switch: AttributeRef::new("rig:arm_settings_l", "IKFK", 0.0),
            ik_visibility: AttributeRef::new("rig:arm_settings_l", "ikVis", 1.0),
            direction: IkFkDirection::IkToFk,
        }
    }

    #[test]
    fn test_direction_selects_drivers() {
        let spec = arm_spec();
        assert_eq!(spec.source_switch().value, 0.0);
        assert_eq!(spec.target_switch().value, 1.0);
        assert_eq!(spec.target_visibility().attribute, "fkVis");

        let spec = spec.with_direction(IkFkDirection::FkToIk);
        assert_eq!(spec.source_switch().value, 1.0);
        assert_eq!(spec.target_switch().value, 0.0);
        assert_eq!(spec.target_visibility().attribute, "ikVis");
    }

    #[test]
    fn test_space_switch_tagged_json() {
        let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
            "hand_l_ctl",
            AttributeRef::new("hand_l_ctl", "space", 0.0),
            AttributeRef::new("hand_l_ctl", "space", 2.0),
        ));
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["mode"], "space switch");
        assert_eq!(value["target control"], "hand_l_ctl");
        assert_eq!(value["source space"][0], "hand_l_ctl.space");
        assert_eq!(value["target space"][1], 2.0);
    }

    #[test]
    fn test_ikfk_reference_controls_cover_both_chains() {
        let spec = SwitchSpec::IkFk(arm_spec());
        let names: Vec<&str> = spec
            .key_reference_controls()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "rig:fk_shoulder_l",
                "rig:fk_elbow_l",
                "rig:fk_wrist_l",
                "rig:ik_hand_l",
                "rig:ik_elbow_l"
            ]
        );
        assert_eq!(spec.controls().len(), 8);
        assert_eq!(spec.attributes().len(), 4);
    }
}
