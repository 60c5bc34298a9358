//! Spaceswitch Bake Core
//!
//! This crate flips a space or IK/FK driver while keeping the driven controls
//! where they are in world space, at one frame or across a baked range.
//!
//! # Overview
//!
//! - [`scene::AnimatedScene`] is the host interface: node lookup,
//!   attributes, keyframes, world transforms, the time cursor, undo and
//!   viewport control, and a temporary constraint probe.
//! - [`planner::TransitionPlanner`] validates a request, re-checks every
//!   reference against the scene, captures the poses to restore and lays out
//!   ordered [`step::TransitionStep`]s.
//! - [`executor::execute`] applies those steps.
//! - [`switcher::Switcher`] runs the whole thing inside a
//!   [`guard::SceneGuard`].
//! - [`memory::MemoryScene`] is a serializable in-memory scene.
//!
//! # Example
//!
//! ```
//! use spaceswitch_bake::memory::{AnimCurve, MemoryNode, MemoryScene, ParentBinding, SpaceOption};
//! use spaceswitch_bake::{AnimatedScene, Switcher};
//! use spaceswitch_spec::{AttributeRef, BakeRequest, SpaceSwitchSpec, SwitchSpec, SwitchSettings};
//!
//! let mut scene = MemoryScene::new()
//!     .with_current_time(10.0)
//!     .with_node("chest", MemoryNode::transform().with_translation([0.0, 12.0, 0.0]))
//!     .with_node(
//!         "hand",
//!         MemoryNode::transform()
//!             .with_channel("translateX", AnimCurve::keyed(&[(0.0, 0.0), (20.0, 4.0)]))
//!             .with_channel("space", AnimCurve::constant(0.0))
//!             .with_parent(ParentBinding::Space {
//!                 node: "hand".to_string(),
//!                 attribute: "space".to_string(),
//!                 spaces: vec![SpaceOption::new(0.0, None), SpaceOption::new(1.0, Some("chest"))],
//!             }),
//!     );
//! let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
//!     "hand",
//!     AttributeRef::new("hand", "space", 0.0),
//!     AttributeRef::new("hand", "space", 1.0),
//! ));
//!
//! let hand = "hand".to_string();
//! let before = scene.world_transform(&hand).unwrap();
//! let report = Switcher::new(SwitchSettings::default())
//!     .run(&mut scene, &spec, &BakeRequest::current_frame())
//!     .unwrap();
//!
//! assert_eq!(report.plan.times(), vec![9.0, 10.0]);
//! assert!(scene.world_transform(&hand).unwrap().approx_eq(&before, 1e-9));
//! ```

pub mod capture;
pub mod error;
pub mod executor;
pub mod guard;
pub mod ikfk;
pub mod memory;
pub mod planner;
mod rig;
pub mod scene;
pub mod step;
pub mod switcher;

// Re-export commonly used types at the crate root
pub use error::{BakeError, BakeResult, SceneError, SceneResult};
pub use executor::execute;
pub use guard::SceneGuard;
pub use ikfk::{pole_vector_position, FkMatch, IkFkReconstructor, IkMatch};
pub use memory::MemoryScene;
pub use planner::{Advisory, Prepared, Sampling, TransitionPlanner};
pub use scene::{AnimatedScene, ConstraintKind, NodeType};
pub use step::{PoseAction, PoseTarget, StepRole, TransitionPlan, TransitionStep};
pub use switcher::{SwitchReport, Switcher};
