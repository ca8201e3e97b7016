//! Scene-graph and keyframe animation core for real-time 3D applications.
//!
//! Three components build on each other:
//! - [`math`]: rotation and pose values with pinned-down degenerate behavior
//! - [`scene`]: a node hierarchy with cycle rejection and cached world
//!   transforms
//! - [`animation`]: keyframe tracks, clips, and a playback cursor
//!
//! The expected frame cycle: advance a [`Player`] by the frame delta, apply
//! its pose snapshot onto the [`SceneGraph`] via
//! [`apply_poses`](SceneGraph::apply_poses), then read world transforms off
//! the graph for rendering.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod math;
pub mod scene;

pub use animation::{Clip, InterpolationMode, Keyframe, Player, Track};
pub use errors::{ArmatureError, Result};
pub use math::{Pose, compose_transform, decompose_transform, rotation};
pub use scene::{
    CacheStats, DiagnosticsConfig, HierarchyStats, Node, NodeBuilder, NodeHandle, SceneGraph,
    diagnostics,
};
