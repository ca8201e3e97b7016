//! Rotation and pose math
//!
//! Value types and free functions shared by the hierarchy and the animation
//! engine:
//! - [`rotation`]: axis-angle/quaternion conversions and interpolation with
//!   pinned-down degenerate behavior
//! - [`Pose`]: tagged translation+rotation value in either representation

pub mod pose;
pub mod rotation;

pub use pose::{Pose, compose_transform, decompose_transform};
