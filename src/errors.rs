//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`ArmatureError`] covers all failure modes including:
//! - Structural hierarchy violations (cycles, stale handles)
//! - Animation data violations (negative keyframe times, mismatched blends)
//! - Configuration errors (unknown interpolation mode names)
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ArmatureError>`. Every rejected call leaves prior
//! state intact; the caller may correct the input and retry.

use thiserror::Error;

use crate::scene::NodeHandle;

/// The main error type for the armature core.
///
/// Each variant describes a structural or configuration violation detected
/// synchronously at the offending call. Degenerate geometry (zero axes,
/// coincident keyframe times, out-of-range sample times) is never an error;
/// those cases resolve to documented fallback values instead.
#[derive(Error, Debug)]
pub enum ArmatureError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// Re-parenting would make a node its own ancestor.
    #[error("Hierarchy cycle: {parent:?} is inside the subtree of {child:?}")]
    HierarchyCycle {
        /// The node being re-parented
        child: NodeHandle,
        /// The requested parent, found among `child`'s descendants
        parent: NodeHandle,
    },

    /// The handle does not resolve to a live node in the graph.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Keyframe times must be non-negative.
    #[error("Negative keyframe time: {0}")]
    NegativeKeyframeTime(f64),

    /// A bracket mixes pose representations; blending across them is
    /// undefined.
    #[error("Cannot blend {left} pose with {right} pose")]
    MixedPoseBlend {
        /// Representation of the earlier keyframe
        left: &'static str,
        /// Representation of the later keyframe
        right: &'static str,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The interpolation mode name is not one of the supported set.
    #[error("Unknown interpolation mode {0:?} (expected \"step\", \"linear\" or \"smooth\")")]
    UnknownInterpolationMode(String),
}

/// Alias for `Result<T, ArmatureError>`.
pub type Result<T> = std::result::Result<T, ArmatureError>;
