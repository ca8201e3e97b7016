//! Transform hierarchy
//!
//! A forest of named nodes, each carrying a local [`Pose`] and per-axis
//! scale:
//! - [`Node`]: one hierarchy element with its transform cache
//! - [`SceneGraph`]: the arena owning the nodes and every tree mutation
//! - [`diagnostics`]: read-only health checks and statistics
//!
//! [`Pose`]: crate::math::Pose

pub mod diagnostics;
pub mod graph;
pub mod node;

pub use diagnostics::{DiagnosticsConfig, HierarchyStats};
pub use graph::{NodeBuilder, SceneGraph};
pub use node::{CacheStats, Node};

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a [`Node`] inside a [`SceneGraph`].
    ///
    /// Handles are copyable non-owning keys; one goes stale when its node is
    /// removed and is never reused for another node.
    pub struct NodeHandle;
}
