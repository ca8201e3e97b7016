use glam::{DMat4, DVec3};

use crate::math::Pose;
use crate::scene::NodeHandle;

/// Cached transform matrices with their dirty bits and query counters.
///
/// Recomputation is a pure function of (pose, scale, parent world matrix);
/// this struct only memoizes it. Staleness is binary: a flag is either set,
/// and the next query recomputes, or clear, and the cached matrix is
/// authoritative. There is no intermediate state.
#[derive(Debug, Clone)]
pub struct TransformCache {
    /// Local matrix, valid while `local_dirty` is clear
    pub(crate) local: DMat4,
    /// World matrix, valid while `world_dirty` is clear
    pub(crate) world: DMat4,
    pub(crate) local_dirty: bool,
    pub(crate) world_dirty: bool,
    /// World queries answered from a clean cache
    pub(crate) hits: u64,
    /// World-matrix recomputations
    pub(crate) misses: u64,
}

impl TransformCache {
    fn new() -> Self {
        Self {
            local: DMat4::IDENTITY,
            world: DMat4::IDENTITY,
            local_dirty: true,
            world_dirty: true,
            hits: 0,
            misses: 0,
        }
    }

    /// Flags both cached matrices stale.
    pub(crate) fn mark_dirty(&mut self) {
        self.local_dirty = true;
        self.world_dirty = true;
    }
}

/// Hit/miss counters for one node's world-transform cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered without recomputation
    pub hits: u64,
    /// Recomputations performed by queries
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of queries answered from a clean cache, in `[0, 1]`.
    /// Zero when nothing has been queried yet.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A scene-graph element: a name, a local pose, a per-axis scale, and its
/// place in the tree.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child links:
/// - `parent`: handle of the owning parent (`None` for roots)
/// - `children`: handles of the nodes directly below
///
/// Both sides of the link are kept consistent by [`SceneGraph`] mutations;
/// a node outside a graph has no links.
///
/// # Transform
///
/// The local matrix derives from pose and scale alone; the world matrix
/// additionally folds in every ancestor's. Both live in a [`TransformCache`]
/// and are recomputed lazily by the graph's transform queries.
///
/// [`SceneGraph`]: crate::scene::SceneGraph
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) pose: Pose,
    pub(crate) scale: DVec3,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) cache: TransformCache,
}

impl Node {
    /// Creates a detached node with an identity pose and unit scale.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            pose: Pose::IDENTITY,
            scale: DVec3::ONE,
            parent: None,
            children: Vec::new(),
            cache: TransformCache::new(),
        }
    }

    /// The node's name. Names are identifiers for animation targeting and
    /// diagnostics, not required to be unique.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local pose relative to the parent frame.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// The per-axis scale applied before the pose.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// Replaces the local pose and flags the cached matrices stale.
    ///
    /// Prefer [`SceneGraph::set_pose`] for a node already in a graph: it
    /// also invalidates every descendant's world matrix.
    ///
    /// [`SceneGraph::set_pose`]: crate::scene::SceneGraph::set_pose
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.cache.mark_dirty();
    }

    /// Replaces the scale and flags the cached matrices stale.
    ///
    /// Prefer [`SceneGraph::set_scale`] for a node already in a graph, for
    /// the same reason as [`Node::set_pose`].
    ///
    /// [`SceneGraph::set_scale`]: crate::scene::SceneGraph::set_scale
    pub fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
        self.cache.mark_dirty();
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Snapshot of this node's world-cache counters.
    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache.hits,
            misses: self.cache.misses,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
