use glam::{DMat4, DVec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::errors::{ArmatureError, Result};
use crate::math::Pose;
use crate::scene::NodeHandle;
use crate::scene::node::{CacheStats, Node};

const NO_CHILDREN: &[NodeHandle] = &[];

/// Arena-backed node hierarchy with cached transform propagation.
///
/// Nodes are owned by the graph's slotmap; a [`NodeHandle`] stays valid
/// until its node is removed. Parent links are plain handles (no owning
/// back-pointer), so cycle checks walk the ancestor chain in O(depth) and
/// ownership can never loop.
///
/// Transform queries are lazy. Mutating a pose, scale, or parent link only
/// flags caches stale; the next [`world_transform`] query recomputes exactly
/// the dirty stretch of the ancestor chain and nothing else.
///
/// [`world_transform`]: SceneGraph::world_transform
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl SceneGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Starts building a node with chained configuration.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Adds a node to the graph as a root.
    ///
    /// The value enters the graph as a detached leaf: any parent or child
    /// links it carried are cleared and its caches are flagged stale.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        node.cache.mark_dirty();
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node directly under `parent`.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(ArmatureError::NodeNotFound(parent));
        }
        let handle = self.add_node(child);
        self.set_parent(handle, Some(parent))?;
        Ok(handle)
    }

    /// Removes a node, detaching it from its parent and promoting its
    /// children to roots. Children survive the removal and can be
    /// re-parented independently.
    ///
    /// Returns the extracted node (links cleared), or `None` for a stale
    /// handle.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Option<Node> {
        self.nodes.get(handle)?;
        self.detach_links(handle);

        let mut node = self.nodes.remove(handle)?;
        node.parent = None;
        let children = std::mem::take(&mut node.children);
        for child in children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
            self.root_nodes.push(child);
            self.mark_subtree_dirty(child);
        }
        Some(node)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root handles, in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    /// Read-only access to a node.
    #[inline]
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Iterates every `(handle, node)` pair in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// Handle of the first node named `name`, if any.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find_map(|(handle, node)| (node.name == name).then_some(handle))
    }

    // ========================================================================
    // Hierarchy mutation
    // ========================================================================

    /// Re-parents `child` under `new_parent`, or detaches it to a root for
    /// `None`.
    ///
    /// The move is validated before anything mutates: a stale handle fails
    /// with [`ArmatureError::NodeNotFound`], and a `new_parent` lying inside
    /// `child`'s own subtree (or being `child` itself) fails with
    /// [`ArmatureError::HierarchyCycle`]. On failure the links of every node
    /// involved are left exactly as they were.
    pub fn set_parent(&mut self, child: NodeHandle, new_parent: Option<NodeHandle>) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(ArmatureError::NodeNotFound(child));
        }
        if let Some(parent) = new_parent {
            if !self.nodes.contains_key(parent) {
                return Err(ArmatureError::NodeNotFound(parent));
            }
            // Walk up from the requested parent; meeting `child` on the way
            // means the attach would close a loop.
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(ArmatureError::HierarchyCycle { child, parent });
                }
                cursor = self.nodes.get(ancestor).and_then(|n| n.parent);
            }
        }

        self.detach_links(child);

        match new_parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent)
                    && !parent_node.children.contains(&child)
                {
                    parent_node.children.push(child);
                }
            }
            None => self.root_nodes.push(child),
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = new_parent;
        }
        self.mark_subtree_dirty(child);
        Ok(())
    }

    /// Attaches `child` under `parent`. Shorthand for
    /// `set_parent(child, Some(parent))`.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.set_parent(child, Some(parent))
    }

    /// Detaches `child` from `parent`, promoting it to a root. The child
    /// stays in the graph with its own subtree intact.
    ///
    /// Does nothing when `child` is not currently a child of `parent`;
    /// detaching twice is as good as detaching once.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        let is_child = self
            .nodes
            .get(child)
            .is_some_and(|node| node.parent == Some(parent));
        if !is_child {
            log::trace!("remove_child: {child:?} is not a child of {parent:?}");
            return;
        }
        self.detach_links(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.root_nodes.push(child);
        self.mark_subtree_dirty(child);
    }

    /// Unlinks `child` from its parent's child list, or from the root set
    /// when parentless. The child's own parent field is left untouched.
    fn detach_links(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(parent) = old_parent {
            if let Some(parent_node) = self.nodes.get_mut(parent)
                && let Some(pos) = parent_node.children.iter().position(|&c| c == child)
            {
                parent_node.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&r| r == child) {
            self.root_nodes.remove(pos);
        }
    }

    /// Parent handle of `handle` (`None` for roots and stale handles).
    #[inline]
    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle).and_then(|node| node.parent)
    }

    /// Child handles of `handle` (empty for leaves and stale handles).
    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(handle)
            .map_or(NO_CHILDREN, |node| node.children.as_slice())
    }

    // ========================================================================
    // Pose, scale, transforms
    // ========================================================================

    /// Replaces a node's local pose and invalidates the cached world
    /// matrices of its whole subtree.
    pub fn set_pose(&mut self, handle: NodeHandle, pose: Pose) -> Result<()> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or(ArmatureError::NodeNotFound(handle))?;
        node.pose = pose;
        self.mark_subtree_dirty(handle);
        Ok(())
    }

    /// A node's local pose.
    #[must_use]
    pub fn pose(&self, handle: NodeHandle) -> Option<Pose> {
        self.nodes.get(handle).map(|node| node.pose)
    }

    /// Replaces a node's scale and invalidates the cached world matrices of
    /// its whole subtree.
    pub fn set_scale(&mut self, handle: NodeHandle, scale: DVec3) -> Result<()> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or(ArmatureError::NodeNotFound(handle))?;
        node.scale = scale;
        self.mark_subtree_dirty(handle);
        Ok(())
    }

    /// A node's per-axis scale.
    #[must_use]
    pub fn scale(&self, handle: NodeHandle) -> Option<DVec3> {
        self.nodes.get(handle).map(|node| node.scale)
    }

    /// Flags the cached matrices of `handle` and every descendant stale.
    ///
    /// A world matrix is a multiplicative chain, so an ancestor mutation
    /// invalidates the whole subtree below it even though the descendants'
    /// own poses did not change. Iterative so deep chains cannot overflow
    /// the call stack.
    fn mark_subtree_dirty(&mut self, handle: NodeHandle) {
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current) {
                node.cache.mark_dirty();
                stack.extend_from_slice(&node.children);
            }
        }
    }

    /// Local matrix of `handle`: pose and scale composed as
    /// translate × rotate × scale. Recomputes only when flagged stale.
    pub fn local_transform(&mut self, handle: NodeHandle) -> Option<DMat4> {
        let node = self.nodes.get_mut(handle)?;
        if node.cache.local_dirty {
            node.cache.local = node.pose.to_matrix_with_scale(node.scale);
            node.cache.local_dirty = false;
        }
        Some(node.cache.local)
    }

    /// World matrix of `handle`: the local matrix composed with every
    /// ancestor's.
    ///
    /// A query against a stale cache climbs to the nearest ancestor whose
    /// world matrix is still valid, then recomputes downward from there, so
    /// repeated queries cost O(1) until the next mutation. Returns `None`
    /// for a stale handle.
    pub fn world_transform(&mut self, handle: NodeHandle) -> Option<DMat4> {
        // Climb the ancestor chain collecting the stretch that needs
        // recomputation, stopping at the first clean world cache.
        let mut pending = Vec::new();
        let mut clean_ancestor = None;
        let mut cursor = Some(handle);
        while let Some(current) = cursor {
            let node = self.nodes.get(current)?;
            if node.cache.world_dirty {
                pending.push(current);
                cursor = node.parent;
            } else {
                clean_ancestor = Some(current);
                break;
            }
        }

        if pending.is_empty() {
            let node = self.nodes.get_mut(handle)?;
            node.cache.hits += 1;
            return Some(node.cache.world);
        }

        if let Some(ancestor) = clean_ancestor
            && let Some(node) = self.nodes.get_mut(ancestor)
        {
            node.cache.hits += 1;
        }

        // Recompute top-down so every node sees a valid parent matrix.
        for &current in pending.iter().rev() {
            let local = self.local_transform(current)?;
            let parent_world = match self.nodes.get(current).and_then(|n| n.parent) {
                Some(parent) => self.nodes.get(parent)?.cache.world,
                None => DMat4::IDENTITY,
            };
            let node = self.nodes.get_mut(current)?;
            node.cache.world = parent_world * local;
            node.cache.world_dirty = false;
            node.cache.misses += 1;
        }

        self.nodes.get(handle).map(|node| node.cache.world)
    }

    /// Applies a name-to-pose snapshot onto every node whose name matches.
    ///
    /// This is the bridge from animation playback: feed it the map returned
    /// by [`Player::current_poses`] once per frame.
    ///
    /// [`Player::current_poses`]: crate::animation::Player::current_poses
    pub fn apply_poses(&mut self, poses: &FxHashMap<String, Pose>) {
        let targets: Vec<(NodeHandle, Pose)> = self
            .nodes
            .iter()
            .filter_map(|(handle, node)| poses.get(&node.name).map(|pose| (handle, *pose)))
            .collect();
        for (handle, pose) in targets {
            if let Some(node) = self.nodes.get_mut(handle) {
                node.pose = pose;
            }
            self.mark_subtree_dirty(handle);
        }
    }

    // ========================================================================
    // Cache statistics
    // ========================================================================

    /// World-cache counters for one node.
    #[must_use]
    pub fn cache_stats(&self, handle: NodeHandle) -> Option<CacheStats> {
        self.nodes.get(handle).map(Node::cache_stats)
    }

    /// World-cache counters summed over the whole graph.
    #[must_use]
    pub fn total_cache_stats(&self) -> CacheStats {
        let mut total = CacheStats::default();
        for (_, node) in &self.nodes {
            total.hits += node.cache.hits;
            total.misses += node.cache.misses;
        }
        total
    }

    /// Zeroes every node's cache counters. Cached matrices and dirty flags
    /// are untouched.
    pub fn reset_cache_stats(&mut self) {
        for (_, node) in &mut self.nodes {
            node.cache.hits = 0;
            node.cache.misses = 0;
        }
    }
}

/// Chained construction of a node inside a [`SceneGraph`].
///
/// Created by [`SceneGraph::build_node`]; [`build`](NodeBuilder::build)
/// inserts the configured node and returns its handle.
pub struct NodeBuilder<'a> {
    graph: &'a mut SceneGraph,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    fn new(graph: &'a mut SceneGraph, name: &str) -> Self {
        Self {
            graph,
            node: Node::new(name),
            parent: None,
        }
    }

    /// Sets the initial local pose.
    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.node.set_pose(pose);
        self
    }

    /// Sets the initial per-axis scale.
    #[must_use]
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.node.set_scale(scale);
        self
    }

    /// Attaches the node under `parent` on build instead of making it a
    /// root.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node into the graph. Fails only when the configured
    /// parent handle is stale.
    pub fn build(self) -> Result<NodeHandle> {
        match self.parent {
            Some(parent) => self.graph.add_to_parent(self.node, parent),
            None => Ok(self.graph.add_node(self.node)),
        }
    }
}
