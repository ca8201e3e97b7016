//! Hierarchy health checks and statistics.
//!
//! Everything here is a read-only traversal over a [`SceneGraph`]: depth and
//! descendant queries, per-node aggregates, threshold validation, and a
//! textual tree dump. None of it participates in the invariants the graph
//! maintains; warnings never block a mutation.

use std::fmt::Write;

use crate::scene::graph::SceneGraph;
use crate::scene::{NodeHandle, node::CacheStats};

/// Thresholds for [`validate`]. Exceeding one produces a warning, nothing
/// more.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsConfig {
    /// Warn when a node sits deeper than this many edges from its root
    pub depth_warning: usize,
    /// Warn when a node has more direct children than this
    pub children_warning: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            depth_warning: 15,
            children_warning: 100,
        }
    }
}

/// Aggregate figures for one node's place in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    /// Edges from the node up to its root
    pub depth: usize,
    /// Direct children
    pub child_count: usize,
    /// Nodes anywhere below, children included
    pub descendant_count: usize,
    /// Edges from the node down to its deepest descendant
    pub subtree_depth: usize,
}

/// Edges from `handle` up to its root. `None` for a stale handle.
#[must_use]
pub fn depth(graph: &SceneGraph, handle: NodeHandle) -> Option<usize> {
    graph.node(handle)?;
    let mut depth = 0;
    let mut cursor = graph.parent(handle);
    while let Some(current) = cursor {
        depth += 1;
        cursor = graph.parent(current);
    }
    Some(depth)
}

/// Edges from `handle` down to its deepest descendant (`0` for a leaf).
/// `None` for a stale handle.
#[must_use]
pub fn subtree_depth(graph: &SceneGraph, handle: NodeHandle) -> Option<usize> {
    graph.node(handle)?;
    let mut deepest = 0;
    let mut stack = vec![(handle, 0usize)];
    while let Some((current, level)) = stack.pop() {
        deepest = deepest.max(level);
        for &child in graph.children(current) {
            stack.push((child, level + 1));
        }
    }
    Some(deepest)
}

/// Nodes anywhere below `handle`, children included. `None` for a stale
/// handle.
#[must_use]
pub fn descendant_count(graph: &SceneGraph, handle: NodeHandle) -> Option<usize> {
    graph.node(handle)?;
    let mut count = 0;
    let mut stack: Vec<NodeHandle> = graph.children(handle).to_vec();
    while let Some(current) = stack.pop() {
        count += 1;
        stack.extend_from_slice(graph.children(current));
    }
    Some(count)
}

/// All of one node's aggregates in a single pass-friendly value.
#[must_use]
pub fn stats(graph: &SceneGraph, handle: NodeHandle) -> Option<HierarchyStats> {
    Some(HierarchyStats {
        depth: depth(graph, handle)?,
        child_count: graph.children(handle).len(),
        descendant_count: descendant_count(graph, handle)?,
        subtree_depth: subtree_depth(graph, handle)?,
    })
}

/// Walks the whole graph and reports nodes exceeding the configured
/// thresholds.
///
/// Each finding is returned as a human-readable line and also emitted via
/// `log::warn!`. An empty vector means a healthy tree.
#[must_use]
pub fn validate(graph: &SceneGraph, config: &DiagnosticsConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    for &root in graph.roots() {
        let mut stack = vec![(root, 0usize)];
        while let Some((current, level)) = stack.pop() {
            let Some(node) = graph.node(current) else {
                continue;
            };
            if level > config.depth_warning {
                warnings.push(format!(
                    "Node \"{}\" sits at depth {} (threshold {})",
                    node.name(),
                    level,
                    config.depth_warning
                ));
            }
            let child_count = node.children().len();
            if child_count > config.children_warning {
                warnings.push(format!(
                    "Node \"{}\" has {} children (threshold {})",
                    node.name(),
                    child_count,
                    config.children_warning
                ));
            }
            for &child in node.children() {
                stack.push((child, level + 1));
            }
        }
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }
    warnings
}

/// Renders the forest as an indented text dump for debugging.
///
/// With `show_stats` each line is annotated with the node's child and
/// descendant counts and its cache hit rate.
#[must_use]
pub fn format_tree(graph: &SceneGraph, show_stats: bool) -> String {
    let mut out = String::new();
    for &root in graph.roots() {
        format_subtree(graph, root, 0, show_stats, &mut out);
    }
    out
}

fn format_subtree(
    graph: &SceneGraph,
    handle: NodeHandle,
    level: usize,
    show_stats: bool,
    out: &mut String,
) {
    let Some(node) = graph.node(handle) else {
        return;
    };
    let indent = "  ".repeat(level);
    let name = if node.name().is_empty() {
        "<unnamed>"
    } else {
        node.name()
    };
    if show_stats {
        let CacheStats { hits, misses } = node.cache_stats();
        let _ = writeln!(
            out,
            "{indent}{name} (children: {}, descendants: {}, cache {hits}/{})",
            node.children().len(),
            descendant_count(graph, handle).unwrap_or(0),
            hits + misses,
        );
    } else {
        let _ = writeln!(out, "{indent}{name}");
    }
    for &child in node.children() {
        format_subtree(graph, child, level + 1, show_stats, out);
    }
}
