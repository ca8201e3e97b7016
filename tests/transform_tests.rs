//! Transform Hierarchy Tests
//!
//! Tests for:
//! - Node management (add, remove, orphaning, name lookup, builder)
//! - set_parent cycle rejection and link consistency
//! - add_child / remove_child semantics and idempotence
//! - Lazy local/world transform caching and subtree dirty propagation
//! - Cache hit/miss counters
//! - Depth/descendant diagnostics, threshold validation, tree dump

use std::f64::consts::FRAC_PI_2;

use glam::{DMat4, DVec3, DVec4};

use armature::{ArmatureError, DiagnosticsConfig, Node, Pose, SceneGraph, diagnostics};

const EPSILON: f64 = 1e-9;

fn vec3_approx(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < EPSILON
}

fn world_position(m: DMat4) -> DVec3 {
    (m * DVec4::new(0.0, 0.0, 0.0, 1.0)).truncate()
}

/// root -> mid -> leaf, with the given root translation.
fn chain(root_offset: DVec3) -> (SceneGraph, [armature::NodeHandle; 3]) {
    let mut graph = SceneGraph::new();
    let root = graph
        .build_node("root")
        .with_pose(Pose::from_translation(root_offset))
        .build()
        .unwrap();
    let mid = graph
        .build_node("mid")
        .with_pose(Pose::from_translation(DVec3::Y))
        .with_parent(root)
        .build()
        .unwrap();
    let leaf = graph
        .build_node("leaf")
        .with_pose(Pose::from_translation(DVec3::Z))
        .with_parent(mid)
        .build()
        .unwrap();
    (graph, [root, mid, leaf])
}

// ============================================================================
// Node management
// ============================================================================

#[test]
fn new_node_enters_as_root() {
    let mut graph = SceneGraph::new();
    assert!(graph.is_empty());

    let handle = graph.add_node(Node::new("solo"));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.roots(), &[handle]);
    assert_eq!(graph.node(handle).unwrap().name(), "solo");
    assert_eq!(graph.parent(handle), None);
}

#[test]
fn builder_wires_pose_scale_and_parent() {
    let mut graph = SceneGraph::new();
    let parent = graph.add_node(Node::new("parent"));
    let child = graph
        .build_node("child")
        .with_pose(Pose::from_translation(DVec3::X))
        .with_scale(DVec3::splat(2.0))
        .with_parent(parent)
        .build()
        .unwrap();

    assert_eq!(graph.parent(child), Some(parent));
    assert_eq!(graph.children(parent), &[child]);
    assert_eq!(graph.scale(child), Some(DVec3::splat(2.0)));
    assert_eq!(graph.pose(child).unwrap().translation(), DVec3::X);
}

#[test]
fn builder_rejects_stale_parent() {
    let mut graph = SceneGraph::new();
    let gone = graph.add_node(Node::new("gone"));
    graph.remove_node(gone);

    let result = graph.build_node("orphan").with_parent(gone).build();
    assert!(matches!(result, Err(ArmatureError::NodeNotFound(_))));
}

#[test]
fn remove_node_orphans_children() {
    let (mut graph, [root, mid, leaf]) = chain(DVec3::ZERO);

    let removed = graph.remove_node(mid).unwrap();
    assert_eq!(removed.name(), "mid");

    // leaf survives as a root, re-parentable independently
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.parent(leaf), None);
    assert!(graph.roots().contains(&leaf));
    assert!(graph.children(root).is_empty());

    graph.set_parent(leaf, Some(root)).unwrap();
    assert_eq!(graph.parent(leaf), Some(root));
}

#[test]
fn remove_node_twice_returns_none() {
    let mut graph = SceneGraph::new();
    let handle = graph.add_node(Node::new("n"));
    assert!(graph.remove_node(handle).is_some());
    assert!(graph.remove_node(handle).is_none());
}

#[test]
fn find_by_name_first_match() {
    let mut graph = SceneGraph::new();
    graph.add_node(Node::new("a"));
    let b = graph.add_node(Node::new("b"));
    assert_eq!(graph.find_by_name("b"), Some(b));
    assert_eq!(graph.find_by_name("missing"), None);
    assert_eq!(graph.nodes().count(), 2);
}

// ============================================================================
// Parent assignment and cycles
// ============================================================================

#[test]
fn set_parent_moves_between_parents() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node(Node::new("a"));
    let b = graph.add_node(Node::new("b"));
    let child = graph.add_node(Node::new("child"));

    graph.set_parent(child, Some(a)).unwrap();
    assert_eq!(graph.children(a), &[child]);

    graph.set_parent(child, Some(b)).unwrap();
    assert!(graph.children(a).is_empty());
    assert_eq!(graph.children(b), &[child]);
    assert_eq!(graph.parent(child), Some(b));
    assert!(!graph.roots().contains(&child));
}

#[test]
fn set_parent_none_promotes_to_root() {
    let (mut graph, [_, mid, _]) = chain(DVec3::ZERO);
    graph.set_parent(mid, None).unwrap();
    assert_eq!(graph.parent(mid), None);
    assert!(graph.roots().contains(&mid));
}

#[test]
fn set_parent_rejects_self() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node(Node::new("a"));
    let err = graph.set_parent(a, Some(a)).unwrap_err();
    assert!(matches!(err, ArmatureError::HierarchyCycle { .. }));
}

#[test]
fn set_parent_rejects_descendant_and_leaves_links_intact() {
    let (mut graph, [root, mid, leaf]) = chain(DVec3::ZERO);

    // leaf is a descendant of root; root under leaf would close a loop
    let err = graph.set_parent(root, Some(leaf)).unwrap_err();
    assert!(matches!(err, ArmatureError::HierarchyCycle { .. }));

    // nothing moved
    assert_eq!(graph.parent(root), None);
    assert_eq!(graph.roots(), &[root]);
    assert_eq!(graph.children(root), &[mid]);
    assert_eq!(graph.children(mid), &[leaf]);
    assert!(graph.children(leaf).is_empty());
}

#[test]
fn set_parent_is_idempotent_on_same_parent() {
    let mut graph = SceneGraph::new();
    let parent = graph.add_node(Node::new("parent"));
    let child = graph.add_node(Node::new("child"));

    graph.set_parent(child, Some(parent)).unwrap();
    graph.set_parent(child, Some(parent)).unwrap();
    assert_eq!(graph.children(parent), &[child]);
}

#[test]
fn add_and_remove_child() {
    let mut graph = SceneGraph::new();
    let parent = graph.add_node(Node::new("parent"));
    let child = graph.add_node(Node::new("child"));

    graph.add_child(parent, child).unwrap();
    assert_eq!(graph.parent(child), Some(parent));

    graph.remove_child(parent, child);
    assert_eq!(graph.parent(child), None);
    assert!(graph.roots().contains(&child));

    // detaching a non-child is a no-op, not an error
    graph.remove_child(parent, child);
    assert_eq!(graph.roots().iter().filter(|&&h| h == child).count(), 1);
}

// ============================================================================
// Transform caching
// ============================================================================

#[test]
fn local_transform_composes_pose_and_scale() {
    let mut graph = SceneGraph::new();
    let node = graph
        .build_node("n")
        .with_pose(Pose::from_translation_axis_angle(DVec3::X, DVec3::Z, FRAC_PI_2))
        .with_scale(DVec3::new(2.0, 1.0, 1.0))
        .build()
        .unwrap();

    let m = graph.local_transform(node).unwrap();
    // scale then rotate then translate: (1,0,0) -> (2,0,0) -> (0,2,0) -> (1,2,0)
    let p = (m * DVec4::new(1.0, 0.0, 0.0, 1.0)).truncate();
    assert!(vec3_approx(p, DVec3::new(1.0, 2.0, 0.0)), "{p:?}");
}

#[test]
fn world_transform_chains_ancestors() {
    let (mut graph, [root, mid, leaf]) = chain(DVec3::X);

    assert!(vec3_approx(
        world_position(graph.world_transform(root).unwrap()),
        DVec3::X
    ));
    assert!(vec3_approx(
        world_position(graph.world_transform(mid).unwrap()),
        DVec3::new(1.0, 1.0, 0.0)
    ));
    assert!(vec3_approx(
        world_position(graph.world_transform(leaf).unwrap()),
        DVec3::new(1.0, 1.0, 1.0)
    ));
}

#[test]
fn world_transform_folds_parent_rotation() {
    let mut graph = SceneGraph::new();
    let root = graph
        .build_node("root")
        .with_pose(Pose::from_translation_axis_angle(DVec3::ZERO, DVec3::Z, FRAC_PI_2))
        .build()
        .unwrap();
    let child = graph
        .build_node("child")
        .with_pose(Pose::from_translation(DVec3::X))
        .with_parent(root)
        .build()
        .unwrap();

    // parent's quarter turn carries the child's +X offset onto +Y
    let p = world_position(graph.world_transform(child).unwrap());
    assert!(vec3_approx(p, DVec3::Y), "{p:?}");
}

#[test]
fn ancestor_pose_mutation_reaches_every_descendant() {
    let (mut graph, [root, mid, leaf]) = chain(DVec3::ZERO);

    // warm every cache
    graph.world_transform(leaf).unwrap();
    graph.world_transform(mid).unwrap();
    graph.world_transform(root).unwrap();

    graph
        .set_pose(root, Pose::from_translation(DVec3::splat(10.0)))
        .unwrap();

    assert!(vec3_approx(
        world_position(graph.world_transform(mid).unwrap()),
        DVec3::new(10.0, 11.0, 10.0)
    ));
    assert!(vec3_approx(
        world_position(graph.world_transform(leaf).unwrap()),
        DVec3::new(10.0, 11.0, 11.0)
    ));
}

#[test]
fn scale_mutation_dirties_subtree() {
    let (mut graph, [root, _, leaf]) = chain(DVec3::ZERO);
    graph.world_transform(leaf).unwrap();

    graph.set_scale(root, DVec3::splat(2.0)).unwrap();
    assert!(vec3_approx(
        world_position(graph.world_transform(leaf).unwrap()),
        DVec3::new(0.0, 2.0, 2.0)
    ));
}

#[test]
fn reparent_dirties_moved_subtree() {
    let mut graph = SceneGraph::new();
    let a = graph
        .build_node("a")
        .with_pose(Pose::from_translation(DVec3::X * 5.0))
        .build()
        .unwrap();
    let b = graph
        .build_node("b")
        .with_pose(Pose::from_translation(DVec3::Y * 5.0))
        .build()
        .unwrap();
    let child = graph
        .build_node("child")
        .with_pose(Pose::from_translation(DVec3::Z))
        .with_parent(a)
        .build()
        .unwrap();

    assert!(vec3_approx(
        world_position(graph.world_transform(child).unwrap()),
        DVec3::new(5.0, 0.0, 1.0)
    ));

    graph.set_parent(child, Some(b)).unwrap();
    assert!(vec3_approx(
        world_position(graph.world_transform(child).unwrap()),
        DVec3::new(0.0, 5.0, 1.0)
    ));
}

#[test]
fn sibling_subtree_stays_clean() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node(Node::new("root"));
    let left = graph.add_to_parent(Node::new("left"), root).unwrap();
    let right = graph.add_to_parent(Node::new("right"), root).unwrap();

    graph.world_transform(left).unwrap();
    graph.world_transform(right).unwrap();
    graph.reset_cache_stats();

    // mutating one branch must not invalidate the other
    graph.set_pose(left, Pose::from_translation(DVec3::X)).unwrap();
    graph.world_transform(right).unwrap();

    let stats = graph.cache_stats(right).unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 0);
}

#[test]
fn stale_handle_queries_return_none() {
    let mut graph = SceneGraph::new();
    let handle = graph.add_node(Node::new("n"));
    graph.remove_node(handle);

    assert!(graph.world_transform(handle).is_none());
    assert!(graph.local_transform(handle).is_none());
    assert!(graph.pose(handle).is_none());
    assert!(matches!(
        graph.set_pose(handle, Pose::IDENTITY),
        Err(ArmatureError::NodeNotFound(_))
    ));
}

// ============================================================================
// Cache counters
// ============================================================================

#[test]
fn repeated_queries_hit_the_cache() {
    let (mut graph, [_, _, leaf]) = chain(DVec3::ZERO);

    graph.world_transform(leaf).unwrap();
    let first = graph.cache_stats(leaf).unwrap();
    assert_eq!(first.misses, 1);
    assert_eq!(first.hits, 0);

    graph.world_transform(leaf).unwrap();
    graph.world_transform(leaf).unwrap();
    let later = graph.cache_stats(leaf).unwrap();
    assert_eq!(later.misses, 1);
    assert_eq!(later.hits, 2);
    assert!((later.hit_rate() - 2.0 / 3.0).abs() < EPSILON);
}

#[test]
fn total_stats_aggregate_and_reset() {
    let (mut graph, [root, mid, leaf]) = chain(DVec3::ZERO);

    // one deep query fills root, mid and leaf: three misses
    graph.world_transform(leaf).unwrap();
    let total = graph.total_cache_stats();
    assert_eq!(total.misses, 3);

    graph.world_transform(root).unwrap();
    graph.world_transform(mid).unwrap();
    assert_eq!(graph.total_cache_stats().hits, 2);

    graph.reset_cache_stats();
    let cleared = graph.total_cache_stats();
    assert_eq!((cleared.hits, cleared.misses), (0, 0));
    assert!(cleared.hit_rate().abs() < EPSILON);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn depth_and_descendant_queries() {
    let (graph, [root, mid, leaf]) = chain(DVec3::ZERO);

    assert_eq!(diagnostics::depth(&graph, root), Some(0));
    assert_eq!(diagnostics::depth(&graph, leaf), Some(2));
    assert_eq!(diagnostics::subtree_depth(&graph, root), Some(2));
    assert_eq!(diagnostics::subtree_depth(&graph, leaf), Some(0));
    assert_eq!(diagnostics::descendant_count(&graph, root), Some(2));
    assert_eq!(diagnostics::descendant_count(&graph, leaf), Some(0));

    let stats = diagnostics::stats(&graph, mid).unwrap();
    assert_eq!(stats.depth, 1);
    assert_eq!(stats.child_count, 1);
    assert_eq!(stats.descendant_count, 1);
    assert_eq!(stats.subtree_depth, 1);
}

#[test]
fn validate_flags_deep_chains_and_wide_nodes() {
    let mut graph = SceneGraph::new();
    let mut cursor = graph.add_node(Node::new("chain0"));
    for i in 1..=4 {
        cursor = graph
            .add_to_parent(Node::new(&format!("chain{i}")), cursor)
            .unwrap();
    }
    let wide = graph.add_node(Node::new("wide"));
    for i in 0..3 {
        graph.add_to_parent(Node::new(&format!("w{i}")), wide).unwrap();
    }

    let healthy = diagnostics::validate(&graph, &DiagnosticsConfig::default());
    assert!(healthy.is_empty());

    let strict = DiagnosticsConfig {
        depth_warning: 2,
        children_warning: 2,
    };
    let warnings = diagnostics::validate(&graph, &strict);
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("chain3")));
    assert!(warnings.iter().any(|w| w.contains("chain4")));
    assert!(warnings.iter().any(|w| w.contains("\"wide\" has 3 children")));
}

#[test]
fn format_tree_indents_by_level() {
    let (graph, _) = chain(DVec3::ZERO);
    let dump = diagnostics::format_tree(&graph, false);
    assert_eq!(dump, "root\n  mid\n    leaf\n");

    let with_stats = diagnostics::format_tree(&graph, true);
    assert!(with_stats.contains("root (children: 1, descendants: 2"));
}
