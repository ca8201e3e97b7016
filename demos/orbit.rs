//! Orbital hierarchy demo: a moon orbiting a planet orbiting a sun, driven
//! by a looping clip. Runs a fixed number of simulated frames and logs the
//! moon's world position.
//!
//! Run with `RUST_LOG=info cargo run --example orbit`.

use std::f64::consts::TAU;

use armature::{
    Clip, InterpolationMode, Node, Player, Pose, SceneGraph, Track, diagnostics,
};
use glam::{DVec3, DVec4};

const ORBIT_SECONDS: f64 = 4.0;
const FRAME_DT: f64 = 1.0 / 60.0;

/// A track spinning its target about +Z once per orbit, sampled at quarter
/// turns so slerp always has a short arc to follow.
fn spin_track(target: &str) -> armature::Result<Track> {
    let mut track = Track::new(target, InterpolationMode::Linear);
    for step in 0..=4 {
        let t = ORBIT_SECONDS * f64::from(step) / 4.0;
        let angle = TAU * f64::from(step) / 4.0;
        track.add_keyframe(
            t,
            Pose::from_translation_axis_angle(DVec3::ZERO, DVec3::Z, angle),
        )?;
    }
    Ok(track)
}

fn main() -> armature::Result<()> {
    env_logger::init();

    // sun -> planet pivot -> planet -> moon pivot -> moon
    let mut graph = SceneGraph::new();
    let sun = graph.add_node(Node::new("sun"));
    let planet_pivot = graph.add_to_parent(Node::new("planet_pivot"), sun)?;
    let planet = graph
        .build_node("planet")
        .with_pose(Pose::from_translation(DVec3::X * 10.0))
        .with_scale(DVec3::splat(0.5))
        .with_parent(planet_pivot)
        .build()?;
    let moon_pivot = graph.add_to_parent(Node::new("moon_pivot"), planet)?;
    let moon = graph
        .build_node("moon")
        .with_pose(Pose::from_translation(DVec3::X * 3.0))
        .with_parent(moon_pivot)
        .build()?;

    let mut clip = Clip::new("orbits");
    clip.add_track(spin_track("planet_pivot")?);
    clip.add_track(spin_track("moon_pivot")?);

    let mut player = Player::new(clip);
    player.set_looping(true);
    player.play();

    let frames = (2.0 * ORBIT_SECONDS / FRAME_DT) as usize;
    for frame in 0..frames {
        player.update(FRAME_DT);
        let poses = player.current_poses()?;
        graph.apply_poses(&poses);

        if frame % 60 == 0 {
            if let Some(world) = graph.world_transform(moon) {
                let p = (world * DVec4::new(0.0, 0.0, 0.0, 1.0)).truncate();
                log::info!(
                    "t = {:5.2}s  moon at ({:6.2}, {:6.2}, {:6.2})",
                    player.time(),
                    p.x,
                    p.y,
                    p.z
                );
            }
        }
    }

    log::info!("\n{}", diagnostics::format_tree(&graph, true));
    let stats = graph.total_cache_stats();
    log::info!(
        "cache: {} hits / {} misses ({:.1}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );
    Ok(())
}
