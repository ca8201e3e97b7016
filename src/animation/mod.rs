//! Keyframe animation engine
//!
//! Time-indexed pose data and the playback machinery driving it:
//! - [`Track`]: keyframes plus an [`InterpolationMode`] for one target
//! - [`Clip`]: named tracks evaluated together
//! - [`Player`]: the playback cursor an update loop advances each frame

pub mod clip;
pub mod player;
pub mod track;

pub use clip::Clip;
pub use player::Player;
pub use track::{InterpolationMode, Keyframe, Track};
