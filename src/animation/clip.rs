//! Named collections of tracks played together.

use rustc_hash::FxHashMap;

use crate::animation::track::Track;
use crate::errors::Result;
use crate::math::Pose;

/// A set of [`Track`]s keyed by target name, evaluated as one unit.
///
/// One track per target: adding a track for a name already present replaces
/// the old one. The clip's duration is the longest track's.
#[derive(Debug, Clone, Default)]
pub struct Clip {
    name: String,
    tracks: FxHashMap<String, Track>,
}

impl Clip {
    /// Creates an empty clip.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            tracks: FxHashMap::default(),
        }
    }

    /// The clip's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a track under its target name, returning the track it
    /// replaced, if any.
    pub fn add_track(&mut self, track: Track) -> Option<Track> {
        self.tracks.insert(track.target().to_owned(), track)
    }

    /// Removes and returns the track for `target`, if present.
    pub fn remove_track(&mut self, target: &str) -> Option<Track> {
        self.tracks.remove(target)
    }

    /// The track for `target`, if any.
    #[must_use]
    pub fn track(&self, target: &str) -> Option<&Track> {
        self.tracks.get(target)
    }

    /// Mutable access to the track for `target`, if any.
    pub fn track_mut(&mut self, target: &str) -> Option<&mut Track> {
        self.tracks.get_mut(target)
    }

    /// Every animated target name, in arbitrary order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Number of tracks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the clip holds no tracks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drops every track.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// The longest track duration, or zero for an empty clip.
    pub fn duration(&mut self) -> f64 {
        self.tracks
            .values_mut()
            .map(Track::duration)
            .fold(0.0, f64::max)
    }

    /// Every track's pose at `time`, keyed by target name.
    ///
    /// Empty tracks contribute nothing. The first track whose bracket mixes
    /// pose representations fails the whole evaluation.
    pub fn evaluate(&mut self, time: f64) -> Result<FxHashMap<String, Pose>> {
        let mut poses = FxHashMap::default();
        for (target, track) in &mut self.tracks {
            if let Some(pose) = track.evaluate(time)? {
                poses.insert(target.clone(), pose);
            }
        }
        Ok(poses)
    }
}
