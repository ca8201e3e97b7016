//! Playback cursor over one clip.

use rustc_hash::FxHashMap;

use crate::animation::clip::Clip;
use crate::errors::Result;
use crate::math::Pose;

/// Stateful time cursor driving evaluation of a [`Clip`].
///
/// The expected per-frame cycle: call [`update`] with the frame delta, then
/// apply [`current_poses`] onto the scene graph (see
/// [`SceneGraph::apply_poses`]). The player owns its clip; playback mutates
/// only the cursor state.
///
/// [`update`]: Player::update
/// [`current_poses`]: Player::current_poses
/// [`SceneGraph::apply_poses`]: crate::scene::SceneGraph::apply_poses
#[derive(Debug, Clone)]
pub struct Player {
    clip: Clip,
    current_time: f64,
    speed: f64,
    playing: bool,
    looping: bool,
}

impl Player {
    /// Wraps `clip` in a stopped, non-looping player at time zero.
    #[must_use]
    pub fn new(clip: Clip) -> Self {
        Self {
            clip,
            current_time: 0.0,
            speed: 1.0,
            playing: false,
            looping: false,
        }
    }

    /// The clip this player drives.
    #[inline]
    #[must_use]
    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    /// Mutable access to the clip, for authoring between frames.
    pub fn clip_mut(&mut self) -> &mut Clip {
        &mut self.clip
    }

    /// Consumes the player, returning its clip.
    #[must_use]
    pub fn into_clip(self) -> Clip {
        self.clip
    }

    /// Starts (or resumes) playback from the current time.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Halts playback, keeping the current time.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Halts playback and rewinds to time zero.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_time = 0.0;
    }

    /// Jumps the cursor to `time`, clamped to be non-negative.
    pub fn set_time(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    /// Current playback time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f64 {
        self.current_time
    }

    /// Sets the playback speed multiplier.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// The playback speed multiplier.
    #[inline]
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Chooses between wrapping at the clip's end (`true`) and clamping
    /// there (`false`).
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Whether the player wraps at the clip's end.
    #[inline]
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Whether playback is running.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a non-looping run has reached the clip's end. A looping
    /// player never finishes.
    pub fn is_finished(&mut self) -> bool {
        if self.looping {
            return false;
        }
        self.current_time >= self.clip.duration()
    }

    /// Advances the cursor by `dt × speed` seconds.
    ///
    /// Does nothing while paused or stopped. With a positive clip duration,
    /// a looping player wraps modulo the duration and keeps playing; a
    /// non-looping player reaching the end clamps its time to the duration
    /// exactly and stops.
    pub fn update(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.current_time += dt * self.speed;

        let duration = self.clip.duration();
        if duration > 0.0 {
            if self.looping {
                self.current_time = self.current_time.rem_euclid(duration);
            } else if self.current_time >= duration {
                self.current_time = duration;
                self.playing = false;
            }
        }
    }

    /// The clip's poses at the current time, keyed by target name.
    pub fn current_poses(&mut self) -> Result<FxHashMap<String, Pose>> {
        self.clip.evaluate(self.current_time)
    }
}
