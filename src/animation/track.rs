//! Keyframe tracks and interpolation policy.

use std::str::FromStr;

use crate::errors::{ArmatureError, Result};
use crate::math::Pose;

/// Bracket spans shorter than this collapse to weight zero instead of
/// dividing; duplicate-time keyframes then resolve to the earlier pose.
const MIN_BRACKET_SPAN: f64 = 1e-10;

/// How a track blends between the two keyframes bracketing a sample time.
///
/// The policy only shapes the blend weight (or snaps, for [`Step`]); the
/// blend formula itself follows the pose representation, see
/// [`Pose::interpolate`].
///
/// [`Step`]: InterpolationMode::Step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Snap to the nearer keyframe, no blending.
    Step,
    /// Blend with the raw normalized weight.
    #[default]
    Linear,
    /// Blend with the smoothstep-eased weight `3u² − 2u³`.
    Smooth,
}

impl FromStr for InterpolationMode {
    type Err = ArmatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "step" => Ok(Self::Step),
            "linear" => Ok(Self::Linear),
            "smooth" => Ok(Self::Smooth),
            other => Err(ArmatureError::UnknownInterpolationMode(other.to_owned())),
        }
    }
}

/// A pose sample at one instant. Times are seconds and never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    time: f64,
    pose: Pose,
}

impl Keyframe {
    /// Creates a keyframe, rejecting negative times.
    pub fn new(time: f64, pose: Pose) -> Result<Self> {
        if time < 0.0 {
            return Err(ArmatureError::NegativeKeyframeTime(time));
        }
        Ok(Self { time, pose })
    }

    /// Sample time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The sampled pose.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}

/// Time-to-pose function for one animation target.
///
/// Keyframes may be added in any time order: the track keeps a needs-sort
/// flag and sorts lazily before the first time-dependent query after an
/// insertion. Sampling clamps to the boundary keyframes, never extrapolates.
#[derive(Debug, Clone)]
pub struct Track {
    target: String,
    interpolation: InterpolationMode,
    keyframes: Vec<Keyframe>,
    needs_sort: bool,
}

impl Track {
    /// Creates an empty track animating the node(s) named `target`.
    #[must_use]
    pub fn new(target: &str, interpolation: InterpolationMode) -> Self {
        Self {
            target: target.to_owned(),
            interpolation,
            keyframes: Vec::new(),
            needs_sort: false,
        }
    }

    /// The node name this track drives.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The blend policy the track was built with.
    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Appends a keyframe. Insertion order is free; the track sorts by time
    /// before the next query. Fails only for a negative time, leaving the
    /// track untouched.
    pub fn add_keyframe(&mut self, time: f64, pose: Pose) -> Result<()> {
        let keyframe = Keyframe::new(time, pose)?;
        self.keyframes.push(keyframe);
        self.needs_sort = true;
        Ok(())
    }

    /// Number of keyframes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track holds no keyframes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Drops every keyframe.
    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.needs_sort = false;
    }

    /// The keyframes in time order.
    pub fn keyframes(&mut self) -> &[Keyframe] {
        self.ensure_sorted();
        &self.keyframes
    }

    /// Time of the last keyframe, or zero for an empty track.
    pub fn duration(&mut self) -> f64 {
        self.ensure_sorted();
        self.keyframes.last().map_or(0.0, Keyframe::time)
    }

    fn ensure_sorted(&mut self) {
        if self.needs_sort {
            self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
            self.needs_sort = false;
        }
    }

    /// The track's pose at `time`.
    ///
    /// Returns `Ok(None)` for an empty track. Times at or outside the
    /// keyframe range return the boundary keyframe's pose unmodified.
    /// In between, the bracketing pair is blended under the track's
    /// [`InterpolationMode`]; a bracket mixing the two pose representations
    /// fails with [`ArmatureError::MixedPoseBlend`].
    pub fn evaluate(&mut self, time: f64) -> Result<Option<Pose>> {
        self.ensure_sorted();
        let Some(first) = self.keyframes.first() else {
            return Ok(None);
        };
        let last = self.keyframes[self.keyframes.len() - 1];
        if time <= first.time {
            return Ok(Some(first.pose));
        }
        if time >= last.time {
            return Ok(Some(last.pose));
        }

        // First keyframe strictly past `time`; the checks above guarantee
        // it has a predecessor.
        let next = self.keyframes.partition_point(|kf| kf.time <= time);
        let after = &self.keyframes[next];
        let before = &self.keyframes[next - 1];

        let span = after.time - before.time;
        let u = if span < MIN_BRACKET_SPAN {
            0.0
        } else {
            (time - before.time) / span
        };

        match self.interpolation {
            InterpolationMode::Step => Ok(Some(if u < 0.5 { before.pose } else { after.pose })),
            InterpolationMode::Linear => before.pose.interpolate(&after.pose, u).map(Some),
            InterpolationMode::Smooth => {
                let eased = u * u * (3.0 - 2.0 * u);
                before.pose.interpolate(&after.pose, eased).map(Some)
            }
        }
    }
}
