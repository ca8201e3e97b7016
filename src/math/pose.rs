//! Rigid pose values and affine composition.

use glam::{DMat3, DMat4, DQuat, DVec3};

use crate::errors::{ArmatureError, Result};
use crate::math::rotation::{from_axis_angle, from_euler, from_scaled_axis, normalize_or_identity, slerp, to_scaled_axis};

/// A rigid placement: translation plus rotation, relative to the parent
/// frame (or the world frame for a root node).
///
/// Two representations exist side by side. The axis-angle form keeps the
/// compact 3-vector used at authoring boundaries; the quaternion form is
/// what interpolation and matrix math work in. A pose is a value: mutation
/// replaces the whole pose, so no half-updated state is ever observable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pose {
    /// Rotation stored as an axis-angle vector (direction = axis,
    /// length = angle in radians).
    AxisAngle {
        /// Offset from the parent frame origin
        translation: DVec3,
        /// Axis-angle rotation vector
        rotation: DVec3,
    },
    /// Rotation stored as a unit quaternion.
    Quaternion {
        /// Offset from the parent frame origin
        translation: DVec3,
        /// Unit rotation quaternion
        rotation: DQuat,
    },
}

impl Pose {
    /// No translation, no rotation.
    pub const IDENTITY: Self = Self::Quaternion {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// An axis-angle pose from its raw parts.
    #[inline]
    #[must_use]
    pub fn axis_angle(translation: DVec3, rotation: DVec3) -> Self {
        Self::AxisAngle { translation, rotation }
    }

    /// A quaternion pose. The rotation is renormalized on the way in so a
    /// stored quaternion pose always carries a unit rotation.
    #[inline]
    #[must_use]
    pub fn quaternion(translation: DVec3, rotation: DQuat) -> Self {
        Self::Quaternion {
            translation,
            rotation: normalize_or_identity(rotation),
        }
    }

    /// A pure translation with identity rotation.
    #[inline]
    #[must_use]
    pub fn from_translation(translation: DVec3) -> Self {
        Self::Quaternion {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    /// A quaternion pose rotated by `angle` radians about `axis`.
    #[must_use]
    pub fn from_translation_axis_angle(translation: DVec3, axis: DVec3, angle: f64) -> Self {
        Self::Quaternion {
            translation,
            rotation: from_axis_angle(axis, angle),
        }
    }

    /// A quaternion pose rotated by intrinsic XYZ euler angles, in radians.
    #[must_use]
    pub fn from_translation_euler(translation: DVec3, x: f64, y: f64, z: f64) -> Self {
        Self::Quaternion {
            translation,
            rotation: from_euler(x, y, z),
        }
    }

    /// The translation component.
    #[inline]
    #[must_use]
    pub fn translation(&self) -> DVec3 {
        match *self {
            Self::AxisAngle { translation, .. } | Self::Quaternion { translation, .. } => translation,
        }
    }

    /// The rotation component as a unit quaternion, converting the
    /// axis-angle form on the fly.
    #[must_use]
    pub fn rotation_quat(&self) -> DQuat {
        match *self {
            Self::AxisAngle { rotation, .. } => from_scaled_axis(rotation),
            Self::Quaternion { rotation, .. } => rotation,
        }
    }

    /// Human-readable representation tag, used in diagnostics and error
    /// messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AxisAngle { .. } => "axis-angle",
            Self::Quaternion { .. } => "quaternion",
        }
    }

    /// This pose in quaternion form. Quaternion poses pass through
    /// unchanged.
    #[must_use]
    pub fn to_quaternion(self) -> Self {
        match self {
            Self::AxisAngle { translation, rotation } => Self::Quaternion {
                translation,
                rotation: from_scaled_axis(rotation),
            },
            quat @ Self::Quaternion { .. } => quat,
        }
    }

    /// This pose in axis-angle form. Axis-angle poses pass through
    /// unchanged.
    #[must_use]
    pub fn to_axis_angle(self) -> Self {
        match self {
            aa @ Self::AxisAngle { .. } => aa,
            Self::Quaternion { translation, rotation } => Self::AxisAngle {
                translation,
                rotation: to_scaled_axis(rotation),
            },
        }
    }

    /// The pose as a local-to-parent matrix with unit scale.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        self.to_matrix_with_scale(DVec3::ONE)
    }

    /// The pose and a per-axis scale as a local-to-parent matrix.
    ///
    /// Composition order is translate × rotate × scale: scale acts first in
    /// object space, then rotation about the origin, then translation.
    #[must_use]
    pub fn to_matrix_with_scale(&self, scale: DVec3) -> DMat4 {
        DMat4::from_scale_rotation_translation(scale, self.rotation_quat(), self.translation())
    }

    /// The 3×3 rotation matrix of this pose's rotation.
    #[must_use]
    pub fn rotation_matrix(&self) -> DMat3 {
        DMat3::from_quat(self.rotation_quat())
    }

    /// Blends toward `other` at weight `t`.
    ///
    /// Axis-angle poses blend translation and rotation vectors
    /// component-wise; quaternion poses blend translation linearly and
    /// rotation by slerp. The two keyframe representations cannot be
    /// blended across, and that combination fails.
    pub fn interpolate(&self, other: &Self, t: f64) -> Result<Self> {
        match (*self, *other) {
            (
                Self::AxisAngle { translation: t0, rotation: r0 },
                Self::AxisAngle { translation: t1, rotation: r1 },
            ) => Ok(Self::AxisAngle {
                translation: t0.lerp(t1, t),
                rotation: r0.lerp(r1, t),
            }),
            (
                Self::Quaternion { translation: t0, rotation: r0 },
                Self::Quaternion { translation: t1, rotation: r1 },
            ) => Ok(Self::Quaternion {
                translation: t0.lerp(t1, t),
                rotation: slerp(r0, r1, t),
            }),
            _ => Err(ArmatureError::MixedPoseBlend {
                left: self.kind_name(),
                right: other.kind_name(),
            }),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composes translation, rotation, and per-axis scale into one affine
/// matrix, scale first, then rotation, then translation.
#[inline]
#[must_use]
pub fn compose_transform(translation: DVec3, rotation: DQuat, scale: DVec3) -> DMat4 {
    DMat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Splits an affine matrix back into `(translation, rotation, scale)`.
///
/// Any shear the matrix picked up upstream is lost in the split.
#[must_use]
pub fn decompose_transform(matrix: DMat4) -> (DVec3, DQuat, DVec3) {
    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
    (translation, rotation, scale)
}
