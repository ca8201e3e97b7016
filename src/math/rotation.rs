//! Quaternion and axis-angle rotation helpers.
//!
//! `glam` supplies the quaternion algebra itself (Hamilton product,
//! conjugation, `q * v` vector rotation). This module adds the conversion
//! and interpolation routines whose edge-case behavior the rest of the crate
//! relies on: degenerate inputs collapse to the identity rotation, and a
//! rotation too small to carry direction information reports a fixed
//! fallback axis instead of erroring.

use glam::{DMat3, DQuat, DVec3};

/// Magnitudes below this are treated as degenerate (zero axis, zero norm).
pub const DEGENERATE_EPSILON: f64 = 1e-10;

/// Above this quaternion dot product, slerp switches to a normalized linear
/// blend: the sin(θ) denominator is too close to zero to divide by.
const NLERP_THRESHOLD: f64 = 0.9995;

/// Axis reported for rotations whose angle is numerically zero (or a full
/// turn); any axis would do, this one is pinned down so callers can rely
/// on it.
pub const FALLBACK_AXIS: DVec3 = DVec3::Z;

/// Builds a rotation of `angle` radians about `axis`.
///
/// The axis is normalized here; a near-zero axis yields the identity
/// rotation regardless of the angle.
#[must_use]
pub fn from_axis_angle(axis: DVec3, angle: f64) -> DQuat {
    let len = axis.length();
    if len < DEGENERATE_EPSILON {
        return DQuat::IDENTITY;
    }
    DQuat::from_axis_angle(axis / len, angle)
}

/// Builds a rotation from an axis-angle vector (direction = axis,
/// length = angle in radians). A near-zero vector yields the identity.
#[must_use]
pub fn from_scaled_axis(rotation: DVec3) -> DQuat {
    from_axis_angle(rotation, rotation.length())
}

/// Recovers `(axis, angle)` from a rotation, with `angle` in `[0, 2π]`.
///
/// The input is renormalized first. When `sin(angle / 2)` vanishes (angle
/// near zero or a full turn) the axis is undetermined and
/// [`FALLBACK_AXIS`] is reported.
#[must_use]
pub fn to_axis_angle(q: DQuat) -> (DVec3, f64) {
    let q = normalize_or_identity(q);
    let angle = 2.0 * q.w.clamp(-1.0, 1.0).acos();
    let sin_half = (angle * 0.5).sin();
    if sin_half.abs() < DEGENERATE_EPSILON {
        return (FALLBACK_AXIS, angle);
    }
    (q.xyz() / sin_half, angle)
}

/// Recovers the axis-angle vector form of a rotation. The identity maps to
/// the zero vector.
#[must_use]
pub fn to_scaled_axis(q: DQuat) -> DVec3 {
    let (axis, angle) = to_axis_angle(q);
    axis * angle
}

/// Renormalizes a quaternion, mapping near-zero norms to the identity.
#[must_use]
pub fn normalize_or_identity(q: DQuat) -> DQuat {
    let len = q.length();
    if len < DEGENERATE_EPSILON {
        DQuat::IDENTITY
    } else {
        q / len
    }
}

/// Multiplicative inverse via conjugate over squared norm. Near-zero norms
/// map to the identity instead of dividing by zero.
#[must_use]
pub fn inverse(q: DQuat) -> DQuat {
    let norm_sq = q.length_squared();
    if norm_sq < DEGENERATE_EPSILON {
        return DQuat::IDENTITY;
    }
    q.conjugate() / norm_sq
}

/// Spherical interpolation from `a` to `b` along the shorter arc.
///
/// `t` is clamped to `[0, 1]` and both inputs are renormalized. When the
/// rotations are nearly aligned the blend degrades to [`lerp`] weights; the
/// result is renormalized either way.
#[must_use]
pub fn slerp(a: DQuat, b: DQuat, t: f64) -> DQuat {
    let t = t.clamp(0.0, 1.0);
    let a = normalize_or_identity(a);
    let mut b = normalize_or_identity(b);

    let mut dot = a.dot(b);
    if dot < 0.0 {
        b = -b;
        dot = -dot;
    }

    if dot > NLERP_THRESHOLD {
        return nlerp_aligned(a, b, t);
    }

    let theta = dot.acos();
    let sin_theta = theta.sin();
    let s0 = ((1.0 - t) * theta).sin() / sin_theta;
    let s1 = (t * theta).sin() / sin_theta;
    normalize_or_identity(a * s0 + b * s1)
}

/// Normalized linear interpolation from `a` to `b` along the shorter arc,
/// with `t` clamped to `[0, 1]`.
#[must_use]
pub fn lerp(a: DQuat, b: DQuat, t: f64) -> DQuat {
    let t = t.clamp(0.0, 1.0);
    let a = normalize_or_identity(a);
    let mut b = normalize_or_identity(b);
    if a.dot(b) < 0.0 {
        b = -b;
    }
    nlerp_aligned(a, b, t)
}

/// Linear blend of two already-aligned unit quaternions, renormalized.
fn nlerp_aligned(a: DQuat, b: DQuat, t: f64) -> DQuat {
    normalize_or_identity(a * (1.0 - t) + b * t)
}

/// Builds a rotation from intrinsic XYZ euler angles, in radians.
#[inline]
#[must_use]
pub fn from_euler(x: f64, y: f64, z: f64) -> DQuat {
    DQuat::from_euler(glam::EulerRot::XYZ, x, y, z)
}

/// Extracts intrinsic XYZ euler angles, in radians.
#[inline]
#[must_use]
pub fn to_euler(q: DQuat) -> (f64, f64, f64) {
    q.to_euler(glam::EulerRot::XYZ)
}

/// The 3×3 rotation matrix of a quaternion, renormalized first.
#[inline]
#[must_use]
pub fn to_rotation_matrix(q: DQuat) -> DMat3 {
    DMat3::from_quat(normalize_or_identity(q))
}
