//! Directional math helpers: orientation basis vectors, position probes,
//! 8-way facing classification, and shortest-angle rotation.
//!
//! Everything here is a pure function of a rotation or transform — no ECS
//! access, no side effects — so it is exhaustively unit-tested below.
//!
//! ## Conventions
//!
//! - Forward is the orientation applied to **−Z**, right to **+X**, up to
//!   **+Y** (Bevy's right-handed camera-style basis).
//! - Yaw is measured in degrees, 0° = facing −Z, increasing toward +X
//!   (turning right).  A yaw of `y` corresponds to
//!   `Quat::from_rotation_y(-y.to_radians())`.

use crate::constants::PROBE_DISTANCE;
use bevy::prelude::*;

// ── Basis vectors ─────────────────────────────────────────────────────────────

/// Unit forward vector of an orientation.
#[inline]
pub fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Unit backward vector of an orientation.
#[inline]
pub fn back(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Unit right vector of an orientation.
#[inline]
pub fn right(rotation: Quat) -> Vec3 {
    rotation * Vec3::X
}

/// Unit left vector of an orientation.
#[inline]
pub fn left(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_X
}

/// Unit up vector of an orientation.
#[inline]
pub fn up(rotation: Quat) -> Vec3 {
    rotation * Vec3::Y
}

/// Unit down vector of an orientation.
#[inline]
pub fn down(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Y
}

// ── Position probes ───────────────────────────────────────────────────────────

/// Point `distance` units in front of the transform.
#[inline]
pub fn position_front(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + forward(transform.rotation) * distance
}

/// Point `distance` units behind the transform.
#[inline]
pub fn position_behind(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + back(transform.rotation) * distance
}

/// Point `distance` units to the transform's right.
#[inline]
pub fn position_right(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + right(transform.rotation) * distance
}

/// Point `distance` units to the transform's left.
#[inline]
pub fn position_left(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + left(transform.rotation) * distance
}

/// Point `distance` units above the transform.
#[inline]
pub fn position_above(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + up(transform.rotation) * distance
}

/// Point `distance` units below the transform.
#[inline]
pub fn position_below(transform: &Transform, distance: f32) -> Vec3 {
    transform.translation + down(transform.rotation) * distance
}

/// [`position_front`] at the default probe distance.
#[inline]
pub fn probe_front(transform: &Transform) -> Vec3 {
    position_front(transform, PROBE_DISTANCE)
}

// ── Yaw helpers ───────────────────────────────────────────────────────────────

/// Extract the yaw (degrees) of an orientation from its forward vector.
///
/// 0° = facing −Z, 90° = facing +X.  Result is in `(-180, 180]`.
#[inline]
pub fn yaw_of(rotation: Quat) -> f32 {
    let f = forward(rotation);
    f.x.atan2(-f.z).to_degrees()
}

/// Build an orientation facing the given yaw (degrees).
#[inline]
pub fn rotation_from_yaw(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(-yaw_degrees.to_radians())
}

/// Wrap `(to - from)` into `(-180, 180]` so rotation interpolation always
/// turns the short way — never the spin-the-long-way artifact.
pub fn shortest_rotation(from_degrees: f32, to_degrees: f32) -> f32 {
    let mut delta = (to_degrees - from_degrees) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

// ── Discrete facings ──────────────────────────────────────────────────────────

/// 8-way discrete facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction8 {
    #[default]
    Forward,
    ForwardRight,
    Right,
    BackwardRight,
    Behind,
    BackwardLeft,
    Left,
    ForwardLeft,
}

/// Bucket a yaw angle (degrees, any range) into one of 8 facings.
///
/// Sectors are the half-open intervals `[k·45°, (k+1)·45°)` after wrapping
/// into `[0, 360)`: 0° is Forward, 45° already ForwardRight (the boundary
/// value belongs to the higher sector), so 44° and 46° land in adjacent
/// buckets and the eight sectors partition the circle with no gaps or
/// overlaps.
pub fn direction_from_yaw(yaw_degrees: f32) -> Direction8 {
    let wrapped = yaw_degrees.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs; fold it.
    let sector = ((wrapped / 45.0).floor() as usize) % 8;
    match sector {
        0 => Direction8::Forward,
        1 => Direction8::ForwardRight,
        2 => Direction8::Right,
        3 => Direction8::BackwardRight,
        4 => Direction8::Behind,
        5 => Direction8::BackwardLeft,
        6 => Direction8::Left,
        _ => Direction8::ForwardLeft,
    }
}

/// Coarse movement direction derived from the input axis
/// (x = right, y = forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    #[default]
    None,
    Forward,
    Backward,
    Left,
    Right,
}

/// Classify a movement axis into its dominant coarse direction.
pub fn move_direction_from_axis(axis: Vec2) -> MoveDirection {
    if axis.length_squared() < 1e-6 {
        return MoveDirection::None;
    }
    if axis.x.abs() > axis.y.abs() {
        if axis.x > 0.0 {
            MoveDirection::Right
        } else {
            MoveDirection::Left
        }
    } else if axis.y > 0.0 {
        MoveDirection::Forward
    } else {
        MoveDirection::Backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn identity_basis_vectors() {
        assert_vec_close(forward(Quat::IDENTITY), Vec3::NEG_Z);
        assert_vec_close(back(Quat::IDENTITY), Vec3::Z);
        assert_vec_close(right(Quat::IDENTITY), Vec3::X);
        assert_vec_close(left(Quat::IDENTITY), Vec3::NEG_X);
        assert_vec_close(up(Quat::IDENTITY), Vec3::Y);
        assert_vec_close(down(Quat::IDENTITY), Vec3::NEG_Y);
    }

    #[test]
    fn yaw_90_faces_positive_x() {
        let rot = rotation_from_yaw(90.0);
        assert_vec_close(forward(rot), Vec3::X);
        assert!((yaw_of(rot) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn probes_offset_along_basis() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_vec_close(position_front(&t, 3.0), Vec3::new(1.0, 2.0, 0.0));
        assert_vec_close(position_behind(&t, 3.0), Vec3::new(1.0, 2.0, 6.0));
        assert_vec_close(position_right(&t, 2.0), Vec3::new(3.0, 2.0, 3.0));
        assert_vec_close(position_above(&t, 1.0), Vec3::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn yaw_zero_is_forward() {
        assert_eq!(direction_from_yaw(0.0), Direction8::Forward);
    }

    #[test]
    fn boundary_at_45_splits_adjacent_buckets() {
        assert_eq!(direction_from_yaw(44.0), Direction8::Forward);
        assert_eq!(direction_from_yaw(46.0), Direction8::ForwardRight);
        // Boundary value belongs to the higher sector.
        assert_eq!(direction_from_yaw(45.0), Direction8::ForwardRight);
    }

    #[test]
    fn buckets_partition_full_circle() {
        // Sample densely; every angle maps to exactly one bucket and the
        // sequence of buckets around the circle is the expected ring.
        let ring = [
            Direction8::Forward,
            Direction8::ForwardRight,
            Direction8::Right,
            Direction8::BackwardRight,
            Direction8::Behind,
            Direction8::BackwardLeft,
            Direction8::Left,
            Direction8::ForwardLeft,
        ];
        for k in 0..8 {
            let mid = k as f32 * 45.0 + 22.5;
            assert_eq!(direction_from_yaw(mid), ring[k]);
            // Negative wrapping hits the same bucket.
            assert_eq!(direction_from_yaw(mid - 360.0), ring[k]);
        }
    }

    #[test]
    fn shortest_rotation_wraps_into_half_open_range() {
        assert_eq!(shortest_rotation(0.0, 90.0), 90.0);
        assert_eq!(shortest_rotation(0.0, 270.0), -90.0);
        assert_eq!(shortest_rotation(170.0, -170.0), 20.0);
        assert_eq!(shortest_rotation(-170.0, 170.0), -20.0);
        // 180 is reachable, -180 is not (half-open on the negative side).
        assert_eq!(shortest_rotation(0.0, 180.0), 180.0);
        assert_eq!(shortest_rotation(0.0, -180.0), 180.0);
    }

    #[test]
    fn move_direction_dominant_axis() {
        assert_eq!(move_direction_from_axis(Vec2::ZERO), MoveDirection::None);
        assert_eq!(
            move_direction_from_axis(Vec2::new(0.0, 1.0)),
            MoveDirection::Forward
        );
        assert_eq!(
            move_direction_from_axis(Vec2::new(-1.0, 0.2)),
            MoveDirection::Left
        );
        assert_eq!(
            move_direction_from_axis(Vec2::new(0.3, -0.8)),
            MoveDirection::Backward
        );
    }
}
