//! Shared actor components: health with two-phase damage, movement tuning,
//! ground state, and discrete facing.
//!
//! ## Two-phase damage
//!
//! Collision resolution never writes `hp` directly.  Hits *accumulate* into
//! [`Health::pending_damage`] during the contact phase; the owning actor's
//! apply step ([`apply_pending_damage_system`]) then subtracts the sum exactly
//! once per frame, clamps, zeroes the accumulator, and re-derives `alive`.
//! Multiple hits landing in the same frame are therefore deterministic
//! regardless of collision-iteration order: they all land, summed, once.

use crate::direction::{
    direction_from_yaw, move_direction_from_axis, yaw_of, Direction8, MoveDirection,
};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Hit points with a per-frame damage accumulator.
///
/// Invariants (checked by the apply step every frame):
/// - `0 <= hp <= max_hp`
/// - `alive == (hp > 0)` — re-derived by [`Health::apply_pending`], never set
///   independently anywhere else.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
    /// Damage accumulated by this frame's collision callbacks; consumed and
    /// zeroed by the apply step.
    pub pending_damage: i32,
    pub alive: bool,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            pending_damage: 0,
            alive: max_hp > 0,
        }
    }

    /// Accumulate damage for this frame (collision phase).
    #[inline]
    pub fn accumulate(&mut self, amount: i32) {
        self.pending_damage += amount;
    }

    /// Apply the accumulated damage once, clamp, and re-derive `alive`.
    ///
    /// Returns the damage actually applied this frame (0 when nothing was
    /// pending), which callers use to trigger hit reactions.
    pub fn apply_pending(&mut self) -> i32 {
        let applied = self.pending_damage;
        self.hp = (self.hp - applied).clamp(0, self.max_hp);
        self.pending_damage = 0;
        self.alive = self.hp > 0;
        applied
    }

    /// Fraction of health remaining in `[0, 1]`, for HUD display.
    #[inline]
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

/// Per-actor movement tuning.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveTuning {
    pub move_speed: f32,
    pub fall_speed: f32,
    pub jump_speed: f32,
    pub max_speed: f32,
    pub accel_rate: f32,
}

/// Ground contact state.  `can_jump` is granted on landing and consumed by a
/// jump; no jump state is currently registered so it stays latched.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Grounded {
    pub on_ground: bool,
    pub can_jump: bool,
}

/// Discrete facing, refreshed once per frame from the transform yaw and the
/// current movement axis.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Facing {
    pub direction: Direction8,
    pub move_direction: MoveDirection,
}

/// Movement axis an actor is currently steering along (x = right,
/// y = forward).  Written by whatever drives the actor (input, AI); read by
/// [`update_facing_system`].
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveAxis(pub Vec2);

// ── Systems ───────────────────────────────────────────────────────────────────

/// Apply each actor's accumulated damage exactly once per frame.
///
/// Runs in `PostUpdate` after combat resolution (see `crate::combat`); the
/// ordering guarantee is what keeps multi-hit frames deterministic.
pub fn apply_pending_damage_system(mut q: Query<&mut Health>) {
    for mut health in q.iter_mut() {
        health.apply_pending();
    }
}

/// Constant-rate fall plus ground clamp at the arena plane (y = 0).
///
/// Landing grants `can_jump`; leaving the ground clears `on_ground`.
pub fn gravity_and_ground_system(
    mut q: Query<(&mut Transform, &mut Velocity, &MoveTuning, &mut Grounded)>,
) {
    for (mut transform, mut velocity, tuning, mut grounded) in q.iter_mut() {
        if transform.translation.y <= 0.0 {
            transform.translation.y = 0.0;
            if velocity.linvel.y < 0.0 {
                velocity.linvel.y = 0.0;
            }
            if !grounded.on_ground {
                grounded.can_jump = true;
            }
            grounded.on_ground = true;
        } else {
            grounded.on_ground = false;
            velocity.linvel.y = -tuning.fall_speed;
        }
    }
}

/// Re-derive every actor's 8-way facing and coarse move direction.
pub fn update_facing_system(mut q: Query<(&Transform, &MoveAxis, &mut Facing)>) {
    for (transform, axis, mut facing) in q.iter_mut() {
        facing.direction = direction_from_yaw(yaw_of(transform.rotation));
        facing.move_direction = move_direction_from_axis(axis.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_health_is_alive_at_full() {
        let h = Health::new(10);
        assert_eq!(h.hp, 10);
        assert!(h.alive);
        assert_eq!(h.pending_damage, 0);
    }

    #[test]
    fn simultaneous_hits_sum_once() {
        let mut h = Health::new(20);
        // Hand (4) and bullet (2) both connect in the same frame.
        h.accumulate(4);
        h.accumulate(2);
        let applied = h.apply_pending();
        assert_eq!(applied, 6);
        assert_eq!(h.hp, 14);
        assert_eq!(h.pending_damage, 0);
        assert!(h.alive);
    }

    #[test]
    fn apply_clamps_at_zero_and_flips_alive() {
        let mut h = Health::new(5);
        h.accumulate(9);
        h.apply_pending();
        assert_eq!(h.hp, 0);
        assert!(!h.alive);
        // A later empty apply does not resurrect or underflow.
        h.apply_pending();
        assert_eq!(h.hp, 0);
        assert!(!h.alive);
    }

    #[test]
    fn alive_rederived_every_apply() {
        let mut h = Health::new(3);
        h.accumulate(3);
        h.apply_pending();
        assert!(!h.alive);
        // Restoring hp out-of-band is corrected by the next apply step.
        h.hp = 3;
        h.apply_pending();
        assert!(h.alive);
    }

    #[test]
    fn fraction_tracks_hp() {
        let mut h = Health::new(10);
        h.accumulate(5);
        h.apply_pending();
        assert!((h.fraction() - 0.5).abs() < 1e-6);
    }
}
