//! Charge shot: a single persistent projectile entity that grows in front of
//! the player while the charge input is held, then launches on release.
//!
//! The entity is spawned once alongside the player and cycles through
//! [`ChargePhase`]s instead of being created and destroyed:
//!
//! ```text
//! Idle ──BeginCharge──▶ Charging ──scale cap──▶ MaxCharge
//!   ▲                      │                        │
//!   │                  FireCharge ◀────────────────┘
//!   │                      ▼
//!   └──range cap / hit── Fired
//! ```
//!
//! While charging the shot is a visual only (collider disabled); the collider
//! comes alive at fire time.  Combat resolution calls
//! [`ChargeShot::reset_idle`] when the shot connects; the phase-sync system
//! hides it again on the next frame.

use crate::actor::Health;
use crate::config::GameplayConfig;
use crate::constants::CHARGE_BASE_RADIUS;
use crate::direction::forward;
use crate::enemy::Enemy;
use crate::particles::spawn_charge_particle;
use crate::player::state::{LockOn, Player, PlayerCommand};
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, Velocity};

// ── Phase & component ─────────────────────────────────────────────────────────

/// Lifecycle phase of the charge shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargePhase {
    /// Dormant: hidden, collider disabled, parked at the player.
    #[default]
    Idle,
    /// Growing in front of the player while the input is held.
    Charging,
    /// Reached the scale cap; holds there until release.
    MaxCharge,
    /// In flight.
    Fired,
}

#[derive(Component, Debug, Default)]
pub struct ChargeShot {
    pub phase: ChargePhase,
    /// Current visual/collider scale multiplier, `1.0..=charge_max_scale`.
    pub scale: f32,
    /// Distance flown since firing (u); resets the shot at the range cap.
    pub traveled: f32,
}

impl ChargeShot {
    pub fn new() -> Self {
        Self {
            phase: ChargePhase::Idle,
            scale: 1.0,
            traveled: 0.0,
        }
    }

    /// Any non-dormant phase.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.phase != ChargePhase::Idle
    }

    #[inline]
    pub fn is_charging(&self) -> bool {
        matches!(self.phase, ChargePhase::Charging | ChargePhase::MaxCharge)
    }

    #[inline]
    pub fn is_fired(&self) -> bool {
        self.phase == ChargePhase::Fired
    }

    #[inline]
    pub fn is_max_scale(&self) -> bool {
        self.phase == ChargePhase::MaxCharge
    }

    /// Return to dormancy.  Called on range-out and on impact.
    pub fn reset_idle(&mut self) {
        self.phase = ChargePhase::Idle;
        self.scale = 1.0;
        self.traveled = 0.0;
    }

    /// Advance the growth timer; promotes to [`ChargePhase::MaxCharge`] at
    /// the cap.
    pub fn grow(&mut self, rate: f32, max_scale: f32, dt: f32) {
        if self.phase != ChargePhase::Charging {
            return;
        }
        self.scale += rate * dt;
        if self.scale >= max_scale {
            self.scale = max_scale;
            self.phase = ChargePhase::MaxCharge;
        }
    }
}

/// Forward distance from the player's center to the shot's center, keeping
/// the growing sphere clear of the player's own collider.
#[inline]
pub fn follow_offset(player_radius: f32, scale: f32, margin: f32) -> f32 {
    player_radius + CHARGE_BASE_RADIUS * scale + margin
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Consume begin/fire commands from the state machine.
pub fn charge_command_system(
    mut commands: Commands,
    mut reader: MessageReader<PlayerCommand>,
    config: Res<GameplayConfig>,
    lock_on: Res<LockOn>,
    player_q: Query<&Transform, With<Player>>,
    enemy_q: Query<(&Transform, &Health), With<Enemy>>,
    mut shot_q: Query<(Entity, &mut ChargeShot, &Transform, &mut Velocity), Without<Player>>,
) {
    let Ok((entity, mut shot, shot_tf, mut velocity)) = shot_q.single_mut() else {
        return;
    };
    let Ok(player_tf) = player_q.single() else {
        return;
    };

    for command in reader.read() {
        match command {
            PlayerCommand::BeginCharge => {
                if shot.phase == ChargePhase::Idle {
                    shot.phase = ChargePhase::Charging;
                    shot.scale = 1.0;
                    shot.traveled = 0.0;
                    commands.entity(entity).insert(Visibility::Visible);
                }
            }
            PlayerCommand::FireCharge => {
                if shot.is_charging() {
                    let dir = if lock_on.active {
                        enemy_q
                            .iter()
                            .find(|(_, health)| health.alive)
                            .map(|(enemy_tf, _)| {
                                (enemy_tf.translation + Vec3::Y - shot_tf.translation)
                                    .normalize_or_zero()
                            })
                            .unwrap_or_else(|| forward(player_tf.rotation))
                    } else {
                        forward(player_tf.rotation)
                    };
                    shot.phase = ChargePhase::Fired;
                    shot.traveled = 0.0;
                    velocity.linvel = dir * config.charge_shot_speed;
                    commands.entity(entity).remove::<ColliderDisabled>();
                }
            }
            PlayerCommand::FireBullet => {}
        }
    }
}

/// Grow the held shot and keep it pinned in front of the player.
pub fn charge_follow_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameplayConfig>,
    player_q: Query<&Transform, With<Player>>,
    mut shot_q: Query<(&mut ChargeShot, &mut Transform, &mut Velocity), Without<Player>>,
) {
    let Ok((mut shot, mut transform, mut velocity)) = shot_q.single_mut() else {
        return;
    };
    if !shot.is_charging() {
        return;
    }
    let Ok(player_tf) = player_q.single() else {
        return;
    };

    let dt = time.delta_secs();
    shot.grow(config.charge_scale_speed, config.charge_max_scale, dt);

    let fwd = forward(player_tf.rotation);
    let offset = follow_offset(config.player_radius, shot.scale, config.charge_offset_margin);
    transform.translation = player_tf.translation + fwd * offset + Vec3::Y;
    transform.scale = Vec3::splat(shot.scale);
    velocity.linvel = Vec3::ZERO;

    spawn_charge_particle(&mut commands, transform.translation, shot.scale);
}

/// Accumulate flight distance; the phase-sync system applies the range cap.
pub fn charge_travel_system(
    time: Res<Time>,
    mut shot_q: Query<(&mut ChargeShot, &Velocity)>,
) {
    let Ok((mut shot, velocity)) = shot_q.single_mut() else {
        return;
    };
    if !shot.is_fired() {
        return;
    }
    shot.traveled += velocity.linvel.length() * time.delta_secs();
}

/// Park the shot whenever it is (or has just become) idle, and recall it when
/// a fired shot passes the range cap.
///
/// Runs after combat resolution may have called [`ChargeShot::reset_idle`],
/// so impact and range-out share one dormancy path.
pub fn charge_phase_sync_system(
    mut commands: Commands,
    config: Res<GameplayConfig>,
    player_q: Query<&Transform, With<Player>>,
    mut shot_q: Query<
        (Entity, &mut ChargeShot, &mut Transform, &mut Velocity, &Visibility),
        Without<Player>,
    >,
) {
    let Ok((entity, mut shot, mut transform, mut velocity, visibility)) = shot_q.single_mut()
    else {
        return;
    };

    if shot.is_fired() && shot.traveled >= config.charge_max_dist {
        shot.reset_idle();
    }

    if !shot.is_alive() && *visibility != Visibility::Hidden {
        velocity.linvel = Vec3::ZERO;
        transform.scale = Vec3::ONE;
        if let Ok(player_tf) = player_q.single() {
            transform.translation = player_tf.translation;
        }
        commands
            .entity(entity)
            .insert((Visibility::Hidden, ColliderDisabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_caps_and_promotes_to_max() {
        let mut shot = ChargeShot::new();
        shot.phase = ChargePhase::Charging;
        // 1.25/s from 1.0 reaches the 4.0 cap in 2.4s.
        for _ in 0..150 {
            shot.grow(1.25, 4.0, 1.0 / 60.0);
        }
        assert_eq!(shot.scale, 4.0);
        assert!(shot.is_max_scale());
        // Further growth is a no-op.
        shot.grow(1.25, 4.0, 1.0);
        assert_eq!(shot.scale, 4.0);
    }

    #[test]
    fn grow_is_inert_outside_charging() {
        let mut shot = ChargeShot::new();
        shot.grow(1.25, 4.0, 1.0);
        assert_eq!(shot.phase, ChargePhase::Idle);
        assert_eq!(shot.scale, 1.0);
    }

    #[test]
    fn reset_returns_to_dormant_defaults() {
        let mut shot = ChargeShot::new();
        shot.phase = ChargePhase::Fired;
        shot.scale = 4.0;
        shot.traveled = 120.0;
        shot.reset_idle();
        assert_eq!(shot.phase, ChargePhase::Idle);
        assert_eq!(shot.scale, 1.0);
        assert_eq!(shot.traveled, 0.0);
    }

    #[test]
    fn follow_offset_grows_with_scale() {
        let near = follow_offset(0.6, 1.0, 0.5);
        let far = follow_offset(0.6, 4.0, 0.5);
        assert!(far > near);
        // At scale 1: player radius + base radius + margin.
        assert!((near - (0.6 + CHARGE_BASE_RADIUS + 0.5)).abs() < 1e-6);
    }
}
