//! Player ranged combat: homing bullets and the melee hand colliders.
//!
//! Bullets are kinematic sensor projectiles.  When fired with lock-on active
//! they remember their target entity and steer toward it every frame; the
//! steering lerps the *direction* of the velocity while a separate
//! acceleration term grows its magnitude toward a cap.  A bullet that hits
//! lingers briefly (collider already disabled) so its impact visuals are not
//! cut off, then despawns.
//!
//! The hand colliders are child sensors of the player that exist for the
//! whole session; [`hand_collider_sync_system`] enables them only while the
//! attack state's active window is open.

use crate::actor::Health;
use crate::combat::{collision_groups, ColliderKind};
use crate::config::GameplayConfig;
use crate::constants::{
    BULLET_RADIUS, BULLET_SPAWN_FORWARD, BULLET_SPAWN_UP, BULLET_TRAIL_INTERVAL,
    HOMING_MIN_DIST, HOMING_MIN_SPEED,
};
use crate::direction::forward;
use crate::enemy::Enemy;
use crate::error::GameError;
use crate::particles::spawn_trail_particle;
use crate::player::state::{LockOn, MeleeState, Player, PlayerCommand, PlayerHand};
use bevy::ecs::query::Has;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// A homing bullet in flight (or lingering after a hit).
#[derive(Component, Debug)]
pub struct PlayerBullet {
    /// Maximum flight time (s).
    pub life_time: f32,
    /// Time in flight so far (s).
    pub current_life_time: f32,
    /// Set by combat resolution when the bullet connects; flight stops and
    /// the linger countdown begins.
    pub is_hit: bool,
    /// Seconds the bullet survives after a hit before despawning.
    pub hit_linger: f32,
    /// Enemy captured at fire time when lock-on was active.  Homing is
    /// skipped when the entity is gone or dead; the bullet flies straight.
    pub locked_target: Option<Entity>,
}

impl PlayerBullet {
    pub fn new(life_time: f32, locked_target: Option<Entity>) -> Self {
        Self {
            life_time,
            current_life_time: 0.0,
            is_hit: false,
            hit_linger: 0.12,
            locked_target,
        }
    }
}

// ── Steering helpers ──────────────────────────────────────────────────────────

/// Steer `linvel` toward `target`: lerp the unit direction by
/// `strength * dt`, keep the magnitude.
///
/// Returns the input unchanged when the bullet is effectively on top of the
/// target or not meaningfully moving, so normalization stays well-defined.
pub fn steer_homing(linvel: Vec3, pos: Vec3, target: Vec3, strength: f32, dt: f32) -> Vec3 {
    let to_target = target - pos;
    let dist = to_target.length();
    let speed = linvel.length();
    if dist < HOMING_MIN_DIST || speed < HOMING_MIN_SPEED {
        return linvel;
    }
    let current_dir = linvel / speed;
    let desired_dir = to_target / dist;
    let blended = current_dir.lerp(desired_dir, (strength * dt).clamp(0.0, 1.0));
    blended.normalize_or_zero() * speed
}

/// True on the frame the lifetime threshold is crossed.
#[inline]
fn lifetime_crossed(prev: f32, now: f32, life_time: f32) -> bool {
    prev < life_time && now >= life_time
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Consume [`PlayerCommand::FireBullet`] and spawn a bullet.
///
/// With lock-on active and the enemy alive, the bullet launches toward the
/// enemy and remembers it for homing; otherwise it launches along the
/// player's facing and flies straight.
pub fn bullet_fire_system(
    mut commands: Commands,
    mut reader: MessageReader<PlayerCommand>,
    config: Res<GameplayConfig>,
    lock_on: Res<LockOn>,
    player_q: Query<&Transform, With<Player>>,
    enemy_q: Query<(Entity, &Transform, &Health), With<Enemy>>,
) {
    let shots = reader
        .read()
        .filter(|c| **c == PlayerCommand::FireBullet)
        .count();
    if shots == 0 {
        return;
    }
    let Ok(player_tf) = player_q.single() else {
        return;
    };

    let fwd = forward(player_tf.rotation);
    let muzzle = player_tf.translation + Vec3::Y * BULLET_SPAWN_UP;

    let target = if lock_on.active {
        enemy_q
            .iter()
            .find(|(_, _, health)| health.alive)
            .map(|(entity, tf, _)| (entity, tf.translation + Vec3::Y))
    } else {
        None
    };

    for _ in 0..shots {
        let (locked_target, dir) = match target {
            Some((entity, aim)) => (Some(entity), (aim - muzzle).normalize_or_zero()),
            None => (None, fwd),
        };
        // Spawn offset follows the launch direction, so lock-on shots clear
        // the body even when fired over the shoulder.
        let spawn_pos = muzzle + dir * BULLET_SPAWN_FORWARD;
        commands.spawn((
            PlayerBullet::new(config.bullet_lifetime, locked_target),
            ColliderKind::PlayerBullet,
            collision_groups(ColliderKind::PlayerBullet),
            RigidBody::KinematicVelocityBased,
            Velocity::linear(dir * config.bullet_speed),
            Collider::ball(BULLET_RADIUS),
            Sensor,
            Ccd::enabled(),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::KINEMATIC_KINEMATIC,
            Transform::from_translation(spawn_pos),
            Visibility::default(),
        ));
    }
}

/// Attach a glowing sphere to freshly spawned bullets.
pub fn attach_bullet_visual_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<Entity, Added<PlayerBullet>>,
) {
    for entity in q.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(BULLET_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.4, 0.8, 1.0),
                emissive: LinearRgba::new(0.4, 0.8, 1.0, 1.0) * 4.0,
                unlit: true,
                ..default()
            })),
        ));
    }
}

/// Advance every bullet: lifetime, hit linger, homing steer, acceleration.
pub fn bullet_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut bullets: Query<(Entity, &mut PlayerBullet, &mut Velocity, &Transform)>,
    targets: Query<(&Transform, &Health), With<Enemy>>,
) {
    let dt = time.delta_secs();

    for (entity, mut bullet, mut velocity, transform) in bullets.iter_mut() {
        if bullet.is_hit {
            velocity.linvel = Vec3::ZERO;
            bullet.hit_linger -= dt;
            if bullet.hit_linger <= 0.0 {
                commands.entity(entity).despawn();
            }
            continue;
        }

        let prev = bullet.current_life_time;
        bullet.current_life_time += dt;
        if lifetime_crossed(prev, bullet.current_life_time, bullet.life_time) {
            commands.entity(entity).despawn();
            continue;
        }

        if let Some(target) = bullet.locked_target {
            match targets.get(target) {
                Ok((target_tf, target_health)) => {
                    if target_health.alive {
                        velocity.linvel = steer_homing(
                            velocity.linvel,
                            transform.translation,
                            target_tf.translation + Vec3::Y,
                            config.homing_strength,
                            dt,
                        );
                    }
                }
                Err(_) => {
                    // Target entity is gone; degrade to straight flight.
                    warn!("{}", GameError::StaleTarget { context: "bullet homing" });
                    bullet.locked_target = None;
                }
            }
        }

        let speed = velocity.linvel.length();
        if speed >= HOMING_MIN_SPEED {
            let new_speed = (speed + config.bullet_accel * dt).min(config.bullet_max_speed);
            velocity.linvel = velocity.linvel / speed * new_speed;
        }
    }
}

/// Drop trail motes behind in-flight bullets at a fixed cadence.
pub fn bullet_trail_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: Local<f32>,
    bullets: Query<(&Transform, &Velocity, &PlayerBullet)>,
) {
    *timer += time.delta_secs();
    if *timer < BULLET_TRAIL_INTERVAL {
        return;
    }
    *timer -= BULLET_TRAIL_INTERVAL;

    for (transform, velocity, bullet) in bullets.iter() {
        if !bullet.is_hit {
            spawn_trail_particle(&mut commands, transform.translation, velocity.linvel);
        }
    }
}

/// Mirror the melee active window onto the hand collider entities.
pub fn hand_collider_sync_system(
    mut commands: Commands,
    player_q: Query<&MeleeState, With<Player>>,
    hands: Query<(Entity, Has<ColliderDisabled>), With<PlayerHand>>,
) {
    let Ok(melee) = player_q.single() else {
        return;
    };
    for (entity, disabled) in hands.iter() {
        if melee.active && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !melee.active && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homing_turns_toward_target() {
        // Flying along +X, target off to +Z.
        let vel = Vec3::X * 40.0;
        let steered = steer_homing(vel, Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 2.0, 1.0 / 60.0);
        assert!(steered.z > 0.0, "velocity bends toward the target");
        assert!((steered.length() - 40.0).abs() < 1e-3, "speed preserved");
    }

    #[test]
    fn homing_skipped_when_on_top_of_target() {
        let vel = Vec3::X * 40.0;
        let steered = steer_homing(vel, Vec3::ZERO, Vec3::new(0.05, 0.0, 0.0), 2.0, 1.0 / 60.0);
        assert_eq!(steered, vel, "inside the min-distance guard: no steer");
    }

    #[test]
    fn homing_skipped_when_nearly_stationary() {
        let vel = Vec3::X * 0.05;
        let steered = steer_homing(vel, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0, 1.0 / 60.0);
        assert_eq!(steered, vel, "below the min-speed guard: no steer");
    }

    #[test]
    fn full_strength_step_snaps_to_target_direction() {
        // strength * dt >= 1 clamps to a full lerp.
        let vel = Vec3::X * 10.0;
        let steered = steer_homing(vel, Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 120.0, 1.0 / 60.0);
        let dir = steered.normalize();
        assert!(dir.z > 0.99, "over-strong steer still lands exactly on-target");
    }

    #[test]
    fn lifetime_fires_only_on_crossing_frame() {
        assert!(!lifetime_crossed(4.9, 4.99, 5.0));
        assert!(lifetime_crossed(4.99, 5.01, 5.0));
        assert!(!lifetime_crossed(5.01, 5.02, 5.0), "already past: no re-fire");
    }
}
