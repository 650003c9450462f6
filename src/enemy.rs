//! The training enemy: a stationary target that tracks the player, flinches
//! on hits, and powers down on death.
//!
//! Death does not despawn the entity.  The body is hidden and its collider
//! disabled, but the entity (and its `Health`) stays in the world so in-flight
//! bullets that captured it as a homing target degrade gracefully to straight
//! flight instead of dangling.

use crate::actor::Health;
use crate::combat::{collision_groups, ColliderKind, CombatSet};
use crate::config::GameplayConfig;
use crate::constants::ENEMY_RADIUS;
use crate::direction::{rotation_from_yaw, shortest_rotation, yaw_of};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for the enemy entity.
#[derive(Component)]
pub struct Enemy;

/// Hit-reaction timer; while positive the enemy stops tracking the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Flinch {
    pub remaining: f32,
}

impl Flinch {
    #[inline]
    pub fn is_flinching(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn trigger(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

/// Flat ground disc that follows its owner's footprint.
#[derive(Component)]
pub struct GroundShadow {
    pub owner: Entity,
}

// ── Spawning ──────────────────────────────────────────────────────────────────

const ENEMY_SPAWN: Vec3 = Vec3::new(0.0, 0.0, -8.0);

pub fn spawn_enemy(
    mut commands: Commands,
    config: Res<GameplayConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body = commands
        .spawn((
            Enemy,
            Health::new(config.enemy_max_hp),
            Flinch::default(),
            ColliderKind::Enemy,
            collision_groups(ColliderKind::Enemy),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.7, ENEMY_RADIUS),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::KINEMATIC_KINEMATIC,
            Mesh3d(meshes.add(Capsule3d::new(ENEMY_RADIUS, 1.4))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.2, 0.2),
                perceptual_roughness: 0.8,
                ..default()
            })),
            Transform::from_translation(ENEMY_SPAWN + Vec3::Y * 1.1),
            Visibility::default(),
        ))
        .id();

    // Fake blob shadow; cheaper than a second shadow-casting light.
    commands.spawn((
        GroundShadow { owner: body },
        Mesh3d(meshes.add(Circle::new(ENEMY_RADIUS * 1.2))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 0.0, 0.0, 0.45),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(Vec3::new(ENEMY_SPAWN.x, 0.02, ENEMY_SPAWN.z))
            .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        Visibility::default(),
    ));
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Turn the (live, non-flinching) enemy toward the player.
pub fn enemy_face_player_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    player_q: Query<&Transform, (With<crate::player::state::Player>, Without<Enemy>)>,
    mut enemy_q: Query<(&mut Transform, &Health, &Flinch), With<Enemy>>,
) {
    let Ok(player_tf) = player_q.single() else {
        return;
    };
    let Ok((mut transform, health, flinch)) = enemy_q.single_mut() else {
        return;
    };
    if !health.alive || flinch.is_flinching() {
        return;
    }

    let to_player = player_tf.translation - transform.translation;
    if Vec2::new(to_player.x, to_player.z).length_squared() < 1e-4 {
        return;
    }
    let target_yaw = to_player.x.atan2(-to_player.z).to_degrees();
    let current_yaw = yaw_of(transform.rotation);
    let delta = shortest_rotation(current_yaw, target_yaw);
    let t = (config.enemy_turn_rate * time.delta_secs()).min(1.0);
    transform.rotation = rotation_from_yaw(current_yaw + delta * t);
}

/// Latch the flinch timer while damage is pending this frame.
///
/// Runs between combat resolution and the damage apply step, the only window
/// in which `pending_damage` is populated.
pub fn flinch_trigger_system(
    config: Res<GameplayConfig>,
    mut q: Query<(&Health, &mut Flinch), With<Enemy>>,
) {
    for (health, mut flinch) in q.iter_mut() {
        if health.pending_damage > 0 {
            flinch.trigger(config.enemy_flinch_secs);
        }
    }
}

pub fn flinch_tick_system(time: Res<Time>, mut q: Query<&mut Flinch>) {
    for mut flinch in q.iter_mut() {
        flinch.tick(time.delta_secs());
    }
}

/// Power down a freshly dead enemy: hide the body, disable its collider.
/// The entity itself is retained.
pub fn enemy_death_system(
    mut commands: Commands,
    mut q: Query<(Entity, &Health, &mut Visibility), With<Enemy>>,
) {
    for (entity, health, mut visibility) in q.iter_mut() {
        if !health.alive && *visibility != Visibility::Hidden {
            *visibility = Visibility::Hidden;
            commands.entity(entity).insert(ColliderDisabled);
            info!("enemy defeated");
        }
    }
}

/// Keep each blob shadow under its owner, matching its visibility.
pub fn shadow_sync_system(
    owners: Query<(&Transform, &Visibility), Without<GroundShadow>>,
    mut shadows: Query<(&mut Transform, &mut Visibility, &GroundShadow)>,
) {
    for (mut transform, mut visibility, shadow) in shadows.iter_mut() {
        let Ok((owner_tf, owner_vis)) = owners.get(shadow.owner) else {
            continue;
        };
        transform.translation.x = owner_tf.translation.x;
        transform.translation.z = owner_tf.translation.z;
        *visibility = *owner_vis;
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_enemy)
            .add_systems(
                Update,
                (enemy_face_player_system, flinch_tick_system, shadow_sync_system),
            )
            .add_systems(
                PostUpdate,
                (
                    flinch_trigger_system
                        .after(CombatSet::Resolve)
                        .before(CombatSet::Apply),
                    enemy_death_system.in_set(CombatSet::React),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flinch_counts_down_and_clamps() {
        let mut flinch = Flinch::default();
        assert!(!flinch.is_flinching());
        flinch.trigger(0.25);
        assert!(flinch.is_flinching());
        flinch.tick(0.1);
        assert!(flinch.is_flinching());
        flinch.tick(1.0);
        assert!(!flinch.is_flinching());
        assert_eq!(flinch.remaining, 0.0);
    }

    #[test]
    fn retrigger_while_flinching_restarts_the_timer() {
        let mut flinch = Flinch::default();
        flinch.trigger(0.25);
        flinch.tick(0.2);
        flinch.trigger(0.25);
        flinch.tick(0.2);
        assert!(flinch.is_flinching());
    }
}
