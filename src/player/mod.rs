//! Player: spawning, input, state machine, melee combo, bullets, charge shot.
//!
//! Submodule layout mirrors responsibilities:
//! - [`state`]   — components, resources, and the [`PlayerCommand`] message
//! - [`machine`] — the named-state machine the player runs on
//! - [`combo`]   — melee combo stage tracking
//! - [`control`] — input snapshot + per-frame machine driver
//! - [`combat`]  — bullet firing/homing + hand collider windowing
//! - [`charge`]  — the persistent charge-shot projectile

pub mod charge;
pub mod combat;
pub mod combo;
pub mod control;
pub mod machine;
pub mod state;

use crate::actor::{
    gravity_and_ground_system, update_facing_system, Facing, Grounded, Health, MoveAxis,
    MoveTuning,
};
use crate::combat::{collision_groups, ColliderKind, CombatSet};
use crate::config::GameplayConfig;
use crate::constants::{
    CHARGE_BASE_RADIUS, HAND_FORWARD, HAND_HEIGHT, HAND_RADIUS, HAND_SIDE, PLAYER_RADIUS,
};
use crate::enemy::GroundShadow;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub use self::charge::{ChargePhase, ChargeShot};
pub use self::combat::PlayerBullet;
pub use self::combo::ComboTracker;
pub use self::machine::{PlayerState, PlayerStateMachine};
pub use self::state::{InputSnapshot, LockOn, MeleeState, Player, PlayerCommand, PlayerHand};

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn the player rig: body, two hand sensors, blob shadow, and the
/// persistent (dormant) charge-shot entity.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<GameplayConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.45, 0.9),
        perceptual_roughness: 0.7,
        ..default()
    });
    let hand_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.9, 0.95),
        ..default()
    });

    let player = commands
        .spawn((
            Player,
            Health::new(config.player_max_hp),
            ComboTracker::new(config.input_reset_time),
            MeleeState::default(),
            PlayerStateMachine::with_default_states(),
            MoveTuning {
                move_speed: config.move_speed,
                fall_speed: config.fall_speed,
                jump_speed: config.jump_speed,
                max_speed: config.max_speed,
                accel_rate: config.accel_rate,
            },
            Grounded::default(),
            Facing::default(),
            MoveAxis::default(),
            ColliderKind::Player,
            collision_groups(ColliderKind::Player),
            // Nested so the outer tuple stays within Bundle's arity limit.
            (
                RigidBody::KinematicVelocityBased,
                Velocity::zero(),
                Collider::capsule_y(0.6, PLAYER_RADIUS),
                ActiveEvents::COLLISION_EVENTS,
                ActiveCollisionTypes::KINEMATIC_KINEMATIC,
            ),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, 1.2))),
                MeshMaterial3d(body_material),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ));
            // Hand sensors start disabled; the attack states' active window
            // switches them on through `hand_collider_sync_system`.
            for side in [-1.0f32, 1.0] {
                parent.spawn((
                    PlayerHand { side },
                    ColliderKind::Hand,
                    collision_groups(ColliderKind::Hand),
                    Collider::ball(HAND_RADIUS),
                    Sensor,
                    ColliderDisabled,
                    ActiveEvents::COLLISION_EVENTS,
                    ActiveCollisionTypes::KINEMATIC_KINEMATIC,
                    Mesh3d(meshes.add(Sphere::new(HAND_RADIUS * 0.8))),
                    MeshMaterial3d(hand_material.clone()),
                    Transform::from_xyz(side * HAND_SIDE, HAND_HEIGHT, -HAND_FORWARD),
                ));
            }
        })
        .id();

    commands.spawn((
        GroundShadow { owner: player },
        Mesh3d(meshes.add(Circle::new(PLAYER_RADIUS * 1.3))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 0.0, 0.0, 0.45),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.02, 0.0)
            .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        Visibility::default(),
    ));

    // The charge shot is one long-lived entity cycling through phases, not a
    // spawn-per-shot projectile.
    commands.spawn((
        ChargeShot::new(),
        ColliderKind::ChargeShot,
        collision_groups(ColliderKind::ChargeShot),
        RigidBody::KinematicVelocityBased,
        Velocity::zero(),
        Collider::ball(CHARGE_BASE_RADIUS),
        Sensor,
        Ccd::enabled(),
        ColliderDisabled,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::KINEMATIC_KINEMATIC,
        Mesh3d(meshes.add(Sphere::new(CHARGE_BASE_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.7, 0.4, 1.0),
            emissive: LinearRgba::new(0.7, 0.4, 1.0, 1.0) * 3.0,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
    ));
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSnapshot>()
            .init_resource::<LockOn>()
            .add_message::<PlayerCommand>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    control::build_input_snapshot_system,
                    control::lock_on_toggle_system,
                    control::player_state_machine_system,
                    combat::bullet_fire_system,
                    charge::charge_command_system,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    combat::attach_bullet_visual_system,
                    combat::bullet_update_system,
                    combat::bullet_trail_system,
                    combat::hand_collider_sync_system,
                    charge::charge_follow_system,
                    charge::charge_travel_system,
                    gravity_and_ground_system,
                    update_facing_system,
                )
                    .after(control::player_state_machine_system),
            )
            .add_systems(
                PostUpdate,
                charge::charge_phase_sync_system.in_set(CombatSet::React),
            );
    }
}
