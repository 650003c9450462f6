//! Follow camera, lighting, and the arena floor.
//!
//! The camera trails the player from behind at a fixed distance/height with
//! exponential smoothing, looks at a point just above the player's feet, and
//! then applies the current [`Shake`] perturbation on top — shake is a
//! post-offset, so it never leaks into the smoothed rig position.

use crate::config::GameplayConfig;
use crate::constants::ARENA_HALF;
use crate::direction::{forward, probe_front};
use crate::feedback::Shake;
use crate::player::state::Player;
use bevy::prelude::*;

/// Marker for the gameplay follow camera.
#[derive(Component)]
pub struct FollowCamera;

// ── Setup ─────────────────────────────────────────────────────────────────────

pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        FollowCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.0, 9.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(ARENA_HALF * 2.0, ARENA_HALF * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.34, 0.38),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::default(),
    ));
}

// ── Per-frame systems ─────────────────────────────────────────────────────────

/// Trail the player and apply the shake perturbation.
pub fn camera_follow_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    shake: Res<Shake>,
    player_q: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut camera_q: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok(player_tf) = player_q.single() else {
        return;
    };
    let Ok(mut camera_tf) = camera_q.single_mut() else {
        return;
    };

    let behind = -forward(player_tf.rotation);
    let desired = player_tf.translation
        + behind * config.camera_distance
        + Vec3::Y * config.camera_height;

    let t = (config.camera_lerp * time.delta_secs()).min(1.0);
    let rig_pos = camera_tf.translation.lerp(desired, t);

    camera_tf.translation = rig_pos;
    camera_tf.look_at(player_tf.translation + Vec3::Y * 1.2, Vec3::Y);

    if shake.is_active() {
        camera_tf.translation = rig_pos + shake.offset;
        camera_tf.rotate_local_z(shake.roll_deg.to_radians());
    }
}

/// Debug overlay: a line from the player to the forward probe point.
pub fn facing_probe_gizmo_system(
    mut gizmos: Gizmos,
    player_q: Query<&Transform, With<Player>>,
) {
    let Ok(player_tf) = player_q.single() else {
        return;
    };
    let origin = player_tf.translation + Vec3::Y;
    let probe = probe_front(player_tf) + Vec3::Y;
    gizmos.line(origin, probe, Color::srgb(0.2, 1.0, 0.4));
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_world).add_systems(
            Update,
            (camera_follow_system, facing_probe_gizmo_system),
        );
    }
}
