use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use riftstrike::camera::CameraPlugin;
use riftstrike::combat::CombatPlugin;
use riftstrike::config::{load_gameplay_config, save_gameplay_config, GameplayConfig};
use riftstrike::enemy::EnemyPlugin;
use riftstrike::feedback::FeedbackPlugin;
use riftstrike::hud::HudPlugin;
use riftstrike::particles::ParticlesPlugin;
use riftstrike::player::PlayerPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Riftstrike".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(GameplayConfig::default())
        // Config loads before any Startup spawn reads it.
        .add_systems(PreStartup, load_gameplay_config)
        .add_plugins((
            FeedbackPlugin,
            ParticlesPlugin,
            PlayerPlugin,
            EnemyPlugin,
            CombatPlugin,
            CameraPlugin,
            HudPlugin,
        ))
        .add_systems(Update, save_config_on_key)
        .run();
}

/// Debug affordance: `F5` persists the live tuning values back to
/// `assets/tuning.toml`.
fn save_config_on_key(keys: Res<ButtonInput<KeyCode>>, config: Res<GameplayConfig>) {
    if keys.just_pressed(KeyCode::F5) {
        match save_gameplay_config(&config) {
            Ok(()) => info!("tuning saved"),
            Err(e) => warn!("failed to save tuning: {e}"),
        }
    }
}
