//! Runtime gameplay configuration loaded from `assets/tuning.toml`.
//!
//! [`GameplayConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_gameplay_config`] reads
//! `assets/tuning.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameplayConfig>` to any system parameter list and read
//! values with `config.bullet_speed`, `config.shake_duration_frames`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameplayConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/tuning.toml`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    // ── Health & damage ──────────────────────────────────────────────────────
    pub player_max_hp: i32,
    pub enemy_max_hp: i32,
    pub hand_damage: i32,
    pub bullet_damage: i32,
    pub charge_shot_damage: i32,

    // ── Player movement ──────────────────────────────────────────────────────
    pub move_speed: f32,
    pub accel_rate: f32,
    pub max_speed: f32,
    pub fall_speed: f32,
    pub jump_speed: f32,
    pub turn_rate: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub player_radius: f32,

    // ── Melee combo ──────────────────────────────────────────────────────────
    pub input_reset_time: f32,
    pub attack_duration: f32,
    pub attack_active_start: f32,
    pub attack_active_end: f32,

    // ── Bullets ──────────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_accel: f32,
    pub bullet_max_speed: f32,
    pub bullet_lifetime: f32,
    pub homing_strength: f32,
    pub impact_burst_lifetime: f32,

    // ── Charge shot ──────────────────────────────────────────────────────────
    pub charge_scale_speed: f32,
    pub charge_max_scale: f32,
    pub charge_shot_speed: f32,
    pub charge_max_dist: f32,
    pub charge_base_radius: f32,
    pub charge_offset_margin: f32,

    // ── Feedback ─────────────────────────────────────────────────────────────
    pub hit_stop_duration: f32,
    pub hit_stop_scale: f32,
    pub shake_duration_frames: u32,
    pub shake_interval_frames: u32,
    pub shake_max_offset: f32,
    pub shake_max_roll_deg: f32,

    // ── Enemy ────────────────────────────────────────────────────────────────
    pub enemy_turn_rate: f32,
    pub enemy_flinch_secs: f32,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_distance: f32,
    pub camera_height: f32,
    pub camera_lerp: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            // Health & damage
            player_max_hp: PLAYER_MAX_HP,
            enemy_max_hp: ENEMY_MAX_HP,
            hand_damage: HAND_DAMAGE,
            bullet_damage: BULLET_DAMAGE,
            charge_shot_damage: CHARGE_SHOT_DAMAGE,
            // Player movement
            move_speed: MOVE_SPEED,
            accel_rate: ACCEL_RATE,
            max_speed: MAX_SPEED,
            fall_speed: FALL_SPEED,
            jump_speed: JUMP_SPEED,
            turn_rate: TURN_RATE,
            dash_speed: DASH_SPEED,
            dash_duration: DASH_DURATION,
            player_radius: PLAYER_RADIUS,
            // Melee combo
            input_reset_time: INPUT_RESET_TIME,
            attack_duration: ATTACK_DURATION,
            attack_active_start: ATTACK_ACTIVE_START,
            attack_active_end: ATTACK_ACTIVE_END,
            // Bullets
            bullet_speed: BULLET_SPEED,
            bullet_accel: BULLET_ACCEL,
            bullet_max_speed: BULLET_MAX_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            homing_strength: HOMING_STRENGTH,
            impact_burst_lifetime: IMPACT_BURST_LIFETIME,
            // Charge shot
            charge_scale_speed: CHARGE_SCALE_SPEED,
            charge_max_scale: CHARGE_MAX_SCALE,
            charge_shot_speed: CHARGE_SHOT_SPEED,
            charge_max_dist: CHARGE_MAX_DIST,
            charge_base_radius: CHARGE_BASE_RADIUS,
            charge_offset_margin: CHARGE_OFFSET_MARGIN,
            // Feedback
            hit_stop_duration: HIT_STOP_DURATION,
            hit_stop_scale: HIT_STOP_SCALE,
            shake_duration_frames: SHAKE_DURATION_FRAMES,
            shake_interval_frames: SHAKE_INTERVAL_FRAMES,
            shake_max_offset: SHAKE_MAX_OFFSET,
            shake_max_roll_deg: SHAKE_MAX_ROLL_DEG,
            // Enemy
            enemy_turn_rate: ENEMY_TURN_RATE,
            enemy_flinch_secs: ENEMY_FLINCH_SECS,
            // Camera
            camera_distance: CAMERA_DISTANCE,
            camera_height: CAMERA_HEIGHT,
            camera_lerp: CAMERA_LERP,
        }
    }
}

impl GameplayConfig {
    /// Reject values that would destabilize the simulation if loaded.
    pub fn validate(&self) -> crate::error::GameResult<()> {
        crate::error::validate_homing_strength(self.homing_strength)?;
        crate::error::validate_hit_stop_scale(self.hit_stop_scale)?;
        Ok(())
    }
}

/// Path of the persisted tunables file, relative to the working directory.
pub const TUNING_PATH: &str = "assets/tuning.toml";

/// Startup system: attempt to load `assets/tuning.toml` and overwrite the
/// `GameplayConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are
/// printed to stderr but do not abort the game.  A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_gameplay_config(mut config: ResMut<GameplayConfig>) {
    match std::fs::read_to_string(TUNING_PATH) {
        Ok(contents) => match toml::from_str::<GameplayConfig>(&contents) {
            Ok(loaded) => {
                if let Err(e) = loaded.validate() {
                    warn!("{e}; keeping previous values");
                    return;
                }
                *config = loaded;
                info!("loaded gameplay tuning from {TUNING_PATH}");
            }
            Err(e) => {
                eprintln!("failed to parse {TUNING_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("no {TUNING_PATH} found; using compiled defaults");
        }
    }
}

/// Write the active configuration back to `assets/tuning.toml`.
///
/// Debug affordance (bound to a key in `main.rs`) so tuning sessions can be
/// persisted without hand-editing the file.
pub fn save_gameplay_config(config: &GameplayConfig) -> std::io::Result<()> {
    let serialized = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = std::path::Path::new(TUNING_PATH).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(TUNING_PATH, serialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants() {
        let config = GameplayConfig::default();
        assert_eq!(config.hand_damage, HAND_DAMAGE);
        assert_eq!(config.bullet_damage, BULLET_DAMAGE);
        assert_eq!(config.bullet_lifetime, BULLET_LIFETIME);
        assert_eq!(config.charge_max_scale, CHARGE_MAX_SCALE);
        assert_eq!(config.hit_stop_duration, HIT_STOP_DURATION);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: GameplayConfig = toml::from_str("bullet_speed = 55.0").unwrap();
        assert_eq!(config.bullet_speed, 55.0);
        // Everything else keeps its compiled default.
        assert_eq!(config.bullet_lifetime, BULLET_LIFETIME);
        assert_eq!(config.hand_damage, HAND_DAMAGE);
    }

    #[test]
    fn validate_rejects_unstable_tunables() {
        let mut config = GameplayConfig::default();
        assert!(config.validate().is_ok());
        config.hit_stop_scale = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = GameplayConfig::default();
        config.homing_strength = 3.5;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: GameplayConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.homing_strength, 3.5);
    }
}
