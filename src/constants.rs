//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Every constant is mirrored by a field on [`crate::config::GameplayConfig`]
//! so it can be overridden at runtime from `assets/tuning.toml`.

// ── Health & damage ───────────────────────────────────────────────────────────

/// Player starting / maximum hit points.
pub const PLAYER_MAX_HP: i32 = 10;

/// Enemy starting / maximum hit points.
pub const ENEMY_MAX_HP: i32 = 20;

/// Damage accumulated per hand-collider contact during a melee swing.
pub const HAND_DAMAGE: i32 = 4;

/// Damage accumulated per bullet contact.
pub const BULLET_DAMAGE: i32 = 2;

/// Damage accumulated per charge-shot contact.
///
/// Defaults to zero: the charge shot's contact effect is the reset-to-idle
/// plus the impact burst; any direct HP cost is opt-in via tuning.
pub const CHARGE_SHOT_DAMAGE: i32 = 0;

// ── Player movement ───────────────────────────────────────────────────────────

/// Ground movement speed target (world units / s).
pub const MOVE_SPEED: f32 = 6.0;

/// Planar acceleration toward the movement target (u/s²).
pub const ACCEL_RATE: f32 = 30.0;

/// Hard cap on planar speed (u/s); dash may exceed `MOVE_SPEED` up to this.
pub const MAX_SPEED: f32 = 20.0;

/// Downward speed applied while airborne (u/s).  Constant-rate fall rather
/// than integrated gravity keeps landing frames deterministic.
pub const FALL_SPEED: f32 = 20.0;

/// Upward launch speed when a jump is granted (u/s).
pub const JUMP_SPEED: f32 = 8.0;

/// Exponential turn rate toward the desired heading (1/s).
/// Higher values snap faster; 10.0 settles within ~0.3 s.
pub const TURN_RATE: f32 = 10.0;

/// Dash burst speed along the current facing (u/s).
pub const DASH_SPEED: f32 = 18.0;

/// Dash state duration (s).
pub const DASH_DURATION: f32 = 0.18;

/// Player body sphere radius (u); also the base of the charge-shot forward
/// offset.
pub const PLAYER_RADIUS: f32 = 0.6;

// ── Melee combo ───────────────────────────────────────────────────────────────

/// Number of stages in the melee combo chain.
pub const COMBO_STAGES: usize = 3;

/// Maximum gap between successive attack inputs before the combo resets to
/// stage 0 (s).
pub const INPUT_RESET_TIME: f32 = 0.3;

/// Total duration of one attack-stage state (s).
pub const ATTACK_DURATION: f32 = 0.35;

/// Time into the attack state at which the hand colliders switch on (s).
pub const ATTACK_ACTIVE_START: f32 = 0.08;

/// Time into the attack state at which the hand colliders switch off (s).
pub const ATTACK_ACTIVE_END: f32 = 0.22;

/// Hand collider radius (u).
pub const HAND_RADIUS: f32 = 0.35;

/// Hand collider forward offset from the player centre (u).
pub const HAND_FORWARD: f32 = 0.9;

/// Hand collider lateral offset, mirrored left/right (u).
pub const HAND_SIDE: f32 = 0.45;

/// Hand collider height above the player origin (u).
pub const HAND_HEIGHT: f32 = 1.0;

// ── Bullets ───────────────────────────────────────────────────────────────────

/// Initial bullet speed on fire (u/s).
pub const BULLET_SPEED: f32 = 40.0;

/// Forward acceleration applied along the bullet's (possibly steered)
/// direction every frame (u/s²).
pub const BULLET_ACCEL: f32 = 10.0;

/// Bullet speed cap (u/s).
pub const BULLET_MAX_SPEED: f32 = 200.0;

/// Seconds a bullet lives before expiring un-hit.
pub const BULLET_LIFETIME: f32 = 5.0;

/// Homing steering gain: fraction of the direction gap closed per second.
/// Linear interpolation of unit directions re-normalised each frame — an
/// exponential-decay steering approximation, not a constant-angular-rate turn.
pub const HOMING_STRENGTH: f32 = 2.0;

/// Steering is skipped entirely when the target is closer than this (u);
/// avoids degenerate normalisation at point-blank range.
pub const HOMING_MIN_DIST: f32 = 0.1;

/// Steering is skipped when the bullet is slower than this (u/s).
pub const HOMING_MIN_SPEED: f32 = 0.1;

/// Bullet spawn offset along the initial velocity direction (u).
pub const BULLET_SPAWN_FORWARD: f32 = 2.0;

/// Bullet spawn offset straight up (u).
pub const BULLET_SPAWN_UP: f32 = 1.0;

/// Bullet collider / visual radius (u).
pub const BULLET_RADIUS: f32 = 0.2;

/// Seconds between trail particle emissions while a bullet is in flight.
pub const BULLET_TRAIL_INTERVAL: f32 = 0.03;

/// Seconds a struck bullet lingers (collision disabled) so its impact burst
/// can finish playing before the entity despawns.
pub const IMPACT_BURST_LIFETIME: f32 = 0.35;

// ── Charge shot ───────────────────────────────────────────────────────────────

/// Charge-shot growth rate while the charge input is held (scale units / s).
pub const CHARGE_SCALE_SPEED: f32 = 1.25;

/// Maximum charge-shot scale; growth pins here.
pub const CHARGE_MAX_SCALE: f32 = 4.0;

/// Charge-shot travel speed once fired (u/s).
pub const CHARGE_SHOT_SPEED: f32 = 60.0;

/// Distance from the player past which a fired charge shot self-despawns (u).
pub const CHARGE_MAX_DIST: f32 = 300.0;

/// Charge-shot base sphere radius at scale 1.0 (u).
pub const CHARGE_BASE_RADIUS: f32 = 0.5;

/// Extra clearance between the player body and the charging sphere (u).
pub const CHARGE_OFFSET_MARGIN: f32 = 0.5;

// ── Feedback: hit-stop & shake ────────────────────────────────────────────────

/// Hit-stop pulse length in **real** (unscaled) seconds.
pub const HIT_STOP_DURATION: f32 = 0.1;

/// Virtual-clock speed while hit-stop is active.  0.05 reads as a freeze
/// without fully stalling particle playout.
pub const HIT_STOP_SCALE: f32 = 0.05;

/// Camera shake length in frames.
pub const SHAKE_DURATION_FRAMES: u32 = 18;

/// A fresh random shake offset is drawn every this-many frames while active.
pub const SHAKE_INTERVAL_FRAMES: u32 = 2;

/// Maximum magnitude of the shake translation offset per axis (u).
pub const SHAKE_MAX_OFFSET: f32 = 0.25;

/// Maximum camera roll perturbation (degrees).
pub const SHAKE_MAX_ROLL_DEG: f32 = 1.5;

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Enemy turn rate toward the player (1/s, exponential).
pub const ENEMY_TURN_RATE: f32 = 4.0;

/// Seconds the enemy holds its flinch pose after damage lands.
pub const ENEMY_FLINCH_SECS: f32 = 0.25;

/// Enemy body radius (u).
pub const ENEMY_RADIUS: f32 = 0.9;

// ── Directional probes & camera ───────────────────────────────────────────────

/// Default distance for the directional position probes (u).
pub const PROBE_DISTANCE: f32 = 3.0;

/// Camera follow distance behind the player (u).
pub const CAMERA_DISTANCE: f32 = 8.0;

/// Camera height above the player (u).
pub const CAMERA_HEIGHT: f32 = 3.5;

/// Exponential camera follow rate (1/s).
pub const CAMERA_LERP: f32 = 8.0;

/// Half-extent of the square arena floor (u).
pub const ARENA_HALF: f32 = 30.0;
