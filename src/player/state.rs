//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live
//! here.  Systems that mutate this state are in the sibling modules:
//! - [`super::control`] — input snapshot + state-machine driver + movement
//! - [`super::combat`] — bullet firing/homing + hand colliders
//! - [`super::charge`] — charge-shot lifecycle

use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker for the two melee hand collider entities (children of the player).
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerHand {
    /// `-1.0` for the left hand, `+1.0` for the right.
    pub side: f32,
}

/// Whether the melee hand colliders should currently register contacts.
///
/// Written by the attack states through the state-machine context; read by
/// `combat::hand_collider_sync_system`, which enables/disables the hand
/// collider entities to match.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MeleeState {
    pub active: bool,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Lock-on aim-assist mode.  While `active` and the enemy is alive, bullets
/// and the charge shot aim at the enemy instead of the player's forward.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LockOn {
    pub active: bool,
}

/// Aggregated player input for the current frame, derived from all sources.
///
/// Edge fields (`*_pressed`, `charge_released`) are true only on the frame
/// the transition happened; `charge_held` is level-triggered.  The input
/// system rebuilds this each frame; tests populate it directly to drive the
/// state machine without a real device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Movement axis: x = right, y = forward, each in `[-1, 1]`.
    pub move_axis: Vec2,
    /// Melee attack was pressed this frame.
    pub attack_pressed: bool,
    /// Bullet fire was pressed this frame.
    pub fire_pressed: bool,
    /// Dash was pressed this frame.
    pub dash_pressed: bool,
    /// Charge input was pressed this frame.
    pub charge_pressed: bool,
    /// Charge input is held.
    pub charge_held: bool,
    /// Charge input was released this frame.
    pub charge_released: bool,
    /// Lock-on toggle was pressed this frame.
    pub lock_on_pressed: bool,
}

/// Commands emitted by the player state machine for the combat systems to
/// consume later in the same frame.  Keeping these as messages (rather than
/// direct world mutation from inside the states) keeps the states pure over
/// their context and the firing systems independently testable.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Spawn a bullet (lock-on aware).
    FireBullet,
    /// Begin growing the charge shot.
    BeginCharge,
    /// Release the charge shot.
    FireCharge,
}
