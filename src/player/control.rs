//! Input gathering and the per-frame state-machine driver.
//!
//! Raw device state is folded into the [`InputSnapshot`] resource once per
//! frame; every downstream system (the state machine, lock-on toggle) reads
//! the snapshot instead of the keyboard directly, so headless tests can drive
//! the player by writing the resource.
//!
//! Bindings:
//! - `WASD` — move
//! - `J` — melee attack
//! - `K` — fire bullet
//! - `L` — charge shot (hold to grow, release to fire)
//! - `Shift` — dash
//! - `Q` — toggle lock-on

use crate::actor::MoveAxis;
use crate::config::GameplayConfig;
use crate::player::combo::ComboTracker;
use crate::player::machine::{PlayerStateMachine, StateCtx};
use crate::player::state::{InputSnapshot, LockOn, MeleeState, Player, PlayerCommand};
use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

/// Fold the keyboard into this frame's [`InputSnapshot`].
pub fn build_input_snapshot_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    let mut axis = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }

    *snapshot = InputSnapshot {
        move_axis: axis.normalize_or_zero(),
        attack_pressed: keys.just_pressed(KeyCode::KeyJ),
        fire_pressed: keys.just_pressed(KeyCode::KeyK),
        dash_pressed: keys.just_pressed(KeyCode::ShiftLeft)
            || keys.just_pressed(KeyCode::ShiftRight),
        charge_pressed: keys.just_pressed(KeyCode::KeyL),
        charge_held: keys.pressed(KeyCode::KeyL),
        charge_released: keys.just_released(KeyCode::KeyL),
        lock_on_pressed: keys.just_pressed(KeyCode::KeyQ),
    };
}

/// Toggle aim-assist lock-on on its edge input.
pub fn lock_on_toggle_system(snapshot: Res<InputSnapshot>, mut lock_on: ResMut<LockOn>) {
    if snapshot.lock_on_pressed {
        lock_on.active = !lock_on.active;
    }
}

/// Run the player's state machine for one frame.
///
/// Builds a [`StateCtx`] over the player's components, lets the active state
/// mutate it, then forwards any emitted [`PlayerCommand`]s to the combat
/// systems and mirrors the input axis into [`MoveAxis`] for facing updates.
pub fn player_state_machine_system(
    time: Res<Time>,
    snapshot: Res<InputSnapshot>,
    config: Res<GameplayConfig>,
    mut commands_out: MessageWriter<PlayerCommand>,
    mut q: Query<
        (
            &mut Transform,
            &mut Velocity,
            &mut ComboTracker,
            &mut MeleeState,
            &mut MoveAxis,
            &mut PlayerStateMachine,
        ),
        With<Player>,
    >,
) {
    let Ok((mut transform, mut velocity, mut combo, mut melee, mut move_axis, mut machine)) =
        q.single_mut()
    else {
        return;
    };

    let dt = time.delta_secs();
    combo.tick(dt);
    move_axis.0 = snapshot.move_axis;

    let mut melee_active = melee.active;
    let mut emitted = Vec::new();
    {
        let mut ctx = StateCtx::new(
            dt,
            &snapshot,
            &config,
            &mut transform,
            &mut velocity.linvel,
            &mut combo,
            &mut melee_active,
            &mut emitted,
        );
        machine.update(&mut ctx);
    }
    melee.active = melee_active;

    for command in emitted {
        commands_out.write(command);
    }
}
