//! Player state machine: named states in a registry, one active at a time.
//!
//! States implement [`PlayerState`] (`on_enter` / `update` / `on_exit`) over
//! a [`StateCtx`] that exposes exactly the player data a state may touch —
//! transform, planar velocity, tuning, combo tracker, the melee-window flag,
//! and a [`PlayerCommand`] sink.  States request transitions through
//! [`StateCtx::request`]; the machine performs the exit/enter handshake after
//! the update returns, so a state never observes itself half-replaced.
//!
//! Unknown state names are a programming error: [`PlayerStateMachine::
//! change_state`] returns [`GameError::UnknownState`], which the driver
//! asserts on in development builds and logs as a no-op in release.

use crate::config::GameplayConfig;
use crate::direction::{forward, rotation_from_yaw, shortest_rotation, yaw_of};
use crate::error::{GameError, GameResult};
use crate::player::combo::ComboTracker;
use crate::player::state::{InputSnapshot, PlayerCommand};
use bevy::prelude::*;
use std::collections::HashMap;

// ── State names ───────────────────────────────────────────────────────────────

pub const STATE_IDLE: &str = "idle";
pub const STATE_MOVE: &str = "move";
pub const STATE_DASH: &str = "dash";
pub const STATE_CHARGE: &str = "charge";
pub const ATTACK_STATES: [&str; 3] = ["attack1", "attack2", "attack3"];

/// Name of the attack state for a combo stage index.
#[inline]
pub fn attack_state_name(stage: usize) -> &'static str {
    ATTACK_STATES[stage % ATTACK_STATES.len()]
}

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything a state may read or mutate during one frame.
pub struct StateCtx<'a> {
    pub dt: f32,
    pub input: &'a InputSnapshot,
    pub config: &'a GameplayConfig,
    pub transform: &'a mut Transform,
    /// Linear velocity of the player's kinematic body.
    pub linvel: &'a mut Vec3,
    pub combo: &'a mut ComboTracker,
    /// Hand colliders register contacts only while this is true.
    pub melee_active: &'a mut bool,
    pub commands: &'a mut Vec<PlayerCommand>,
    next: Option<&'static str>,
}

impl<'a> StateCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dt: f32,
        input: &'a InputSnapshot,
        config: &'a GameplayConfig,
        transform: &'a mut Transform,
        linvel: &'a mut Vec3,
        combo: &'a mut ComboTracker,
        melee_active: &'a mut bool,
        commands: &'a mut Vec<PlayerCommand>,
    ) -> Self {
        Self {
            dt,
            input,
            config,
            transform,
            linvel,
            combo,
            melee_active,
            commands,
            next: None,
        }
    }

    /// Request a transition; honored after the current callback returns.
    pub fn request(&mut self, name: &'static str) {
        self.next = Some(name);
    }

    /// Steer the planar velocity toward the input axis at `target_speed`,
    /// turning the body toward the travel heading the short way around.
    pub fn apply_planar_movement(&mut self, target_speed: f32) {
        let axis = self.input.move_axis;
        let desired = Vec3::new(axis.x, 0.0, -axis.y);
        if desired.length_squared() < 1e-6 {
            self.decelerate_planar();
            return;
        }
        let desired_dir = desired.normalize();

        let current_yaw = yaw_of(self.transform.rotation);
        let desired_yaw = desired_dir.x.atan2(-desired_dir.z).to_degrees();
        let delta = shortest_rotation(current_yaw, desired_yaw);
        let t = (self.config.turn_rate * self.dt).min(1.0);
        self.transform.rotation = rotation_from_yaw(current_yaw + delta * t);

        let planar = Vec3::new(self.linvel.x, 0.0, self.linvel.z);
        let target = desired_dir * target_speed.min(self.config.max_speed);
        let max_step = self.config.accel_rate * self.dt;
        let dv = target - planar;
        let step = if dv.length() <= max_step {
            dv
        } else {
            dv.normalize() * max_step
        };
        self.linvel.x = planar.x + step.x;
        self.linvel.z = planar.z + step.z;
    }

    /// Bleed planar velocity toward zero at the acceleration rate.
    pub fn decelerate_planar(&mut self) {
        let planar = Vec3::new(self.linvel.x, 0.0, self.linvel.z);
        let max_step = self.config.accel_rate * self.dt;
        let step = if planar.length() <= max_step {
            planar
        } else {
            planar.normalize() * max_step
        };
        self.linvel.x -= step.x;
        self.linvel.z -= step.z;
    }
}

// ── Trait & machine ───────────────────────────────────────────────────────────

pub trait PlayerState: Send + Sync {
    fn on_enter(&mut self, _ctx: &mut StateCtx) {}
    fn update(&mut self, ctx: &mut StateCtx);
    fn on_exit(&mut self, _ctx: &mut StateCtx) {}
}

/// Name-keyed registry of states with exactly one active.
#[derive(Component)]
pub struct PlayerStateMachine {
    states: HashMap<&'static str, Box<dyn PlayerState>>,
    active: &'static str,
}

impl PlayerStateMachine {
    /// Build the machine with the full default state set, starting in `idle`.
    pub fn with_default_states() -> Self {
        let mut states: HashMap<&'static str, Box<dyn PlayerState>> = HashMap::new();
        states.insert(STATE_IDLE, Box::new(IdleState));
        states.insert(STATE_MOVE, Box::new(MoveState));
        states.insert(STATE_DASH, Box::new(DashState::default()));
        states.insert(STATE_CHARGE, Box::new(ChargeState));
        for (stage, name) in ATTACK_STATES.into_iter().enumerate() {
            states.insert(name, Box::new(AttackState::new(stage)));
        }
        Self {
            states,
            active: STATE_IDLE,
        }
    }

    /// Name of the currently active state.
    #[inline]
    pub fn active(&self) -> &'static str {
        self.active
    }

    /// Switch to a registered state, running the exit/enter handshake.
    ///
    /// An unknown name leaves the machine untouched and returns the error;
    /// the driver decides whether that asserts (dev) or logs (release).
    pub fn change_state(&mut self, name: &'static str, ctx: &mut StateCtx) -> GameResult<()> {
        if !self.states.contains_key(name) {
            return Err(GameError::UnknownState { name });
        }
        if let Some(state) = self.states.get_mut(self.active) {
            state.on_exit(ctx);
        }
        self.active = name;
        if let Some(state) = self.states.get_mut(self.active) {
            state.on_enter(ctx);
        }
        Ok(())
    }

    /// Run the active state's update, then follow any requested transitions.
    ///
    /// Transition chains are capped so a cyclic enter-request bug degrades to
    /// a logged warning instead of a hang.
    pub fn update(&mut self, ctx: &mut StateCtx) {
        if let Some(state) = self.states.get_mut(self.active) {
            state.update(ctx);
        }
        let mut hops = 0;
        while let Some(next) = ctx.next.take() {
            if hops >= 4 {
                warn!("state transition chain exceeded 4 hops; stopping at '{}'", self.active);
                break;
            }
            if let Err(e) = self.change_state(next, ctx) {
                debug_assert!(false, "{e}");
                warn!("{e}");
                break;
            }
            hops += 1;
        }
    }
}

// ── Shared transition helpers ─────────────────────────────────────────────────

/// Transitions available from any grounded neutral state (idle / move).
///
/// Returns `true` when a transition was requested.
fn neutral_transitions(ctx: &mut StateCtx) -> bool {
    if ctx.input.attack_pressed {
        let stage = ctx.combo.register_input();
        ctx.request(attack_state_name(stage));
        return true;
    }
    if ctx.input.dash_pressed {
        ctx.request(STATE_DASH);
        return true;
    }
    if ctx.input.charge_pressed {
        ctx.request(STATE_CHARGE);
        return true;
    }
    if ctx.input.fire_pressed {
        ctx.commands.push(PlayerCommand::FireBullet);
    }
    false
}

// ── States ────────────────────────────────────────────────────────────────────

struct IdleState;

impl PlayerState for IdleState {
    fn update(&mut self, ctx: &mut StateCtx) {
        if neutral_transitions(ctx) {
            return;
        }
        if ctx.input.move_axis.length_squared() > 1e-4 {
            ctx.request(STATE_MOVE);
            return;
        }
        ctx.decelerate_planar();
    }
}

struct MoveState;

impl PlayerState for MoveState {
    fn update(&mut self, ctx: &mut StateCtx) {
        if neutral_transitions(ctx) {
            return;
        }
        if ctx.input.move_axis.length_squared() <= 1e-4 {
            ctx.request(STATE_IDLE);
            return;
        }
        let speed = ctx.config.move_speed;
        ctx.apply_planar_movement(speed);
    }
}

/// One stage of the melee combo.  The hand colliders are live only inside
/// the `[attack_active_start, attack_active_end)` window; pressing attack
/// after the window opens chains into the next stage.
struct AttackState {
    stage: usize,
    elapsed: f32,
}

impl AttackState {
    fn new(stage: usize) -> Self {
        Self {
            stage,
            elapsed: 0.0,
        }
    }
}

impl PlayerState for AttackState {
    fn on_enter(&mut self, ctx: &mut StateCtx) {
        self.elapsed = 0.0;
        // Small lunge along the current facing gives swings forward weight.
        let lunge = forward(ctx.transform.rotation) * 2.0;
        ctx.linvel.x = lunge.x;
        ctx.linvel.z = lunge.z;
    }

    fn update(&mut self, ctx: &mut StateCtx) {
        self.elapsed += ctx.dt;
        *ctx.melee_active = self.elapsed >= ctx.config.attack_active_start
            && self.elapsed < ctx.config.attack_active_end;

        if ctx.input.attack_pressed && self.elapsed >= ctx.config.attack_active_start {
            let stage = ctx.combo.register_input();
            if stage != self.stage {
                ctx.request(attack_state_name(stage));
                return;
            }
        }

        ctx.decelerate_planar();

        if self.elapsed >= ctx.config.attack_duration {
            if ctx.input.move_axis.length_squared() > 1e-4 {
                ctx.request(STATE_MOVE);
            } else {
                ctx.request(STATE_IDLE);
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut StateCtx) {
        *ctx.melee_active = false;
    }
}

/// Short burst along the current facing; control returns when the timer ends.
#[derive(Default)]
struct DashState {
    elapsed: f32,
}

impl PlayerState for DashState {
    fn on_enter(&mut self, ctx: &mut StateCtx) {
        self.elapsed = 0.0;
        let dir = forward(ctx.transform.rotation);
        let burst = dir * ctx.config.dash_speed;
        ctx.linvel.x = burst.x;
        ctx.linvel.z = burst.z;
    }

    fn update(&mut self, ctx: &mut StateCtx) {
        self.elapsed += ctx.dt;
        if self.elapsed >= ctx.config.dash_duration {
            if ctx.input.move_axis.length_squared() > 1e-4 {
                ctx.request(STATE_MOVE);
            } else {
                ctx.request(STATE_IDLE);
            }
        }
    }
}

/// Movement locks while the charge input is held; release fires and returns
/// to neutral.  The charge shot itself lives in [`super::charge`] — this
/// state only issues the begin/fire commands.
struct ChargeState;

impl PlayerState for ChargeState {
    fn on_enter(&mut self, ctx: &mut StateCtx) {
        ctx.commands.push(PlayerCommand::BeginCharge);
    }

    fn update(&mut self, ctx: &mut StateCtx) {
        ctx.decelerate_planar();
        if ctx.input.charge_released || !ctx.input.charge_held {
            ctx.commands.push(PlayerCommand::FireCharge);
            ctx.request(STATE_IDLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INPUT_RESET_TIME;

    struct Harness {
        input: InputSnapshot,
        config: GameplayConfig,
        transform: Transform,
        linvel: Vec3,
        combo: ComboTracker,
        melee_active: bool,
        commands: Vec<PlayerCommand>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                input: InputSnapshot::default(),
                config: GameplayConfig::default(),
                transform: Transform::IDENTITY,
                linvel: Vec3::ZERO,
                combo: ComboTracker::new(INPUT_RESET_TIME),
                melee_active: false,
                commands: Vec::new(),
            }
        }

        fn step(&mut self, machine: &mut PlayerStateMachine, dt: f32) {
            self.combo.tick(dt);
            let mut ctx = StateCtx::new(
                dt,
                &self.input,
                &self.config,
                &mut self.transform,
                &mut self.linvel,
                &mut self.combo,
                &mut self.melee_active,
                &mut self.commands,
            );
            machine.update(&mut ctx);
        }
    }

    #[test]
    fn starts_in_idle() {
        let machine = PlayerStateMachine::with_default_states();
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn movement_axis_enters_move_state() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.move_axis = Vec2::new(0.0, 1.0);
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), STATE_MOVE);
        // Releasing the stick goes back to idle.
        h.input.move_axis = Vec2::ZERO;
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn attack_press_enters_first_combo_stage() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.attack_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), "attack1");
    }

    #[test]
    fn chained_attacks_walk_the_combo() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.attack_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        h.input.attack_pressed = false;

        // Run past the active-window start, then press again.
        for _ in 0..8 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        h.input.attack_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), "attack2");
    }

    #[test]
    fn melee_window_opens_and_closes() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.attack_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        h.input.attack_pressed = false;

        assert!(!h.melee_active, "window not open on the first frame");
        // Step to the middle of the active window (~0.15s).
        for _ in 0..9 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        assert!(h.melee_active, "window open mid-swing");
        // Step past the window end.
        for _ in 0..6 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        assert!(!h.melee_active, "window closed after active end");
    }

    #[test]
    fn attack_state_returns_to_idle_when_done() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.attack_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        h.input.attack_pressed = false;
        for _ in 0..30 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn dash_bursts_then_returns() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.dash_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        h.input.dash_pressed = false;
        assert_eq!(machine.active(), STATE_DASH);
        assert!(h.linvel.length() > 10.0, "dash sets a velocity burst");
        for _ in 0..15 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn charge_hold_and_release_emit_commands() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.charge_pressed = true;
        h.input.charge_held = true;
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), STATE_CHARGE);
        assert!(h.commands.contains(&PlayerCommand::BeginCharge));

        h.input.charge_pressed = false;
        h.step(&mut machine, 1.0 / 60.0);
        assert_eq!(machine.active(), STATE_CHARGE, "holds while input held");

        h.input.charge_held = false;
        h.input.charge_released = true;
        h.step(&mut machine, 1.0 / 60.0);
        assert!(h.commands.contains(&PlayerCommand::FireCharge));
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn fire_press_emits_bullet_command_without_leaving_state() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        h.input.fire_pressed = true;
        h.step(&mut machine, 1.0 / 60.0);
        assert!(h.commands.contains(&PlayerCommand::FireBullet));
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn unknown_state_name_is_rejected_and_machine_unchanged() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        let mut ctx = StateCtx::new(
            1.0 / 60.0,
            &h.input,
            &h.config,
            &mut h.transform,
            &mut h.linvel,
            &mut h.combo,
            &mut h.melee_active,
            &mut h.commands,
        );
        let err = machine.change_state("no-such-state", &mut ctx);
        assert!(err.is_err());
        assert_eq!(machine.active(), STATE_IDLE);
    }

    #[test]
    fn move_state_turns_the_short_way() {
        let mut machine = PlayerStateMachine::with_default_states();
        let mut h = Harness::new();
        // Face almost fully around (+170°), then steer slightly past the
        // wrap point; the yaw must cross 180 rather than unwinding -340°.
        h.transform.rotation = rotation_from_yaw(170.0);
        h.input.move_axis = Vec2::new(-0.17, -0.98); // heading ≈ -170°
        for _ in 0..30 {
            h.step(&mut machine, 1.0 / 60.0);
        }
        let yaw = yaw_of(h.transform.rotation);
        assert!(
            yaw > 170.0 || yaw < -160.0,
            "turned the short way across the wrap, yaw = {yaw}"
        );
    }
}
