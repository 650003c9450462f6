//! Melee combo stage tracker.
//!
//! A combo is an ordered list of attack stages.  Each attack input landing
//! within [`GameplayConfig::input_reset_time`] of the previous one advances
//! to the next stage (wrapping after the final stage); a longer gap resets to
//! stage 0.  The state machine reads [`ComboTracker::stage`] to pick the
//! attack state and damage/animation for the swing.

use crate::constants::COMBO_STAGES;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy)]
pub struct ComboTracker {
    stage: usize,
    stage_count: usize,
    /// Seconds since the last accepted attack input.
    since_last: f32,
    /// Window within which the next input chains (s).
    reset_time: f32,
    /// False until the first input ever; the first input always lands on
    /// stage 0 regardless of the timer.
    primed: bool,
}

impl ComboTracker {
    pub fn new(reset_time: f32) -> Self {
        Self {
            stage: 0,
            stage_count: COMBO_STAGES,
            since_last: 0.0,
            reset_time,
            primed: false,
        }
    }

    /// Current stage index in `0..stage_count`.
    #[inline]
    pub fn stage(&self) -> usize {
        self.stage
    }

    #[inline]
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Advance the gap timer; called once per frame.
    pub fn tick(&mut self, dt: f32) {
        self.since_last += dt;
    }

    /// Register an attack input.  Returns the stage this input lands on.
    ///
    /// Inside the window the stage advances (wrapping); outside it the combo
    /// restarts at stage 0.
    pub fn register_input(&mut self) -> usize {
        if self.primed && self.since_last <= self.reset_time {
            self.stage = (self.stage + 1) % self.stage_count;
        } else {
            self.stage = 0;
        }
        self.primed = true;
        self.since_last = 0.0;
        self.stage
    }

    /// Hard reset, e.g. when an attack is interrupted.
    pub fn reset(&mut self) {
        self.stage = 0;
        self.primed = false;
        self.since_last = 0.0;
    }
}
