//! Combat feedback utilities: hit-stop (global time-dilation pulse) and
//! camera shake (frame-counted jitter pulse).
//!
//! Both are plain timers owned by no actor — combat resolution calls
//! `start()` on them when a hit lands, and their tick systems run
//! unconditionally every frame.  Re-triggering while active restarts the
//! pulse from zero.
//!
//! Hit-stop is implemented as virtual-clock dilation: while active the
//! `Time<Virtual>` relative speed is dropped to `hit_stop_scale`, freezing
//! every system that reads the default `Time`.  The pulse itself is ticked by
//! the **real** clock so it can end.

use crate::config::GameplayConfig;
use bevy::prelude::*;
use rand::Rng;

// ── Hit-stop ──────────────────────────────────────────────────────────────────

/// Global time-dilation pulse.
#[derive(Resource, Debug, Clone)]
pub struct HitStop {
    /// Pulse length in real seconds.
    pub duration: f32,
    /// Virtual-clock speed while the pulse is active.
    pub time_scale: f32,
    elapsed: f32,
    active: bool,
}

impl HitStop {
    pub fn from_config(config: &GameplayConfig) -> Self {
        Self {
            duration: config.hit_stop_duration,
            time_scale: config.hit_stop_scale,
            elapsed: 0.0,
            active: false,
        }
    }

    /// Begin (or restart) the pulse.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Advance by `dt` real seconds; clears `active` once
    /// `elapsed >= duration`.  Returns `true` while still active afterwards.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.active {
            self.elapsed += dt;
            if self.elapsed >= self.duration {
                self.active = false;
            }
        }
        self.active
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Tick the hit-stop with real (unscaled) time and drive the virtual clock's
/// relative speed accordingly.
pub fn hit_stop_system(
    mut hit_stop: ResMut<HitStop>,
    real_time: Res<Time<Real>>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    let was_active = hit_stop.is_active();
    let still_active = hit_stop.tick(real_time.delta_secs());
    if still_active {
        virtual_time.set_relative_speed(hit_stop.time_scale);
    } else if was_active {
        virtual_time.set_relative_speed(1.0);
    }
}

// ── Shake ─────────────────────────────────────────────────────────────────────

/// Frame-counted camera jitter pulse.
///
/// While active, a fresh random translation/roll offset is drawn within the
/// configured bounds on frames where `frame % interval == 0`; the pulse
/// deactivates exactly when `frame >= duration_frames` and the offset returns
/// to zero.
#[derive(Resource, Debug, Clone)]
pub struct Shake {
    pub duration_frames: u32,
    pub interval_frames: u32,
    /// Per-axis translation offset bound (u).
    pub max_offset: f32,
    /// Roll perturbation bound (degrees).
    pub max_roll_deg: f32,
    frame: u32,
    active: bool,
    /// Current translation perturbation applied to the camera.
    pub offset: Vec3,
    /// Current roll perturbation (degrees).
    pub roll_deg: f32,
}

impl Shake {
    pub fn from_config(config: &GameplayConfig) -> Self {
        Self {
            duration_frames: config.shake_duration_frames,
            interval_frames: config.shake_interval_frames.max(1),
            max_offset: config.shake_max_offset,
            max_roll_deg: config.shake_max_roll_deg,
            frame: 0,
            active: false,
            offset: Vec3::ZERO,
            roll_deg: 0.0,
        }
    }

    /// Begin (or restart) the pulse.
    pub fn start(&mut self) {
        self.frame = 0;
        self.active = true;
    }

    /// Advance one frame.  Draws a new offset on interval frames while
    /// active; zeroes the offset and deactivates at `duration_frames`.
    ///
    /// Generic over the RNG so tests can drive it deterministically.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if !self.active {
            self.offset = Vec3::ZERO;
            self.roll_deg = 0.0;
            return;
        }
        if self.frame >= self.duration_frames {
            self.active = false;
            self.offset = Vec3::ZERO;
            self.roll_deg = 0.0;
            return;
        }
        if self.frame % self.interval_frames == 0 {
            let b = self.max_offset;
            self.offset = Vec3::new(
                rng.gen_range(-b..=b),
                rng.gen_range(-b..=b),
                rng.gen_range(-b..=b),
            );
            self.roll_deg = rng.gen_range(-self.max_roll_deg..=self.max_roll_deg);
        }
        self.frame += 1;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Per-frame shake tick; the camera system reads `shake.offset` afterwards.
pub fn shake_tick_system(mut shake: ResMut<Shake>) {
    let mut rng = rand::thread_rng();
    shake.tick(&mut rng);
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_feedback_resources).add_systems(
            PreUpdate,
            // Dilation must land before anything reads the scaled clock.
            (hit_stop_system, shake_tick_system),
        );
    }
}

/// Build the feedback resources from the loaded configuration.
///
/// Runs in `Startup`, after the `PreStartup` config load.
fn init_feedback_resources(mut commands: Commands, config: Res<GameplayConfig>) {
    commands.insert_resource(HitStop::from_config(&config));
    commands.insert_resource(Shake::from_config(&config));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_config() -> GameplayConfig {
        GameplayConfig::default()
    }

    #[test]
    fn hit_stop_active_window_is_half_open() {
        let mut hs = HitStop::from_config(&test_config());
        hs.duration = 0.1;
        hs.start();
        assert!(hs.is_active());
        hs.tick(0.05);
        assert!(hs.is_active(), "active for elapsed in [0, 0.1)");
        hs.tick(0.05);
        assert!(!hs.is_active(), "inactive at exactly 0.1s accumulated");
    }

    #[test]
    fn hit_stop_crossing_threshold_deactivates_that_tick() {
        let mut hs = HitStop::from_config(&test_config());
        hs.duration = 0.1;
        hs.start();
        // One oversized frame crosses the threshold: cleared immediately.
        assert!(!hs.tick(0.25));
    }

    #[test]
    fn hit_stop_restart_while_active() {
        let mut hs = HitStop::from_config(&test_config());
        hs.duration = 0.1;
        hs.start();
        hs.tick(0.09);
        hs.start();
        hs.tick(0.09);
        assert!(hs.is_active(), "restart resets the elapsed counter");
    }

    #[test]
    fn shake_redraws_only_on_interval_frames() {
        let mut shake = Shake::from_config(&test_config());
        shake.duration_frames = 6;
        shake.interval_frames = 2;
        shake.start();
        let mut rng = StdRng::seed_from_u64(7);

        shake.tick(&mut rng); // frame 0: draw
        let first = shake.offset;
        assert!(first != Vec3::ZERO);
        shake.tick(&mut rng); // frame 1: hold
        assert_eq!(shake.offset, first, "off-interval frames keep the offset");
        shake.tick(&mut rng); // frame 2: redraw
        assert_ne!(shake.offset, first);
    }

    #[test]
    fn shake_deactivates_exactly_at_duration() {
        let mut shake = Shake::from_config(&test_config());
        shake.duration_frames = 3;
        shake.interval_frames = 1;
        shake.start();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..3 {
            shake.tick(&mut rng);
            assert!(shake.is_active());
        }
        shake.tick(&mut rng); // frame counter reached duration
        assert!(!shake.is_active());
        assert_eq!(shake.offset, Vec3::ZERO);
        assert_eq!(shake.roll_deg, 0.0);
    }

    #[test]
    fn shake_offsets_respect_bounds() {
        let mut shake = Shake::from_config(&test_config());
        shake.duration_frames = 60;
        shake.interval_frames = 1;
        shake.max_offset = 0.25;
        shake.max_roll_deg = 1.5;
        shake.start();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..60 {
            shake.tick(&mut rng);
            assert!(shake.offset.abs().max_element() <= 0.25);
            assert!(shake.roll_deg.abs() <= 1.5);
        }
    }
}
