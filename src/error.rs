//! Gameplay error types.
//!
//! The frame loop itself has no recoverable I/O on the hot path, so these
//! types mostly serve validation helpers and graceful-degradation logging.
//! A failure in one actor's update must never abort the frame for others;
//! systems log and degrade instead of panicking.

use std::fmt;

/// Top-level error enum for the combat simulation.
#[derive(Debug)]
pub enum GameError {
    /// `change_state` was asked for a name with no registered state.
    /// Treated as a programming error: asserted in development builds,
    /// logged no-op in release.
    UnknownState {
        /// The name that failed lookup.
        name: &'static str,
    },

    /// A stored non-owning reference (lock-on target, bullet target) no
    /// longer resolves to a live entity.  The dependent behaviour degrades
    /// (fly straight / aim forward) rather than faulting.
    StaleTarget {
        /// Where the lookup happened.
        context: &'static str,
    },

    /// A tunable is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeTunable {
        /// Name of the tunable (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownState { name } => {
                write!(f, "no state registered under '{}'", name)
            }
            GameError::StaleTarget { context } => {
                write!(f, "stale target reference during '{}'", context)
            }
            GameError::UnsafeTunable {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tunable '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if the homing gain would overshoot within one 60 Hz frame.
///
/// At gain g the per-frame lerp fraction is g·dt; above 60.0 the fraction
/// exceeds 1.0 at 60 FPS and the steering stops being a decay.
pub fn validate_homing_strength(value: f32) -> GameResult<()> {
    if value < 0.0 || value > 60.0 {
        Err(GameError::UnsafeTunable {
            name: "homing_strength",
            value,
            safe_range: "[0.0, 60.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the hit-stop clock scale is not in `[0, 1]`.
pub fn validate_hit_stop_scale(value: f32) -> GameResult<()> {
    if !(0.0..=1.0).contains(&value) {
        Err(GameError::UnsafeTunable {
            name: "hit_stop_scale",
            value,
            safe_range: "[0.0, 1.0]",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homing_strength_bounds() {
        assert!(validate_homing_strength(2.0).is_ok());
        assert!(validate_homing_strength(-0.1).is_err());
        assert!(validate_homing_strength(61.0).is_err());
    }

    #[test]
    fn hit_stop_scale_bounds() {
        assert!(validate_hit_stop_scale(0.05).is_ok());
        assert!(validate_hit_stop_scale(1.5).is_err());
    }
}
