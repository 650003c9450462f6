//! Riftstrike — a third-person 3D action combat slice built on Bevy and
//! Rapier3D.
//!
//! One player, one training enemy, three attack channels:
//!
//! - a three-stage timed **melee combo** driven by hand sensor colliders,
//! - **homing bullets** that steer toward a locked target,
//! - a hold-to-grow **charge shot** released as a slow heavy projectile.
//!
//! Damage flows through a strict two-phase pipeline (accumulate during
//! contact resolution, apply once per frame — see [`combat`]), and hits feed
//! back through hit-stop time dilation and camera shake ([`feedback`]).
//!
//! Module map:
//!
//! | Module        | Responsibility                                     |
//! |---------------|----------------------------------------------------|
//! | [`constants`] | Compile-time tuning defaults                       |
//! | [`config`]    | `assets/tuning.toml` runtime overrides             |
//! | [`error`]     | Domain error taxonomy + tunable validation         |
//! | [`direction`] | Orientation basis, yaw math, 8-way facing          |
//! | [`actor`]     | Health (two-phase damage), movement, facing        |
//! | [`player`]    | Input, state machine, combo, bullets, charge shot  |
//! | [`enemy`]     | The training target: tracking, flinch, death       |
//! | [`combat`]    | Collider tags, contact bridge, resolution table    |
//! | [`feedback`]  | Hit-stop + camera shake                            |
//! | [`particles`] | Impact bursts, bullet trails, charge motes         |
//! | [`camera`]    | Follow camera, lighting, arena                     |
//! | [`hud`]       | Health bars + charge meter                         |

pub mod actor;
pub mod camera;
pub mod combat;
pub mod config;
pub mod constants;
pub mod direction;
pub mod enemy;
pub mod error;
pub mod feedback;
pub mod hud;
pub mod particles;
pub mod player;
