//! HUD: player and enemy health bars, plus the charge meter shown while a
//! charge shot is being held.
//!
//! Pure read-side UI.  Each bar is an outer frame `Node` with a fill child
//! whose width percentage tracks [`Health::fraction`] (or charge progress);
//! no gameplay state lives here.

use crate::actor::Health;
use crate::enemy::Enemy;
use crate::player::charge::ChargeShot;
use crate::player::state::Player;
use bevy::prelude::*;

#[derive(Component)]
struct PlayerHpFill;

#[derive(Component)]
struct EnemyHpFill;

#[derive(Component)]
struct ChargeMeterRoot;

#[derive(Component)]
struct ChargeMeterFill;

// ── Setup ─────────────────────────────────────────────────────────────────────

const FRAME_COLOR: Color = Color::srgba(0.05, 0.05, 0.08, 0.85);

fn bar_frame(width: f32, height: f32) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Px(width),
            height: Val::Px(height),
            padding: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BackgroundColor(FRAME_COLOR),
    )
}

fn bar_fill(color: Color) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(color),
    )
}

pub fn setup_hud(mut commands: Commands) {
    // Player health, bottom left.
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(24.0),
            bottom: Val::Px(24.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn(bar_frame(240.0, 18.0)).with_children(|frame| {
                frame.spawn((PlayerHpFill, bar_fill(Color::srgb(0.25, 0.8, 0.35))));
            });
            // Charge meter sits under the health bar, hidden until used.
            parent
                .spawn((
                    ChargeMeterRoot,
                    Visibility::Hidden,
                    bar_frame(240.0, 10.0),
                ))
                .with_children(|frame| {
                    frame.spawn((ChargeMeterFill, bar_fill(Color::srgb(0.7, 0.4, 1.0))));
                });
        });

    // Enemy health, top center.
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(24.0),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-160.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn(bar_frame(320.0, 14.0)).with_children(|frame| {
                frame.spawn((EnemyHpFill, bar_fill(Color::srgb(0.85, 0.25, 0.25))));
            });
        });
}

// ── Update systems ────────────────────────────────────────────────────────────

fn player_hp_bar_system(
    player_q: Query<&Health, With<Player>>,
    mut fill_q: Query<&mut Node, With<PlayerHpFill>>,
) {
    let (Ok(health), Ok(mut node)) = (player_q.single(), fill_q.single_mut()) else {
        return;
    };
    node.width = Val::Percent(health.fraction() * 100.0);
}

fn enemy_hp_bar_system(
    enemy_q: Query<&Health, With<Enemy>>,
    mut fill_q: Query<&mut Node, With<EnemyHpFill>>,
) {
    let (Ok(health), Ok(mut node)) = (enemy_q.single(), fill_q.single_mut()) else {
        return;
    };
    node.width = Val::Percent(health.fraction() * 100.0);
}

/// Show the meter only while a shot is held; fill tracks growth toward the
/// scale cap.
fn charge_meter_system(
    config: Res<crate::config::GameplayConfig>,
    shot_q: Query<&ChargeShot>,
    mut root_q: Query<&mut Visibility, With<ChargeMeterRoot>>,
    mut fill_q: Query<&mut Node, With<ChargeMeterFill>>,
) {
    let (Ok(shot), Ok(mut visibility), Ok(mut node)) =
        (shot_q.single(), root_q.single_mut(), fill_q.single_mut())
    else {
        return;
    };

    if shot.is_charging() {
        *visibility = Visibility::Visible;
        let span = (config.charge_max_scale - 1.0).max(f32::EPSILON);
        let progress = ((shot.scale - 1.0) / span).clamp(0.0, 1.0);
        node.width = Val::Percent(progress * 100.0);
    } else {
        *visibility = Visibility::Hidden;
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud).add_systems(
            Update,
            (player_hp_bar_system, enemy_hp_bar_system, charge_meter_system),
        );
    }
}
