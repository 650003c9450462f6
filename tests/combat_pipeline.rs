//! End-to-end tests of the damage pipeline in a headless app.
//!
//! Contacts are injected as [`ContactMessage`]s directly (the same messages
//! the rapier bridge emits), so these tests exercise the full
//! resolve-then-apply ordering without running physics or rendering.

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use riftstrike::actor::{apply_pending_damage_system, Health};
use riftstrike::combat::{combat_resolution_system, ColliderKind, ContactMessage};
use riftstrike::config::GameplayConfig;
use riftstrike::feedback::{HitStop, Shake};
use riftstrike::player::charge::{ChargePhase, ChargeShot};
use riftstrike::player::combat::PlayerBullet;

fn headless_app() -> App {
    let mut app = App::new();
    let config = GameplayConfig::default();
    app.add_plugins(MinimalPlugins)
        .insert_resource(HitStop::from_config(&config))
        .insert_resource(Shake::from_config(&config))
        .insert_resource(config)
        .add_message::<ContactMessage>()
        .add_systems(
            PostUpdate,
            (combat_resolution_system, apply_pending_damage_system).chain(),
        );
    app
}

fn spawn_enemy(app: &mut App, hp: i32) -> Entity {
    app.world_mut()
        .spawn((Health::new(hp), ColliderKind::Enemy))
        .id()
}

fn spawn_hand(app: &mut App) -> Entity {
    app.world_mut().spawn(ColliderKind::Hand).id()
}

fn spawn_bullet(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            PlayerBullet::new(5.0, None),
            ColliderKind::PlayerBullet,
            Transform::default(),
            Velocity::linear(Vec3::NEG_Z * 40.0),
        ))
        .id()
}

fn send_contact(app: &mut App, a: Entity, a_kind: ColliderKind, b: Entity, b_kind: ColliderKind) {
    app.world_mut()
        .resource_mut::<Messages<ContactMessage>>()
        .write(ContactMessage {
            a,
            a_kind,
            b,
            b_kind,
        });
}

fn enemy_health(app: &App, enemy: Entity) -> Health {
    *app.world().entity(enemy).get::<Health>().unwrap()
}

#[test]
fn hand_hit_applies_damage_and_triggers_feedback() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 20);
    let hand = spawn_hand(&mut app);

    send_contact(&mut app, hand, ColliderKind::Hand, enemy, ColliderKind::Enemy);
    app.update();

    let health = enemy_health(&app, enemy);
    assert_eq!(health.hp, 16);
    assert_eq!(health.pending_damage, 0);
    assert!(health.alive);
    assert!(app.world().resource::<HitStop>().is_active());
    assert!(app.world().resource::<Shake>().is_active());
}

#[test]
fn simultaneous_hand_and_bullet_hits_sum_in_one_apply() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 20);
    let hand = spawn_hand(&mut app);
    let bullet = spawn_bullet(&mut app);

    // Both contacts land on the same frame; order within it is arbitrary,
    // so one arrives enemy-first to exercise pair canonicalization.
    send_contact(&mut app, hand, ColliderKind::Hand, enemy, ColliderKind::Enemy);
    send_contact(
        &mut app,
        enemy,
        ColliderKind::Enemy,
        bullet,
        ColliderKind::PlayerBullet,
    );
    app.update();

    let health = enemy_health(&app, enemy);
    assert_eq!(health.hp, 20 - 4 - 2, "both hits land, summed, once");
    assert_eq!(health.pending_damage, 0);

    let bullet_state = app.world().entity(bullet).get::<PlayerBullet>().unwrap();
    assert!(bullet_state.is_hit);
}

#[test]
fn bullet_that_already_hit_is_inert() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 20);
    let bullet = spawn_bullet(&mut app);

    send_contact(
        &mut app,
        bullet,
        ColliderKind::PlayerBullet,
        enemy,
        ColliderKind::Enemy,
    );
    app.update();
    assert_eq!(enemy_health(&app, enemy).hp, 18);

    // A second contact report from the same bullet does nothing.
    send_contact(
        &mut app,
        bullet,
        ColliderKind::PlayerBullet,
        enemy,
        ColliderKind::Enemy,
    );
    app.update();
    assert_eq!(enemy_health(&app, enemy).hp, 18);
}

#[test]
fn overkill_clamps_at_zero_and_flips_alive() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 3);
    let hand = spawn_hand(&mut app);

    send_contact(&mut app, hand, ColliderKind::Hand, enemy, ColliderKind::Enemy);
    app.update();

    let health = enemy_health(&app, enemy);
    assert_eq!(health.hp, 0);
    assert!(!health.alive);
}

#[test]
fn dead_enemy_accumulates_nothing() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 3);
    let hand = spawn_hand(&mut app);

    send_contact(&mut app, hand, ColliderKind::Hand, enemy, ColliderKind::Enemy);
    app.update();
    assert!(!enemy_health(&app, enemy).alive);

    // Hits resolved after death are dropped at the guard, not clamped later.
    let bullet = spawn_bullet(&mut app);
    send_contact(
        &mut app,
        bullet,
        ColliderKind::PlayerBullet,
        enemy,
        ColliderKind::Enemy,
    );
    app.update();

    let health = enemy_health(&app, enemy);
    assert_eq!(health.hp, 0);
    assert_eq!(health.pending_damage, 0);
    let bullet_state = app.world().entity(bullet).get::<PlayerBullet>().unwrap();
    assert!(!bullet_state.is_hit, "no hit is consumed on a dead target");
}

#[test]
fn charge_shot_contact_recalls_the_shot() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 20);
    let shot = app
        .world_mut()
        .spawn((
            ChargeShot {
                phase: ChargePhase::Fired,
                scale: 4.0,
                traveled: 12.0,
            },
            ColliderKind::ChargeShot,
            Transform::default(),
            Velocity::linear(Vec3::NEG_Z * 60.0),
        ))
        .id();

    send_contact(
        &mut app,
        shot,
        ColliderKind::ChargeShot,
        enemy,
        ColliderKind::Enemy,
    );
    app.update();

    let shot_state = app.world().entity(shot).get::<ChargeShot>().unwrap();
    assert_eq!(shot_state.phase, ChargePhase::Idle);
    assert_eq!(shot_state.scale, 1.0);
    // Default charge damage is zero: the shot is knockback/feedback only.
    assert_eq!(enemy_health(&app, enemy).hp, 20);
    assert!(app.world().resource::<HitStop>().is_active());
}

#[test]
fn unfired_charge_shot_contact_is_ignored() {
    let mut app = headless_app();
    let enemy = spawn_enemy(&mut app, 20);
    let shot = app
        .world_mut()
        .spawn((
            ChargeShot {
                phase: ChargePhase::Charging,
                scale: 2.0,
                traveled: 0.0,
            },
            ColliderKind::ChargeShot,
            Transform::default(),
            Velocity::zero(),
        ))
        .id();

    send_contact(
        &mut app,
        shot,
        ColliderKind::ChargeShot,
        enemy,
        ColliderKind::Enemy,
    );
    app.update();

    let shot_state = app.world().entity(shot).get::<ChargeShot>().unwrap();
    assert_eq!(shot_state.phase, ChargePhase::Charging, "still growing");
    assert!(!app.world().resource::<HitStop>().is_active());
}

#[test]
fn non_enemy_pairs_fall_through_the_table() {
    let mut app = headless_app();
    let hand = spawn_hand(&mut app);
    let bullet = spawn_bullet(&mut app);

    send_contact(
        &mut app,
        hand,
        ColliderKind::Hand,
        bullet,
        ColliderKind::PlayerBullet,
    );
    app.update();

    let bullet_state = app.world().entity(bullet).get::<PlayerBullet>().unwrap();
    assert!(!bullet_state.is_hit);
    assert!(!app.world().resource::<HitStop>().is_active());
}
