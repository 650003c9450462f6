//! Contact routing and combat resolution.
//!
//! ## Pipeline (all in `PostUpdate`, strictly ordered by [`CombatSet`])
//!
//! 1. **Contacts** — [`contact_bridge_system`] turns raw rapier
//!    `CollisionEvent::Started` pairs into domain [`ContactMessage`]s by
//!    looking up each collider's [`ColliderKind`] tag.  Pairs where either
//!    side is untagged are dropped.
//! 2. **Resolve** — [`combat_resolution_system`] walks the contact messages
//!    and *accumulates* damage into [`Health::pending_damage`]; it never
//!    writes `hp`.  Feedback (hit-stop, shake, bursts) triggers here.
//! 3. **Apply** — [`apply_pending_damage_system`] applies each actor's summed
//!    damage exactly once, clamps, and re-derives `alive`.
//! 4. **React** — death/flinch systems respond to the applied result.
//!
//! Because resolution only accumulates and apply runs once, several hits
//! landing on the same frame produce the same total in any iteration order.
//!
//! ## Collider tags
//!
//! Every combat collider carries a [`ColliderKind`].  Resolution is a match
//! over the two tags of a pair — a closed table, no downcasting, and adding a
//! new participant means the compiler points at every match to extend.

use crate::actor::{apply_pending_damage_system, Health};
use crate::config::GameplayConfig;
use crate::feedback::{HitStop, Shake};
use crate::particles::spawn_impact_burst;
use crate::player::charge::ChargeShot;
use crate::player::combat::PlayerBullet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Collider identity ─────────────────────────────────────────────────────────

/// What a combat collider *is*, for pair resolution.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    Player,
    Enemy,
    PlayerBullet,
    ChargeShot,
    /// One of the player's melee hand sensors.
    Hand,
}

const ENEMY_GROUP: Group = Group::GROUP_1;
const PLAYER_GROUP: Group = Group::GROUP_2;
const BULLET_GROUP: Group = Group::GROUP_3;
const CHARGE_GROUP: Group = Group::GROUP_4;
const HAND_GROUP: Group = Group::GROUP_5;

/// Membership/filter pairs per collider kind.
///
/// Player attacks only ever test against the enemy group, so bullets cannot
/// clip each other or the growing charge shot.
pub fn collision_groups(kind: ColliderKind) -> CollisionGroups {
    match kind {
        ColliderKind::Player => CollisionGroups::new(PLAYER_GROUP, ENEMY_GROUP),
        ColliderKind::Enemy => CollisionGroups::new(
            ENEMY_GROUP,
            PLAYER_GROUP | BULLET_GROUP | CHARGE_GROUP | HAND_GROUP,
        ),
        ColliderKind::PlayerBullet => CollisionGroups::new(BULLET_GROUP, ENEMY_GROUP),
        ColliderKind::ChargeShot => CollisionGroups::new(CHARGE_GROUP, ENEMY_GROUP),
        ColliderKind::Hand => CollisionGroups::new(HAND_GROUP, ENEMY_GROUP),
    }
}

// ── Contact messages ──────────────────────────────────────────────────────────

/// A new overlap between two tagged combat colliders this frame.
///
/// Edge-triggered: emitted once when the pair starts touching, matching the
/// rapier `Started` event.  Tests inject these directly to exercise the
/// resolution table without running physics.
#[derive(Message, Debug, Clone, Copy)]
pub struct ContactMessage {
    pub a: Entity,
    pub a_kind: ColliderKind,
    pub b: Entity,
    pub b_kind: ColliderKind,
}

/// Translate rapier collision-start events into [`ContactMessage`]s.
pub fn contact_bridge_system(
    mut collisions: MessageReader<CollisionEvent>,
    kinds: Query<&ColliderKind>,
    mut contacts: MessageWriter<ContactMessage>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        let (Ok(a_kind), Ok(b_kind)) = (kinds.get(*a), kinds.get(*b)) else {
            continue;
        };
        contacts.write(ContactMessage {
            a: *a,
            a_kind: *a_kind,
            b: *b,
            b_kind: *b_kind,
        });
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Resolve this frame's contacts against the pair table.
///
/// | Pair                  | Effect                                                            |
/// |-----------------------|-------------------------------------------------------------------|
/// | Hand × Enemy          | accumulate `hand_damage`; hit-stop + shake                        |
/// | Bullet × Enemy        | accumulate `bullet_damage`; mark hit + disable collider; burst    |
/// | ChargeShot × Enemy    | accumulate `charge_shot_damage`; recall the shot; burst           |
///
/// Guards: a bullet that already hit is inert, and nothing accumulates onto a
/// dead enemy (a kill and a follow-up hit resolving on the same frame must
/// not double-count).
#[allow(clippy::too_many_arguments)]
pub fn combat_resolution_system(
    mut commands: Commands,
    mut contacts: MessageReader<ContactMessage>,
    config: Res<GameplayConfig>,
    mut hit_stop: ResMut<HitStop>,
    mut shake: ResMut<Shake>,
    mut healths: Query<&mut Health>,
    mut bullets: Query<(&mut PlayerBullet, &Transform, &Velocity)>,
    mut shots: Query<(&mut ChargeShot, &Transform, &Velocity)>,
) {
    for contact in contacts.read() {
        // Canonicalize so the enemy is always on one side.
        let (enemy, other, other_kind) = match (contact.a_kind, contact.b_kind) {
            (ColliderKind::Enemy, kind) => (contact.a, contact.b, kind),
            (kind, ColliderKind::Enemy) => (contact.b, contact.a, kind),
            _ => continue,
        };

        match other_kind {
            ColliderKind::Hand => {
                let Ok(mut health) = healths.get_mut(enemy) else {
                    continue;
                };
                if !health.alive {
                    continue;
                }
                health.accumulate(config.hand_damage);
                hit_stop.start();
                shake.start();
            }
            ColliderKind::PlayerBullet => {
                let Ok((mut bullet, transform, velocity)) = bullets.get_mut(other) else {
                    continue;
                };
                if bullet.is_hit {
                    continue;
                }
                let Ok(mut health) = healths.get_mut(enemy) else {
                    continue;
                };
                if !health.alive {
                    continue;
                }
                health.accumulate(config.bullet_damage);
                bullet.is_hit = true;
                commands.entity(other).insert(ColliderDisabled);
                hit_stop.start();
                shake.start();
                spawn_impact_burst(
                    &mut commands,
                    transform.translation,
                    velocity.linvel,
                    config.impact_burst_lifetime,
                );
            }
            ColliderKind::ChargeShot => {
                let Ok((mut shot, transform, velocity)) = shots.get_mut(other) else {
                    continue;
                };
                if !shot.is_fired() {
                    continue;
                }
                if let Ok(mut health) = healths.get_mut(enemy) {
                    if health.alive && config.charge_shot_damage > 0 {
                        health.accumulate(config.charge_shot_damage);
                    }
                }
                shot.reset_idle();
                hit_stop.start();
                shake.start();
                spawn_impact_burst(
                    &mut commands,
                    transform.translation,
                    velocity.linvel,
                    config.impact_burst_lifetime,
                );
            }
            ColliderKind::Player | ColliderKind::Enemy => {}
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Ordered phases of the combat pipeline in `PostUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Contacts,
    Resolve,
    Apply,
    React,
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ContactMessage>()
            .configure_sets(
                PostUpdate,
                (
                    CombatSet::Contacts,
                    CombatSet::Resolve,
                    CombatSet::Apply,
                    CombatSet::React,
                )
                    .chain(),
            )
            .add_systems(
                PostUpdate,
                (
                    contact_bridge_system.in_set(CombatSet::Contacts),
                    combat_resolution_system.in_set(CombatSet::Resolve),
                    apply_pending_damage_system.in_set(CombatSet::Apply),
                ),
            );
    }
}
