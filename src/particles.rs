//! Particle effects: impact bursts on enemy hits and bullet flight trails.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores physics state (velocity, age, colour).  A two-system pipeline
//! handles them:
//!
//! | System                        | Schedule | Purpose                                     |
//! |-------------------------------|----------|---------------------------------------------|
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh3d` to freshly-spawned particles |
//! | `particle_update_system`      | Update   | Move, fade, and despawn expired particles    |
//!
//! Particle entities are spawned by free functions (`spawn_impact_burst`,
//! `spawn_trail_particle`) that take only `&mut Commands` — no `Assets`
//! access needed at spawn time.  `attach_particle_mesh_system` supplies the
//! mesh one frame later, which is imperceptible at 60 Hz.
//!
//! A single shared sphere-mesh [`ParticleMesh`] resource is created at plugin
//! startup to avoid per-particle mesh allocation.  Each particle receives its
//! own unique [`StandardMaterial`] so its alpha can be faded individually.

use bevy::prelude::*;
use rand::Rng;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Shared sphere mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Component ─────────────────────────────────────────────────────────────────

/// Short-lived visual particle entity.
#[derive(Component)]
pub struct Particle {
    /// World-space velocity (u/s).
    pub velocity: Vec3,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    /// Base colour (sRGB channels, 0–1).
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Handle to this particle's unique material so `particle_update_system`
    /// can fade the alpha.  `None` until `attach_particle_mesh_system` runs.
    pub material: Option<Handle<StandardMaterial>>,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh).add_systems(
            Update,
            (attach_particle_mesh_system, particle_update_system).chain(),
        );
    }
}

/// Create the shared sphere mesh and store it as a [`ParticleMesh`] resource.
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(Sphere::new(0.06));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh3d` + `MeshMaterial3d` to every newly-spawned [`Particle`].
///
/// Uses [`Added<Particle>`] so it only runs for particles that appeared since
/// the last frame — zero overhead for the steady-state particle population.
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &mut Particle), Added<Particle>>,
) {
    for (entity, mut particle) in query.iter_mut() {
        let color = Color::srgba(particle.r, particle.g, particle.b, 1.0);
        let mat_handle = materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::new(particle.r, particle.g, particle.b, 1.0) * 2.0,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        particle.material = Some(mat_handle.clone());
        commands.entity(entity).insert((
            Mesh3d(particle_mesh.0.clone()),
            MeshMaterial3d(mat_handle),
        ));
    }
}

/// Advance all particles: translate by velocity, fade alpha quadratically,
/// and despawn any whose age has exceeded their lifetime.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;

        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation += particle.velocity * dt;

        // Quadratic ease-out alpha: bright at birth, rapid fade at end.
        let t = particle.age / particle.lifetime;
        let alpha = (1.0 - t).powi(2);

        if let Some(ref handle) = particle.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.base_color = Color::srgba(particle.r, particle.g, particle.b, alpha);
            }
        }
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// One-shot impact burst at `pos` when an attack connects.
///
/// `impact_dir` biases the scatter away from the surface; sparks inherit a
/// small random cone around it.
pub fn spawn_impact_burst(commands: &mut Commands, pos: Vec3, impact_dir: Vec3, lifetime: f32) {
    let mut rng = rand::thread_rng();
    let base = -impact_dir.normalize_or_zero();

    for _ in 0..14 {
        let scatter = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let dir = (base * 1.5 + scatter).normalize_or_zero();
        let speed = rng.gen_range(3.0..8.0);
        commands.spawn((
            Particle {
                velocity: dir * speed,
                age: 0.0,
                lifetime: lifetime * rng.gen_range(0.6..=1.0),
                r: 1.0,
                g: 0.75,
                b: 0.25,
                material: None,
            },
            Transform::from_translation(pos),
            Visibility::default(),
        ));
    }
}

/// Single trail mote behind an in-flight projectile.
pub fn spawn_trail_particle(commands: &mut Commands, pos: Vec3, projectile_vel: Vec3) {
    let mut rng = rand::thread_rng();
    let drift = Vec3::new(
        rng.gen_range(-0.4..=0.4),
        rng.gen_range(-0.4..=0.4),
        rng.gen_range(-0.4..=0.4),
    );
    commands.spawn((
        Particle {
            // Trails drift gently opposite the flight direction.
            velocity: -projectile_vel.normalize_or_zero() * 0.8 + drift,
            age: 0.0,
            lifetime: rng.gen_range(0.15..=0.3),
            r: 0.5,
            g: 0.85,
            b: 1.0,
            material: None,
        },
        Transform::from_translation(pos),
        Visibility::default(),
    ));
}

/// Slow-rising charge motes around the growing charge shot.
pub fn spawn_charge_particle(commands: &mut Commands, pos: Vec3, scale: f32) {
    let mut rng = rand::thread_rng();
    let ring = Vec3::new(rng.gen_range(-1.0..=1.0), 0.0, rng.gen_range(-1.0..=1.0))
        .normalize_or_zero()
        * scale
        * 0.6;
    commands.spawn((
        Particle {
            velocity: Vec3::Y * rng.gen_range(0.5..1.5),
            age: 0.0,
            lifetime: 0.4,
            r: 0.7,
            g: 0.4,
            b: 1.0,
            material: None,
        },
        Transform::from_translation(pos + ring),
        Visibility::default(),
    ));
}
