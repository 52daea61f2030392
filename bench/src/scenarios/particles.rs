//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Simple components: Position, Velocity, Lifetime, Color, Size
//! - Systems: movement, lifetime decay, fade, despawn-and-respawn dead particles
//!
//! This scenario tests:
//! - High entity count iteration performance
//! - Simple component access patterns
//! - Entity create/destroy throughput (particles dying and respawning)

use ecs_core::Entity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ecs_core::Registry;

use crate::components::{Color, Lifetime, Particle, Position, Size, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn spawn(&mut self, registry: &mut Registry) -> Entity {
        let rng = &mut self.0;
        let entity = registry.create();
        registry.emplace(entity, Particle);
        registry.emplace(
            entity,
            Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            },
        );
        registry.emplace(
            entity,
            Velocity {
                x: rng.gen_range(-10.0..10.0),
                y: rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-10.0..10.0),
            },
        );
        registry.emplace(
            entity,
            Lifetime {
                remaining: rng.gen_range(1.0..5.0),
                total: 5.0,
            },
        );
        registry.emplace(
            entity,
            Color {
                r: rng.gen_range(0.0..1.0),
                g: rng.gen_range(0.0..1.0),
                b: rng.gen_range(0.0..1.0),
                a: 1.0,
            },
        );
        registry.emplace(
            entity,
            Size {
                width: rng.gen_range(0.1..2.0),
                height: rng.gen_range(0.1..2.0),
            },
        );
        entity
    }
}

/// System: advance position by velocity.
fn system_movement(registry: &mut Registry, dt: f32) {
    let particles: Vec<Entity> = registry
        .view2::<Position, Velocity>()
        .map(|(e, ..)| e)
        .collect();
    for entity in particles {
        let vel = *registry.get::<Velocity>(entity).unwrap();
        let pos = registry.get_mut::<Position>(entity).unwrap();
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}

/// System: decay remaining lifetime.
fn system_lifetime_decay(registry: &mut Registry, dt: f32) {
    let particles: Vec<Entity> = registry.view2::<Particle, Lifetime>().map(|(e, ..)| e).collect();
    for entity in particles {
        registry.patch::<Lifetime>(entity, |lifetime| lifetime.remaining -= dt);
    }
}

/// System: fade alpha as lifetime runs out.
fn system_fade(registry: &mut Registry) {
    let particles: Vec<Entity> = registry.view2::<Lifetime, Color>().map(|(e, ..)| e).collect();
    for entity in particles {
        let fraction = {
            let lifetime = registry.get::<Lifetime>(entity).unwrap();
            (lifetime.remaining / lifetime.total).max(0.0)
        };
        registry.patch::<Color>(entity, |color| color.a = fraction);
    }
}

/// System: destroy particles whose lifetime expired and spawn replacements.
fn system_recycle_dead(registry: &mut Registry, factory: &mut ParticleFactory) {
    let dead: Vec<Entity> = registry
        .view2::<Particle, Lifetime>()
        .filter(|(_, _, lifetime)| lifetime.remaining <= 0.0)
        .map(|(e, ..)| e)
        .collect();

    for entity in dead {
        registry.destroy(entity);
        factory.spawn(registry);
    }
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    registry: Registry,
    factory: ParticleFactory,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            factory: ParticleFactory(ChaCha8Rng::seed_from_u64(config.seed)),
            registry: Registry::new(),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High-volume particle system with movement, lifetime, and respawn"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        for _ in 0..self.config.particle_count {
            self.factory.spawn(&mut self.registry);
        }
    }

    fn update(&mut self) {
        system_movement(&mut self.registry, self.config.delta_time);
        system_fade(&mut self.registry);
        system_lifetime_decay(&mut self.registry, self.config.delta_time);
        system_recycle_dead(&mut self.registry, &mut self.factory);
    }

    fn teardown(&mut self) {
        let entities: Vec<Entity> = self.registry.entities().collect();
        for entity in entities {
            self.registry.destroy(entity);
        }
    }
}
