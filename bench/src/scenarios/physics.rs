//! Physics simulation benchmark scenario.
//!
//! Simulates a physics-heavy workload with:
//! - ~50,000 rigid bodies
//! - Position, Velocity, Acceleration integration
//!
//! This scenario tests:
//! - Compute-heavy component updates
//! - Large entity iteration
//! - Multi-component access patterns

use ecs_core::{Entity, Registry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{Acceleration, Position, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the physics benchmark.
pub struct PhysicsConfig {
    /// Number of physics bodies.
    pub body_count: usize,
    /// Fixed timestep for physics integration.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            body_count: 50_000,
            delta_time: 1.0 / 120.0, // 120 Hz physics
            seed: 99999,
        }
    }
}

/// System: integrate acceleration into velocity, then velocity into position.
fn system_integrate(registry: &mut Registry, dt: f32) {
    let moving: Vec<Entity> = registry
        .view2::<Acceleration, Velocity>()
        .map(|(e, ..)| e)
        .collect();
    for entity in moving {
        let accel = *registry.get::<Acceleration>(entity).unwrap();
        let vel = registry.get_mut::<Velocity>(entity).unwrap();
        vel.x += accel.x * dt;
        vel.y += accel.y * dt;
        vel.z += accel.z * dt;
    }

    let movable: Vec<Entity> = registry
        .view2::<Velocity, Position>()
        .map(|(e, ..)| e)
        .collect();
    for entity in movable {
        let vel = *registry.get::<Velocity>(entity).unwrap();
        let pos = registry.get_mut::<Position>(entity).unwrap();
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}

/// System: bounce bodies off a cubic boundary, losing some energy.
fn system_enforce_boundaries(registry: &mut Registry) {
    const BOUNDS: f32 = 1000.0;
    let bodies: Vec<Entity> = registry
        .view2::<Position, Velocity>()
        .map(|(e, ..)| e)
        .collect();
    for entity in bodies {
        let pos = *registry.get::<Position>(entity).unwrap();
        let vel = registry.get_mut::<Velocity>(entity).unwrap();
        if pos.x.abs() > BOUNDS {
            vel.x = -vel.x * 0.8;
        }
        if pos.y.abs() > BOUNDS {
            vel.y = -vel.y * 0.8;
        }
        if pos.z.abs() > BOUNDS {
            vel.z = -vel.z * 0.8;
        }
        let pos = registry.get_mut::<Position>(entity).unwrap();
        pos.x = pos.x.clamp(-BOUNDS, BOUNDS);
        pos.y = pos.y.clamp(-BOUNDS, BOUNDS);
        pos.z = pos.z.clamp(-BOUNDS, BOUNDS);
    }
}

/// Physics simulation benchmark scenario.
pub struct PhysicsScenario {
    config: PhysicsConfig,
    registry: Registry,
    rng: ChaCha8Rng,
    bodies: Vec<Entity>,
}

impl PhysicsScenario {
    /// Create a new physics scenario with default config.
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics scenario with custom config.
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: Registry::new(),
            bodies: Vec::new(),
            config,
        }
    }

    fn spawn_body(&mut self) -> Entity {
        let entity = self.registry.create();
        self.registry.emplace(
            entity,
            Position {
                x: self.rng.gen_range(-1000.0..1000.0),
                y: self.rng.gen_range(-1000.0..1000.0),
                z: self.rng.gen_range(-1000.0..1000.0),
            },
        );
        self.registry.emplace(
            entity,
            Velocity {
                x: self.rng.gen_range(-10.0..10.0),
                y: self.rng.gen_range(-10.0..10.0),
                z: self.rng.gen_range(-10.0..10.0),
            },
        );
        self.registry.emplace(
            entity,
            Acceleration {
                x: 0.0,
                y: -9.81, // Gravity
                z: 0.0,
            },
        );
        entity
    }

    /// Current body count.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for PhysicsScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for PhysicsScenario {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn description(&self) -> &'static str {
        "Physics simulation with acceleration/velocity integration"
    }

    fn entity_count(&self) -> usize {
        self.config.body_count
    }

    fn setup(&mut self) {
        self.bodies = Vec::with_capacity(self.config.body_count);
        for _ in 0..self.config.body_count {
            let entity = self.spawn_body();
            self.bodies.push(entity);
        }
    }

    fn update(&mut self) {
        system_integrate(&mut self.registry, self.config.delta_time);
        system_enforce_boundaries(&mut self.registry);
    }

    fn teardown(&mut self) {
        for entity in self.bodies.drain(..) {
            self.registry.destroy(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physics_scenario_setup() {
        let mut scenario = PhysicsScenario::with_config(PhysicsConfig {
            body_count: 100,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.body_count(), 100);

        scenario.teardown();
        assert_eq!(scenario.body_count(), 0);
    }

    #[test]
    fn physics_scenario_update() {
        let mut scenario = PhysicsScenario::with_config(PhysicsConfig {
            body_count: 100,
            ..Default::default()
        });

        scenario.setup();

        for _ in 0..60 {
            scenario.update();
        }

        assert_eq!(scenario.body_count(), 100);
        scenario.teardown();
    }
}
