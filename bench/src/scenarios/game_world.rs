//! Game world benchmark scenario.
//!
//! Simulates a mixed game world with:
//! - ~10,000 entities across multiple component combinations
//! - NPCs with AI, health, team affiliation
//! - Players with health and team
//! - Projectiles with short lifetimes
//! - Static objects (position only)
//!
//! This scenario tests:
//! - Multiple component-combination iteration via [`ecs_core::View2`]/[`ecs_core::View3`]
//! - Complex component combinations
//! - Varied per-frame workloads, including entity destruction

use ecs_core::{Entity, Registry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{AiState, Health, Lifetime, Position, Team, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the game world benchmark.
#[derive(Clone)]
pub struct GameWorldConfig {
    /// Number of NPC entities.
    pub npc_count: usize,
    /// Number of player entities.
    pub player_count: usize,
    /// Number of projectile entities.
    pub projectile_count: usize,
    /// Number of static objects.
    pub static_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for GameWorldConfig {
    fn default() -> Self {
        Self {
            npc_count: 5_000,
            player_count: 100,
            projectile_count: 2_000,
            static_count: 3_000,
            delta_time: 1.0 / 60.0,
            seed: 54321,
        }
    }
}

/// System: decide NPC movement direction from AI state, then steer velocity.
fn system_ai(registry: &mut Registry, dt: f32) {
    let npcs: Vec<Entity> = registry.view3::<Position, AiState, Velocity>().map(|(e, ..)| e).collect();
    for entity in npcs {
        let pos = *registry.get::<Position>(entity).unwrap();
        let (target_x, target_y) = {
            let ai = registry.get_mut::<AiState>(entity).unwrap();
            ai.timer -= dt;
            if ai.timer <= 0.0 {
                ai.state = (ai.state + 1) % 4;
                ai.timer = 2.0;
            }
            (ai.target_x, ai.target_y)
        };

        let dx = target_x - pos.x;
        let dy = target_y - pos.y;
        let dist = (dx * dx + dy * dy).sqrt().max(0.001);
        let speed = 10.0;
        let vel = registry.get_mut::<Velocity>(entity).unwrap();
        vel.x = dx / dist * speed;
        vel.y = dy / dist * speed;
    }
}

/// System: apply velocity to position.
fn system_movement(registry: &mut Registry, dt: f32) {
    let moving: Vec<Entity> = registry.view2::<Position, Velocity>().map(|(e, ..)| e).collect();
    for entity in moving {
        let vel = *registry.get::<Velocity>(entity).unwrap();
        let pos = registry.get_mut::<Position>(entity).unwrap();
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}

/// System: decay projectile lifetimes and destroy the ones that expired.
fn system_projectile_lifetime(registry: &mut Registry, dt: f32) {
    let projectiles: Vec<Entity> = registry.view2::<Lifetime, Team>().map(|(e, ..)| e).collect();
    let mut dead = Vec::new();
    for entity in projectiles {
        registry.patch::<Lifetime>(entity, |lifetime| lifetime.remaining -= dt);
        if registry.get::<Lifetime>(entity).unwrap().remaining <= 0.0 {
            dead.push(entity);
        }
    }
    for entity in dead {
        registry.destroy(entity);
    }
}

/// Game world benchmark scenario.
pub struct GameWorldScenario {
    config: GameWorldConfig,
    registry: Registry,
    rng: ChaCha8Rng,
}

impl GameWorldScenario {
    /// Create a new game world scenario with default config.
    pub fn new() -> Self {
        Self::with_config(GameWorldConfig::default())
    }

    /// Create a new game world scenario with custom config.
    pub fn with_config(config: GameWorldConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: Registry::new(),
            config,
        }
    }

    fn random_position(&mut self) -> Position {
        Position {
            x: self.rng.gen_range(-500.0..500.0),
            y: self.rng.gen_range(-500.0..500.0),
            z: 0.0,
        }
    }

    fn spawn_npc(&mut self) -> Entity {
        let pos = self.random_position();
        let ai = AiState {
            state: 0,
            timer: self.rng.gen_range(0.0..5.0),
            target_x: self.rng.gen_range(-500.0..500.0),
            target_y: self.rng.gen_range(-500.0..500.0),
        };
        let team = Team {
            id: self.rng.gen_range(0..4),
        };

        let entity = self.registry.create();
        self.registry.emplace(entity, pos);
        self.registry.emplace(entity, Velocity::default());
        self.registry.emplace(
            entity,
            Health {
                current: 100.0,
                max: 100.0,
            },
        );
        self.registry.emplace(entity, ai);
        self.registry.emplace(entity, team);
        entity
    }

    fn spawn_player(&mut self) -> Entity {
        let pos = self.random_position();
        let entity = self.registry.create();
        self.registry.emplace(entity, pos);
        self.registry.emplace(entity, Velocity::default());
        self.registry.emplace(
            entity,
            Health {
                current: 100.0,
                max: 100.0,
            },
        );
        self.registry.emplace(entity, Team { id: 0 }); // players are team 0
        entity
    }

    fn spawn_projectile(&mut self) -> Entity {
        let pos = self.random_position();
        let vel = Velocity {
            x: self.rng.gen_range(-50.0..50.0),
            y: self.rng.gen_range(-50.0..50.0),
            z: 0.0,
        };
        let lifetime = Lifetime {
            remaining: self.rng.gen_range(0.5..2.0),
            total: 2.0,
        };
        let team = Team {
            id: self.rng.gen_range(0..4),
        };

        let entity = self.registry.create();
        self.registry.emplace(entity, pos);
        self.registry.emplace(entity, vel);
        self.registry.emplace(entity, lifetime);
        self.registry.emplace(entity, team);
        entity
    }

    fn spawn_static(&mut self) -> Entity {
        let pos = self.random_position();
        let entity = self.registry.create();
        self.registry.emplace(entity, pos);
        entity
    }

    /// Total entity count.
    pub fn total_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for GameWorldScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for GameWorldScenario {
    fn name(&self) -> &'static str {
        "game_world"
    }

    fn description(&self) -> &'static str {
        "Mixed game world with NPCs, players, projectiles, and static objects"
    }

    fn entity_count(&self) -> usize {
        self.config.npc_count
            + self.config.player_count
            + self.config.projectile_count
            + self.config.static_count
    }

    fn setup(&mut self) {
        for _ in 0..self.config.npc_count {
            self.spawn_npc();
        }
        for _ in 0..self.config.player_count {
            self.spawn_player();
        }
        for _ in 0..self.config.projectile_count {
            self.spawn_projectile();
        }
        for _ in 0..self.config.static_count {
            self.spawn_static();
        }
    }

    fn update(&mut self) {
        system_ai(&mut self.registry, self.config.delta_time);
        system_movement(&mut self.registry, self.config.delta_time);
        system_projectile_lifetime(&mut self.registry, self.config.delta_time);
    }

    fn teardown(&mut self) {
        let entities: Vec<Entity> = self.registry.entities().collect();
        for entity in entities {
            self.registry.destroy(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_world_scenario_setup() {
        let mut scenario = GameWorldScenario::with_config(GameWorldConfig {
            npc_count: 50,
            player_count: 5,
            projectile_count: 20,
            static_count: 25,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.total_count(), 100);

        scenario.teardown();
        assert_eq!(scenario.total_count(), 0);
    }

    #[test]
    fn game_world_scenario_update_destroys_expired_projectiles() {
        let mut scenario = GameWorldScenario::with_config(GameWorldConfig {
            npc_count: 0,
            player_count: 0,
            projectile_count: 10,
            static_count: 0,
            delta_time: 5.0,
            ..Default::default()
        });

        scenario.setup();
        scenario.update();

        // Every projectile's lifetime (0.5..2.0) is exceeded by a 5.0 dt step.
        assert_eq!(scenario.total_count(), 0);
    }
}
