//! Scripted foraging scene
//!
//! A player standing at the origin walks along +X past a food pickup while an
//! NPC patrols a triangle of waypoints that runs through the player's path.
//! Everything stands on a ground plane at y = 0.

use collision_engine::ecs::components::{
    BoxColliderComponent,
    MovementComponent,
    PickupComponent,
    PlaneColliderComponent,
    SphereColliderComponent,
    TransformComponent,
    WaypointComponent,
};
use collision_engine::ecs::systems::{movement_system, waypoint_system, CollisionReport, CollisionSystem};
use collision_engine::ecs::{Entity, World};
use collision_engine::events::{EventSystem, EventType};
use collision_engine::foundation::math::Vec3;
use collision_engine::physics::collision::bounding_sphere_from_points;
use collision_engine::physics::{Aabb, Plane};

use crate::calories::CalorieTracker;
use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::player::PlayerLogic;

/// Feet and head of a standing character, relative to its position
const CHARACTER_BOUNDS: [Vec3; 2] = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 2.2, 0.0)];

const NPC_START: Vec3 = Vec3::new(-10.0, 0.0, 0.0);
const NPC_SPEED: f32 = 2.0;

const FOOD_POSITION: Vec3 = Vec3::new(3.0, 0.0, 0.0);
const FOOD_OFFSET: Vec3 = Vec3::new(0.0, 0.5, 0.0);
const FOOD_RADIUS: f32 = 0.3;

/// The player stops walking once past this X coordinate
const WALK_TARGET_X: f32 = 6.0;

/// Distance covered per walk event
const WALK_EVENT_DISTANCE: f32 = 1.0;

/// The player jumps every this many frames
const JUMP_INTERVAL: u32 = 60;

fn npc_waypoints() -> Vec<Vec3> {
    vec![
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, -10.0),
        Vec3::new(0.0, 0.0, 0.0),
    ]
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u32,
    /// Pickups the player collected
    pub pickups: usize,
    /// Jump events sent
    pub jumps: usize,
    /// Walk events sent
    pub walks: usize,
    /// Positional corrections applied by the collision pass
    pub corrections: usize,
    /// Calorie total at the end of the run
    pub calories: f32,
}

/// World plus the systems that drive it
pub struct Scene {
    world: World,
    collisions: CollisionSystem,
    events: EventSystem,
    calories: CalorieTracker,
    config: DemoConfig,
    player: Entity,
    npc: Entity,
    food: Entity,
    frame: u32,
    walked: f32,
    summary: RunSummary,
}

impl Scene {
    /// Spawn the player, NPC, ground and food
    pub fn new(config: DemoConfig) -> Result<Self, DemoError> {
        config.validate()?;

        let mut world = World::new();
        let player = spawn_character(&mut world, Vec3::zeros())?;
        world.insert(player, MovementComponent::new())?;

        let npc = spawn_character(&mut world, NPC_START)?;
        world.insert(npc, MovementComponent::new())?;
        world.insert(npc, WaypointComponent::new(npc_waypoints(), NPC_SPEED))?;

        let ground = world.spawn();
        world.insert(ground, TransformComponent::identity())?;
        world.insert(ground, PlaneColliderComponent::new(Plane::new(Vec3::zeros(), Vec3::y())?))?;

        let food = world.spawn();
        world.insert(food, TransformComponent::from_position(FOOD_POSITION))?;
        world.insert(food, PickupComponent::new())?;
        world.insert(food, SphereColliderComponent::new(FOOD_OFFSET, FOOD_RADIUS)?.as_trigger())?;
        world.insert(food, BoxColliderComponent::new(Aabb::cube(FOOD_OFFSET, FOOD_RADIUS))?)?;

        let calories = CalorieTracker::new();
        let mut events = EventSystem::new();
        for event_type in [EventType::PickupCollected, EventType::PlayerJumped, EventType::PlayerWalked] {
            events.register_handler(event_type, Box::new(calories.clone()));
        }

        log::info!(
            "Scene ready: player {:?}, npc {:?}, ground {:?}, food {:?}",
            player,
            npc,
            ground,
            food
        );

        Ok(Self {
            world,
            collisions: CollisionSystem::new(config.collision.clone()),
            events,
            calories,
            config,
            player,
            npc,
            food,
            frame: 0,
            walked: 0.0,
            summary: RunSummary::default(),
        })
    }

    /// Advance one fixed time step
    pub fn step(&mut self) -> CollisionReport {
        let dt = self.config.time_step;
        let walking = self.drive_player();

        waypoint_system(&mut self.world);
        movement_system(&mut self.world, dt);

        let jump = self.frame > 0 && self.frame % JUMP_INTERVAL == 0;
        let mut walk_events = 0;
        if walking {
            self.walked += self.config.player_speed * dt;
            while self.walked >= WALK_EVENT_DISTANCE {
                self.walked -= WALK_EVENT_DISTANCE;
                walk_events += 1;
            }
        }

        let mut player = PlayerLogic::new(self.player, &mut self.events, self.config.food_calories);
        if jump {
            player.jump();
        }
        for _ in 0..walk_events {
            player.walk(WALK_EVENT_DISTANCE);
        }
        let report = self.collisions.update(&mut self.world, &mut player);
        let collected = player.collected();

        self.events.update_time(f64::from(self.frame) * f64::from(dt));
        self.events.dispatch();

        self.summary.frames += 1;
        self.summary.pickups += collected;
        self.summary.jumps += usize::from(jump);
        self.summary.walks += walk_events;
        self.summary.corrections += report.corrections;
        self.summary.calories = self.calories.total();
        self.frame += 1;

        report
    }

    /// Scripted input: walk along +X until past the target, then stand still
    fn drive_player(&mut self) -> bool {
        let x = self.position(self.player).x;
        let walking = x < WALK_TARGET_X;
        let velocity = if walking {
            Vec3::new(self.config.player_speed, 0.0, 0.0)
        } else {
            Vec3::zeros()
        };
        if let Some(movement) = self.world.get_mut::<MovementComponent>(self.player) {
            movement.set_velocity(velocity);
        }
        walking && self.config.player_speed > 0.0
    }

    /// Run the configured number of frames
    pub fn run(&mut self) -> RunSummary {
        for _ in 0..self.config.frames {
            self.step();
        }
        self.summary
    }

    /// Totals so far
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// The world being simulated
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Collision system, for reading the candidate counts
    pub fn collisions(&self) -> &CollisionSystem {
        &self.collisions
    }

    /// Current position of `entity`, origin if it has no transform
    pub fn position(&self, entity: Entity) -> Vec3 {
        self.world
            .get::<TransformComponent>(entity)
            .map_or_else(Vec3::zeros, |transform| transform.position)
    }

    /// The player entity
    pub fn player(&self) -> Entity {
        self.player
    }

    /// The NPC entity
    pub fn npc(&self) -> Entity {
        self.npc
    }

    /// The food entity
    pub fn food(&self) -> Entity {
        self.food
    }
}

/// Character with a capsule-derived sphere and its conservative cube
fn spawn_character(world: &mut World, position: Vec3) -> Result<Entity, DemoError> {
    let entity = world.spawn();
    let local = bounding_sphere_from_points(&CHARACTER_BOUNDS, entity)?;
    world.insert(entity, TransformComponent::from_position(position))?;
    world.insert(entity, SphereColliderComponent::from_local_sphere(&local)?)?;
    world.insert(entity, BoxColliderComponent::from_sphere(&local)?)?;
    Ok(entity)
}
