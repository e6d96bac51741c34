//! Player gameplay logic
//!
//! Turns player actions and pickups into events. A `PlayerLogic` only lives
//! for one frame: it borrows the event system while the collision pass runs
//! and is dropped before events are dispatched.

use collision_engine::ecs::Entity;
use collision_engine::ecs::systems::PickupListener;
use collision_engine::events::{Event, EventArg, EventSystem, EventType};

/// Per-frame player event source
pub struct PlayerLogic<'a> {
    entity: Entity,
    events: &'a mut EventSystem,
    food_calories: f32,
    collected: usize,
}

impl<'a> PlayerLogic<'a> {
    /// Create the logic for `entity`, publishing into `events`
    pub fn new(entity: Entity, events: &'a mut EventSystem, food_calories: f32) -> Self {
        Self {
            entity,
            events,
            food_calories,
            collected: 0,
        }
    }

    fn event(&self, event_type: EventType) -> Event {
        Event::new(event_type, self.events.current_time())
            .with_arg("player", EventArg::Entity(self.entity))
    }

    /// Player jumped
    pub fn jump(&mut self) {
        let event = self.event(EventType::PlayerJumped);
        self.events.send(event);
    }

    /// Player covered `distance` on foot
    pub fn walk(&mut self, distance: f32) {
        let event = self.event(EventType::PlayerWalked).with_arg("distance", EventArg::Distance(distance));
        self.events.send(event);
    }

    /// Pickups collected while this logic was active
    pub fn collected(&self) -> usize {
        self.collected
    }
}

impl PickupListener for PlayerLogic<'_> {
    fn player(&self) -> Entity {
        self.entity
    }

    fn on_pickup_collected(&mut self, pickup: Entity) {
        self.collected += 1;
        let event = self
            .event(EventType::PickupCollected)
            .with_arg("pickup", EventArg::Entity(pickup))
            .with_arg("calories", EventArg::Calories(self.food_calories));
        self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collision_engine::ecs::World;

    #[test]
    fn test_actions_queue_events() {
        let mut world = World::new();
        let player = world.spawn();
        let mut events = EventSystem::new();

        let mut logic = PlayerLogic::new(player, &mut events, 50.0);
        logic.jump();
        logic.walk(1.0);
        assert_eq!(logic.player(), player);

        assert_eq!(events.pending(), 2);
    }

    #[test]
    fn test_pickup_event_carries_calories() {
        let mut world = World::new();
        let player = world.spawn();
        let food = world.spawn();
        let mut events = EventSystem::new();

        let mut logic = PlayerLogic::new(player, &mut events, 35.0);
        logic.on_pickup_collected(food);
        assert_eq!(logic.collected(), 1);
        assert_eq!(events.pending(), 1);
    }
}
