//! Gameplay event queue
//!
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Handlers register per event type and only see that type
//! - Immediate and deferred (time-stamped) delivery
//!
//! The collision pass itself never touches this module; game logic listening
//! for pickups turns them into events here.

use std::collections::HashMap;

use crate::ecs::Entity;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The player collected a pickup
    PickupCollected,
    /// The player jumped
    PlayerJumped,
    /// The player moved on foot
    PlayerWalked,
}

/// Type-safe event argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventArg {
    /// An entity involved in the event
    Entity(Entity),
    /// Energy in kcal
    Calories(f32),
    /// Distance in world units
    Distance(f32),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Timestamp when event was created (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Entity stored under `key`, if any
    pub fn get_entity(&self, key: &str) -> Option<Entity> {
        match self.get_arg(key) {
            Some(EventArg::Entity(entity)) => Some(*entity),
            _ => None,
        }
    }

    /// `calories` argument if present
    pub fn get_calories(&self) -> Option<f32> {
        match self.get_arg("calories") {
            Some(EventArg::Calories(kcal)) => Some(*kcal),
            _ => None,
        }
    }

    /// `distance` argument if present
    pub fn get_distance(&self) -> Option<f32> {
        match self.get_arg("distance") {
            Some(EventArg::Distance(distance)) => Some(*distance),
            _ => None,
        }
    }
}

/// Event handler trait
pub trait EventHandler {
    /// Handle an event; return true to consume it and stop forwarding
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Event system with registration and queuing
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(f64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_time: f64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_time: 0.0,
        }
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current time as last set by [`update_time`](Self::update_time)
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for the next [`dispatch`](Self::dispatch)
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Queue an event for the first dispatch at or after `delivery_time`
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Number of events not yet delivered
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Deliver immediate events, then deferred events that are due
    ///
    /// Returns the number of events delivered.
    pub fn dispatch(&mut self) -> usize {
        let immediate = std::mem::take(&mut self.immediate_queue);

        let now = self.current_time;
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred_queue)
            .into_iter()
            .partition(|(delivery_time, _)| *delivery_time <= now);
        self.deferred_queue = later;

        let delivered = immediate.len() + due.len();
        for event in immediate.iter().chain(due.iter().map(|(_, event)| event)) {
            self.dispatch_event(event);
        }
        delivered
    }

    /// Hand `event` to its handlers in registration order until one consumes it
    fn dispatch_event(&mut self, event: &Event) {
        let handlers = match self.handlers.get_mut(&event.event_type) {
            Some(handlers) => handlers,
            None => {
                log::trace!("No handler for {:?}", event.event_type);
                return;
            }
        };

        for handler in handlers.iter_mut() {
            if handler.on_event(event) {
                break;
            }
        }
    }

    /// Drop all queued events
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(&'static str, EventType)>>>;

    struct TestHandler {
        name: &'static str,
        log: Log,
        consume: bool,
    }

    impl EventHandler for TestHandler {
        fn on_event(&mut self, event: &Event) -> bool {
            self.log.borrow_mut().push((self.name, event.event_type));
            self.consume
        }
    }

    fn handler(name: &'static str, log: &Log, consume: bool) -> Box<dyn EventHandler> {
        Box::new(TestHandler {
            name,
            log: Rc::clone(log),
            consume,
        })
    }

    #[test]
    fn test_immediate_dispatch() {
        let log = Log::default();
        let mut system = EventSystem::new();
        system.register_handler(EventType::PlayerJumped, handler("jump", &log, false));

        system.send(Event::new(EventType::PlayerJumped, 0.0));
        assert_eq!(system.dispatch(), 1);
        assert_eq!(*log.borrow(), vec![("jump", EventType::PlayerJumped)]);
        assert_eq!(system.pending(), 0);
    }

    #[test]
    fn test_handlers_only_see_their_type() {
        let log = Log::default();
        let mut system = EventSystem::new();
        system.register_handler(EventType::PlayerWalked, handler("walk", &log, false));

        system.send(Event::new(EventType::PlayerJumped, 0.0));
        system.send(Event::new(EventType::PlayerWalked, 0.0));
        system.dispatch();

        assert_eq!(*log.borrow(), vec![("walk", EventType::PlayerWalked)]);
    }

    #[test]
    fn test_deferred_dispatch() {
        let log = Log::default();
        let mut system = EventSystem::new();
        system.register_handler(EventType::PickupCollected, handler("pickup", &log, false));

        system.post(1.0, Event::new(EventType::PickupCollected, 0.0));

        system.update_time(0.5);
        assert_eq!(system.dispatch(), 0);
        assert_eq!(system.pending(), 1);

        system.update_time(1.0);
        assert_eq!(system.dispatch(), 1);
        assert_eq!(system.pending(), 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_event_consumption() {
        let log = Log::default();
        let mut system = EventSystem::new();
        system.register_handler(EventType::PickupCollected, handler("first", &log, true));
        system.register_handler(EventType::PickupCollected, handler("second", &log, false));

        system.send(Event::new(EventType::PickupCollected, 0.0));
        system.dispatch();

        assert_eq!(*log.borrow(), vec![("first", EventType::PickupCollected)]);
    }

    #[test]
    fn test_typed_arguments() {
        let mut world = crate::ecs::World::new();
        let food = world.spawn();
        let event = Event::new(EventType::PickupCollected, 2.5)
            .with_arg("pickup", EventArg::Entity(food))
            .with_arg("calories", EventArg::Calories(120.0));

        assert_eq!(event.get_entity("pickup"), Some(food));
        assert_eq!(event.get_calories(), Some(120.0));
        assert_eq!(event.get_distance(), None);
        assert_eq!(event.get_entity("calories"), None);
    }

    #[test]
    fn test_clear_drops_queued_events() {
        let mut system = EventSystem::new();
        system.send(Event::new(EventType::PlayerWalked, 0.0));
        system.post(5.0, Event::new(EventType::PlayerJumped, 0.0));
        system.clear();
        assert_eq!(system.pending(), 0);
        assert_eq!(system.dispatch(), 0);
    }
}
