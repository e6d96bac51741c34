//! Calorie bookkeeping driven by player events

use std::cell::Cell;
use std::rc::Rc;

use collision_engine::events::{Event, EventHandler, EventType};

/// Energy spent on one jump (kcal)
pub const JUMP_CALORIES: f32 = 0.2;

/// Energy spent per walk event (kcal)
pub const WALK_CALORIES: f32 = 0.05;

/// Running calorie total
///
/// Jumping and walking add the energy spent on them; food adds the calories
/// carried by the pickup event. The total lives behind a shared cell so it
/// can still be read after the tracker is boxed into the event system.
/// Clones share the same total.
#[derive(Debug, Default, Clone)]
pub struct CalorieTracker {
    total: Rc<Cell<f32>>,
}

impl CalorieTracker {
    /// Create a tracker starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current total in kcal
    pub fn total(&self) -> f32 {
        self.total.get()
    }

    /// Add `kcal` to the total
    pub fn add_calories(&self, kcal: f32) {
        self.total.set(self.total.get() + kcal);
        log::info!("{:+.2} kcal (total {:.2} kcal)", kcal, self.total.get());
    }
}

impl EventHandler for CalorieTracker {
    fn on_event(&mut self, event: &Event) -> bool {
        match event.event_type {
            EventType::PlayerJumped => self.add_calories(JUMP_CALORIES),
            EventType::PlayerWalked => self.add_calories(WALK_CALORIES),
            EventType::PickupCollected => self.add_calories(event.get_calories().unwrap_or(0.0)),
        }
        // Other listeners may want the same event
        false
    }
}
