//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// A generational key: a despawned entity's slot can be reused, but the
    /// stale identifier will never resolve to the new occupant.
    pub struct Entity;
}

impl Entity {
    /// The null entity, never returned by [`World::spawn`](super::World::spawn)
    pub fn null() -> Self {
        <Self as slotmap::Key>::null()
    }

    /// Check whether this is the null entity
    pub fn is_null(self) -> bool {
        slotmap::Key::is_null(&self)
    }
}
