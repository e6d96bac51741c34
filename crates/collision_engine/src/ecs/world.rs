//! ECS World implementation
//!
//! Entities live in a [`SlotMap`]; each component type gets its own
//! [`SecondaryMap`] keyed by entity, stored type-erased behind its `TypeId`.
//! Iteration follows slot order, which is what the collision pass uses as its
//! snapshot order.

use super::{Entity, Component};
use slotmap::{SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Errors from world mutation
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The entity was never spawned or has been despawned
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
}

/// Type-erased per-component storage
trait ComponentStore: Any {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStore for SecondaryMap<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
#[derive(Default)]
pub struct World {
    entities: SlotMap<Entity, ()>,
    component_storages: HashMap<TypeId, Box<dyn ComponentStore>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity
    pub fn spawn(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity and all of its components
    ///
    /// Returns `false` if the entity was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    /// Check whether an entity is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check whether the world has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add a component to an entity, returning the component it replaced
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, WorldError> {
        if !self.contains(entity) {
            return Err(WorldError::NoSuchEntity(entity));
        }
        let key = TypeId::of::<T>();
        if let Some(storage) = self
            .component_storages
            .get_mut(&key)
            .and_then(|storage| storage.as_any_mut().downcast_mut::<SecondaryMap<Entity, T>>())
        {
            return Ok(storage.insert(entity, component));
        }

        // First component of this type
        let mut storage = SecondaryMap::<Entity, T>::new();
        storage.insert(entity, component);
        self.component_storages.insert(key, Box::new(storage));
        Ok(None)
    }

    /// Remove a component from an entity
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SecondaryMap<Entity, T>>()?
            .remove(entity)
    }

    /// Get a component from an entity
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SecondaryMap<Entity, T>>()?
            .get_mut(entity)
    }

    /// Check whether an entity has a component
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains_key(entity))
    }

    /// All entities carrying component `T`, in slot order
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>()
            .map(|storage| storage.keys().collect())
            .unwrap_or_default()
    }

    /// Iterate `(entity, component)` pairs for component `T`, in slot order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    /// Iterate `(entity, component)` pairs mutably for component `T`
    pub fn query_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<SecondaryMap<Entity, T>>())
            .into_iter()
            .flat_map(|storage| storage.iter_mut())
    }

    fn storage<T: Component>(&self) -> Option<&SecondaryMap<Entity, T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<SecondaryMap<Entity, T>>()
    }
}
