//! # Object Registry
//!
//! The ordered collection of everything hit-testable in the world: player
//! placed blocks and protected fixtures. Insertion order is also the render
//! iteration order, so a later placement at the same cell visually occludes
//! an earlier one. Hit distance ties are broken by the ray caster, not by
//! this ordering.

use cgmath::Point3;

use super::object::{ObjectId, ObjectKind, SceneObject};

/// Ordered registry of scene objects.
///
/// Invariant: every hit-testable entity appears here exactly once. Duplicates
/// at the same cell are permitted; ids are never reused within one registry.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl ObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new object and returns its id.
    ///
    /// # Arguments
    /// * `kind` - What the object is
    /// * `position` - Center position in world space
    pub fn add(&mut self, kind: ObjectKind, position: Point3<f32>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject::new(id, kind, position));
        id
    }

    /// Removes the object with the given id.
    ///
    /// Removing an absent id is a no-op and returns `None`; the registry is
    /// left unchanged.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Looks up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Looks up an object by id for mutation (fall animation updates).
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    /// Iterates over all objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Number of objects currently registered.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes every object, fixtures included.
    ///
    /// World re-initialization is responsible for recreating fixtures after a
    /// clear; ids keep counting up so stale animations can detect that their
    /// object is gone.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::world::object::{GeometryKind, SurfaceKind};

    fn block() -> ObjectKind {
        ObjectKind::Block {
            geometry: GeometryKind::Cube,
            surface: SurfaceKind::Brick,
        }
    }

    #[test]
    fn add_then_remove_leaves_no_trace() {
        let mut registry = ObjectRegistry::new();
        let id = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        assert!(registry.get(id).is_some());
        assert!(registry.remove(id).is_some());
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn removing_an_absent_id_is_a_noop() {
        let mut registry = ObjectRegistry::new();
        let kept = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        let removed = registry.add(block(), Point3::new(6.0, 2.0, 2.0));
        registry.remove(removed);
        assert!(registry.remove(removed).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(kept).is_some());
    }

    #[test]
    fn duplicate_cells_are_permitted() {
        let mut registry = ObjectRegistry::new();
        let first = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        let second = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut registry = ObjectRegistry::new();
        let a = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        let b = registry.add(block(), Point3::new(6.0, 2.0, 2.0));
        let ids: Vec<_> = registry.iter().map(|object| object.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut registry = ObjectRegistry::new();
        let before = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        registry.clear();
        let after = registry.add(block(), Point3::new(2.0, 2.0, 2.0));
        assert_ne!(before, after);
    }
}
