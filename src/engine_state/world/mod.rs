//! # World State
//!
//! The world owns everything that exists in the scene: the object registry
//! (hit-testable blocks and fixtures) and the decorative scenery. World
//! initialization creates the protected fixtures; a reset clears the registry
//! and recreates them.

use cgmath::{Point3, Vector3};

pub mod object;
pub mod registry;
pub mod scenery;

use object::ObjectKind;
use registry::ObjectRegistry;
use scenery::Scenery;

/// Half extent of the ground collision plane on the X and Z axes.
const GROUND_PLANE_HALF_EXTENT: f32 = 64.0;

/// Vertical center of the decorative border slabs.
const BORDER_HEIGHT: f32 = -3.0;

/// Half extents of a border slab along its long axis, height, and width.
const BORDER_LONG: f32 = 64.0;
/// Half height of a border slab.
const BORDER_HALF_HEIGHT: f32 = 3.5;
/// Half width of a border slab.
const BORDER_SHORT: f32 = 26.0;

/// Distance of each border slab's center from the world origin.
const BORDER_DISTANCE: f32 = 90.0;

/// Everything in the scene.
#[derive(Debug)]
pub struct World {
    /// Hit-testable objects: placed blocks and protected fixtures
    pub registry: ObjectRegistry,
    /// Decorative entities, never hit-tested
    pub scenery: Scenery,
}

impl World {
    /// Creates a world with its fixtures and scenery in place.
    pub fn new() -> Self {
        let mut world = Self {
            registry: ObjectRegistry::new(),
            scenery: Scenery::new(),
        };
        world.spawn_fixtures();
        world
    }

    /// Clears every placed block and rebuilds the fixtures and scenery.
    ///
    /// A fall animation running across a reset finds its object gone on the
    /// next advance and drops itself; ids are never reused, so a recreated
    /// fixture can never be mistaken for the animated block.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.spawn_fixtures();
        self.scenery = Scenery::new();
    }

    /// Creates the protected fixtures: the invisible ground collision plane
    /// and the four border slabs framing the build area.
    fn spawn_fixtures(&mut self) {
        self.registry.add(
            ObjectKind::GroundPlane {
                half_extent: GROUND_PLANE_HALF_EXTENT,
            },
            Point3::new(0.0, 0.0, 0.0),
        );

        // Slabs on +X/-X run long along Z; the others run long along X.
        let across = Vector3::new(BORDER_SHORT, BORDER_HALF_HEIGHT, BORDER_LONG);
        let along = Vector3::new(BORDER_LONG, BORDER_HALF_HEIGHT, BORDER_SHORT);

        for (half_extents, position) in [
            (across, Point3::new(-BORDER_DISTANCE, BORDER_HEIGHT, 0.0)),
            (across, Point3::new(BORDER_DISTANCE, BORDER_HEIGHT, 0.0)),
            (along, Point3::new(0.0, BORDER_HEIGHT, BORDER_DISTANCE)),
            (along, Point3::new(0.0, BORDER_HEIGHT, -BORDER_DISTANCE)),
        ] {
            self.registry
                .add(ObjectKind::Border { half_extents }, position);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object::{GeometryKind, SurfaceKind};

    #[test]
    fn new_world_contains_only_fixtures() {
        let world = World::new();
        assert_eq!(world.registry.len(), 5);
        assert!(world.registry.iter().all(|object| object.is_protected()));
    }

    #[test]
    fn reset_discards_blocks_and_rebuilds_fixtures() {
        let mut world = World::new();
        let block = world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 2.0, 2.0),
        );
        world.reset();
        assert!(world.registry.get(block).is_none());
        assert_eq!(world.registry.len(), 5);
        assert!(world.registry.iter().all(|object| object.is_protected()));
    }
}
