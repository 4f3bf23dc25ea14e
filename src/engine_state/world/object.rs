//! # Scene Objects
//!
//! This module defines the entities that live in the object registry: player
//! placed blocks and the immovable fixtures (ground collision plane and
//! decorative border slabs). It also defines the geometry and surface kinds a
//! block can be built from.

use cgmath::{Point3, Vector3};
use num_derive::FromPrimitive;

/// The geometry a placed block is built from.
///
/// The `FromPrimitive` derive allows conversion from integers, which maps the
/// digit-key selection slots onto kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum GeometryKind {
    /// A full-cell cube
    Cube,
    /// A cell-high cylinder with cell-wide diameter
    Cylinder,
    /// A sphere with cell-wide diameter
    Sphere,
    /// A tetrahedron inscribed in a half-cell-radius sphere
    Tetrahedron,
}

impl GeometryKind {
    /// Every geometry kind, in selection-slot order.
    pub fn all() -> [GeometryKind; 4] {
        [
            GeometryKind::Cube,
            GeometryKind::Cylinder,
            GeometryKind::Sphere,
            GeometryKind::Tetrahedron,
        ]
    }
}

/// The textured surface a placed block is rendered with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum SurfaceKind {
    /// Red brick with mortar seams
    Brick,
    /// Framed wooden crate
    Crate,
    /// Brown speckled dirt
    Dirt,
    /// Translucent pale-blue glass
    Glass,
    /// Green speckled grass
    Grass,
    /// Horizontal wooden planks
    Plank,
    /// Yellow speckled sand
    Sand,
    /// Gray speckled stone
    Stone,
    /// Vertical wood grain
    Wood,
}

/// Number of surface kinds (and texture array layers they occupy).
pub const SURFACE_KIND_COUNT: usize = 9;

impl SurfaceKind {
    /// Layer of this surface in the texture array.
    pub fn texture_index(self) -> u32 {
        self as u32
    }

    /// The next surface in cycling order, wrapping at the end.
    pub fn next(self) -> Self {
        let index = (self as usize + 1) % SURFACE_KIND_COUNT;
        num_traits::FromPrimitive::from_usize(index).unwrap_or(SurfaceKind::Brick)
    }
}

/// What a registry entry is: a player-placed block or a protected fixture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// A player-placed block
    Block {
        /// The geometry the block is built from
        geometry: GeometryKind,
        /// The surface the block is rendered with
        surface: SurfaceKind,
    },
    /// The invisible ground collision plane fixture
    GroundPlane {
        /// Half extent of the plane on the X and Z axes
        half_extent: f32,
    },
    /// A decorative border slab fixture
    Border {
        /// Half extents of the slab on each axis
        half_extents: Vector3<f32>,
    },
}

impl ObjectKind {
    /// Whether this kind is a protected fixture (never removed by delete).
    pub fn is_protected(&self) -> bool {
        !matches!(self, ObjectKind::Block { .. })
    }
}

/// The collision volume used for ray tests against an object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CollisionVolume {
    /// An axis-aligned box centered on the object's position
    Aabb {
        /// Half extent of the box on each axis
        half_extents: Vector3<f32>,
    },
    /// A sphere centered on the object's position
    Sphere {
        /// Radius of the sphere
        radius: f32,
    },
}

/// Identifier of an object in the registry, unique for the registry's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

/// An entity in the object registry.
///
/// Created on a placement click (or at world initialization for fixtures) and
/// destroyed on a delete click. Only `position` and `scale` are mutated after
/// creation, and only by the fall animation.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Registry identifier
    pub id: ObjectId,
    /// What this object is
    pub kind: ObjectKind,
    /// Center position in world space
    pub position: Point3<f32>,
    /// Scale applied around the center, unit by default
    pub scale: Vector3<f32>,
}

impl SceneObject {
    /// Creates an object at `position` with unit scale.
    pub(crate) fn new(id: ObjectId, kind: ObjectKind, position: Point3<f32>) -> Self {
        Self {
            id,
            kind,
            position,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Whether this object must never be removed by the delete action.
    pub fn is_protected(&self) -> bool {
        self.kind.is_protected()
    }

    /// The collision volume ray tests use for this object.
    ///
    /// Blocks use their cell bounds; spheres get an exact sphere test, every
    /// other geometry is approximated by its cell box. The scale applied by
    /// the fall animation never touches the collision volume, so a falling
    /// block occupies its logical cell throughout.
    ///
    /// # Arguments
    /// * `cell_size` - World units per grid cell
    pub fn collision_volume(&self, cell_size: f32) -> CollisionVolume {
        let half = cell_size / 2.0;
        match self.kind {
            ObjectKind::Block {
                geometry: GeometryKind::Sphere,
                ..
            } => CollisionVolume::Sphere { radius: half },
            ObjectKind::Block { .. } => CollisionVolume::Aabb {
                half_extents: Vector3::new(half, half, half),
            },
            ObjectKind::GroundPlane { half_extent } => CollisionVolume::Aabb {
                half_extents: Vector3::new(half_extent, 0.0, half_extent),
            },
            ObjectKind::Border { half_extents } => CollisionVolume::Aabb { half_extents },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_cycling_wraps() {
        let mut surface = SurfaceKind::Brick;
        for _ in 0..SURFACE_KIND_COUNT {
            surface = surface.next();
        }
        assert_eq!(surface, SurfaceKind::Brick);
    }

    #[test]
    fn digit_slots_map_to_geometry_kinds() {
        for (slot, expected) in GeometryKind::all().into_iter().enumerate() {
            let kind: Option<GeometryKind> = num_traits::FromPrimitive::from_usize(slot);
            assert_eq!(kind, Some(expected));
        }
        let out_of_range: Option<GeometryKind> = num_traits::FromPrimitive::from_usize(4);
        assert_eq!(out_of_range, None);
    }

    #[test]
    fn fixtures_are_protected() {
        assert!(ObjectKind::GroundPlane { half_extent: 64.0 }.is_protected());
        assert!(ObjectKind::Border {
            half_extents: Vector3::new(26.0, 3.5, 64.0)
        }
        .is_protected());
        assert!(!ObjectKind::Block {
            geometry: GeometryKind::Cube,
            surface: SurfaceKind::Brick
        }
        .is_protected());
    }
}
