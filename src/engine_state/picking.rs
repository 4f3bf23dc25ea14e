//! # Ray Picking
//!
//! Casting rays through the scene: turning a cursor position into a world
//! space ray, intersecting that ray with the object registry to find what the
//! player is pointing at, and the downward ground probe that resolves where a
//! gravity-assisted placement lands.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Vector4};

use super::grid::GridConfig;
use super::world::object::{CollisionVolume, ObjectId};
use super::world::registry::ObjectRegistry;

/// A ray in world space.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Starting point of the ray
    pub origin: Point3<f32>,
    /// Unit direction of the ray
    pub direction: Vector3<f32>,
}

/// What a registry intersection found.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    /// The object that was hit
    pub object: ObjectId,
    /// World-space point of the hit
    pub point: Point3<f32>,
    /// Outward unit normal of the hit face
    pub normal: Vector3<f32>,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// Whether the hit object is a protected fixture
    pub protected: bool,
}

impl Ray {
    /// Builds the picking ray under a cursor position.
    ///
    /// The cursor is unprojected through the inverse view projection at the
    /// far clip depth; the ray runs from the eye toward that far point.
    ///
    /// # Arguments
    /// * `cursor` - Cursor position in physical pixels
    /// * `surface_size` - Surface size in physical pixels
    /// * `view_proj_inverse` - Inverse of the camera's view projection matrix
    /// * `eye` - Camera position in world space
    pub fn from_screen(
        cursor: (f64, f64),
        surface_size: (u32, u32),
        view_proj_inverse: Matrix4<f32>,
        eye: Point3<f32>,
    ) -> Option<Self> {
        let (width, height) = surface_size;
        if width == 0 || height == 0 {
            return None;
        }

        let ndc_x = (2.0 * cursor.0 / width as f64 - 1.0) as f32;
        let ndc_y = -(2.0 * cursor.1 / height as f64 - 1.0) as f32;

        let far = view_proj_inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if far.w.abs() <= f32::EPSILON {
            return None;
        }
        let far = Point3::new(far.x / far.w, far.y / far.w, far.z / far.w);

        let direction = far - eye;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }

        Some(Self {
            origin: eye,
            direction: direction.normalize(),
        })
    }

    /// Intersects this ray with every object in the registry and returns the
    /// nearest hit in front of the origin, if any.
    ///
    /// # Arguments
    /// * `registry` - Objects to test against
    /// * `cell_size` - World units per grid cell, for block collision volumes
    pub fn intersect_registry(
        &self,
        registry: &ObjectRegistry,
        cell_size: f32,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for object in registry.iter() {
            let candidate = match object.collision_volume(cell_size) {
                CollisionVolume::Aabb { half_extents } => {
                    self.intersect_aabb(object.position, half_extents)
                }
                CollisionVolume::Sphere { radius } => {
                    self.intersect_sphere(object.position, radius)
                }
            };
            if let Some((distance, point, normal)) = candidate {
                let closer = nearest
                    .as_ref()
                    .map_or(true, |best| distance < best.distance);
                if closer {
                    nearest = Some(RayHit {
                        object: object.id,
                        point,
                        normal,
                        distance,
                        protected: object.is_protected(),
                    });
                }
            }
        }
        nearest
    }

    /// Slab test against an axis-aligned box centered at `center`.
    ///
    /// A hit exactly at the origin (distance zero) counts, which is what lets
    /// the ground probe start flush on a block's top face and still see it.
    /// Division by a zero direction component produces infinities, and NaN on
    /// a boundary-parallel slab, which `f32::min`/`f32::max` discard.
    fn intersect_aabb(
        &self,
        center: Point3<f32>,
        half_extents: Vector3<f32>,
    ) -> Option<(f32, Point3<f32>, Vector3<f32>)> {
        let min = center - half_extents;
        let max = center + half_extents;

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = 0;
        let mut exit_axis = 0;

        for axis in 0..3 {
            let t1 = (min[axis] - self.origin[axis]) / self.direction[axis];
            let t2 = (max[axis] - self.origin[axis]) / self.direction[axis];
            let near = t1.min(t2);
            let far = t1.max(t2);
            if near > t_enter {
                t_enter = near;
                enter_axis = axis;
            }
            if far < t_exit {
                t_exit = far;
                exit_axis = axis;
            }
        }

        if t_enter > t_exit || t_exit < 0.0 {
            return None;
        }

        // Origins inside the box hit the exit face instead.
        let (t, axis) = if t_enter >= 0.0 {
            (t_enter, enter_axis)
        } else {
            (t_exit, exit_axis)
        };

        let point = self.origin + self.direction * t;
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        normal[axis] = if self.direction[axis] > 0.0 { -1.0 } else { 1.0 };
        if t == t_exit && t_enter < 0.0 {
            normal[axis] = -normal[axis];
        }

        Some((t, point, normal))
    }

    /// Analytic test against a sphere centered at `center`.
    fn intersect_sphere(
        &self,
        center: Point3<f32>,
        radius: f32,
    ) -> Option<(f32, Point3<f32>, Vector3<f32>)> {
        let offset = self.origin - center;
        let b = offset.dot(self.direction);
        let c = offset.magnitude2() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let mut t = -b - sqrt_discriminant;
        if t < 0.0 {
            t = -b + sqrt_discriminant;
        }
        if t < 0.0 {
            return None;
        }

        let point = self.origin + self.direction * t;
        let normal = (point - center) / radius;
        Some((t, point, normal))
    }
}

/// Settles a snapped candidate position onto whatever lies below it.
///
/// A short downward probe is cast from half a cell above the candidate
/// center; the first surface it meets decides the landing cell. The resulting
/// height is re-bucketed to a cell center and never drops below the lowest
/// valid row. With nothing below (candidate off every surface) the candidate
/// comes back unchanged.
///
/// # Arguments
/// * `candidate` - Snapped position to settle
/// * `registry` - Objects the probe can land on
/// * `grid` - Grid configuration for cell size and the height floor
pub fn resolve_ground_collision(
    candidate: Point3<f32>,
    registry: &ObjectRegistry,
    grid: &GridConfig,
) -> Point3<f32> {
    let probe = Ray {
        origin: candidate + Vector3::new(0.0, grid.half_cell(), 0.0),
        direction: Vector3::new(0.0, -1.0, 0.0),
    };

    match probe.intersect_registry(registry, grid.cell_size) {
        Some(hit) => {
            let settled = (hit.point.y / grid.cell_size).floor() * grid.cell_size
                + grid.half_cell();
            Point3::new(candidate.x, settled.max(grid.half_cell()), candidate.z)
        }
        None => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::world::object::{GeometryKind, ObjectKind, SurfaceKind};
    use crate::engine_state::world::World;
    use approx::assert_relative_eq;

    fn block() -> ObjectKind {
        ObjectKind::Block {
            geometry: GeometryKind::Cube,
            surface: SurfaceKind::Brick,
        }
    }

    #[test]
    fn nearest_object_wins() {
        let mut registry = ObjectRegistry::new();
        registry.add(block(), Point3::new(0.0, 2.0, 0.0));
        let near = registry.add(block(), Point3::new(0.0, 2.0, 8.0));
        let ray = Ray {
            origin: Point3::new(0.0, 2.0, 20.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        let hit = ray.intersect_registry(&registry, 4.0).unwrap();
        assert_eq!(hit.object, near);
        assert_relative_eq!(hit.point.z, 10.0);
        assert_relative_eq!(hit.normal.z, 1.0);
    }

    #[test]
    fn side_face_normals_point_outward() {
        let mut registry = ObjectRegistry::new();
        registry.add(block(), Point3::new(0.0, 2.0, 0.0));
        let ray = Ray {
            origin: Point3::new(-10.0, 2.0, 0.0),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };
        let hit = ray.intersect_registry(&registry, 4.0).unwrap();
        assert_relative_eq!(hit.point.x, -2.0);
        assert_relative_eq!(hit.normal.x, -1.0);
    }

    #[test]
    fn sphere_hits_are_exact() {
        let mut registry = ObjectRegistry::new();
        registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Sphere,
                surface: SurfaceKind::Glass,
            },
            Point3::new(0.0, 2.0, 0.0),
        );
        // Grazes past where the cell box would be hit but the sphere is not.
        let miss = Ray {
            origin: Point3::new(-10.0, 3.9, 1.9),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };
        assert!(miss.intersect_registry(&registry, 4.0).is_none());

        let hit = Ray {
            origin: Point3::new(-10.0, 2.0, 0.0),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };
        let hit = hit.intersect_registry(&registry, 4.0).unwrap();
        assert_relative_eq!(hit.point.x, -2.0);
        assert_relative_eq!(hit.normal.x, -1.0);
    }

    #[test]
    fn ground_probe_leaves_a_grounded_candidate_alone() {
        let world = World::new();
        let grid = GridConfig::default();
        let candidate = Point3::new(2.0, 2.0, 2.0);
        let resolved = resolve_ground_collision(candidate, &world.registry, &grid);
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn ground_probe_stacks_onto_an_occupied_cell() {
        let mut world = World::new();
        let grid = GridConfig::default();
        world.registry.add(block(), Point3::new(0.0, 2.0, 0.0));
        // Probe starts flush on the occupant's top face and must still see it.
        let resolved =
            resolve_ground_collision(Point3::new(0.0, 2.0, 0.0), &world.registry, &grid);
        assert_relative_eq!(resolved.y, 6.0);
    }

    #[test]
    fn ground_probe_drops_a_floating_candidate_to_the_ground() {
        let world = World::new();
        let grid = GridConfig::default();
        let resolved =
            resolve_ground_collision(Point3::new(2.0, 14.0, 2.0), &world.registry, &grid);
        assert_relative_eq!(resolved.y, 2.0);
    }

    #[test]
    fn ground_probe_misses_outside_the_plane() {
        let registry = ObjectRegistry::new();
        let grid = GridConfig::default();
        let candidate = Point3::new(2.0, 14.0, 2.0);
        let resolved = resolve_ground_collision(candidate, &registry, &grid);
        assert_eq!(resolved, candidate);
    }
}
