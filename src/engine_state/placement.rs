//! # Block Placement
//!
//! The placement controller ties the picking, snapping, and fall animation
//! together: it tracks the hover preview under the cursor, commits placements
//! and deletions, and drives the one fall animation that may be in flight.
//! While a fall is in flight the controller is busy and further commits are
//! suppressed; the hover preview keeps tracking the cursor.

use cgmath::Point3;
use web_time::Duration;

use super::animation::FallAnimation;
use super::grid::{snap_point_to_grid, GridConfig};
use super::picking::{resolve_ground_collision, Ray};
use super::world::object::{GeometryKind, ObjectId, ObjectKind, SurfaceKind};
use super::world::World;

/// The block the next placement will create.
///
/// Both parts are optional so a future picker UI can represent "nothing
/// chosen"; a commit with either part unset is a guarded no-op.
#[derive(Copy, Clone, Debug)]
pub struct Selection {
    /// Geometry of the next block
    pub geometry: Option<GeometryKind>,
    /// Surface of the next block
    pub surface: Option<SurfaceKind>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            geometry: Some(GeometryKind::Cube),
            surface: Some(SurfaceKind::Brick),
        }
    }
}

/// What a commit did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// A block was placed and is at rest
    Placed(ObjectId),
    /// A block was placed at hover height and is now falling
    Falling(ObjectId),
    /// An object was deleted
    Deleted(ObjectId),
    /// Nothing happened
    Ignored,
}

/// Hover preview, selection, and fall bookkeeping for block placement.
#[derive(Debug, Default)]
pub struct PlacementController {
    /// The block the next placement creates
    pub selection: Selection,
    preview_position: Option<Point3<f32>>,
    active_fall: Option<FallAnimation>,
}

impl PlacementController {
    /// Creates a controller with the default cube/brick selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fall animation is in flight.
    pub fn is_busy(&self) -> bool {
        self.active_fall.is_some()
    }

    /// Where the hover preview currently sits, if the cursor has produced a
    /// hit since startup.
    pub fn preview_position(&self) -> Option<Point3<f32>> {
        self.preview_position
    }

    /// Selects the geometry for the next placement.
    pub fn select_geometry(&mut self, geometry: GeometryKind) {
        self.selection.geometry = Some(geometry);
    }

    /// Cycles the surface for the next placement to the next kind.
    pub fn cycle_surface(&mut self) {
        self.selection.surface = Some(
            self.selection
                .surface
                .map_or(SurfaceKind::Brick, SurfaceKind::next),
        );
    }

    /// Forgets the preview and any in-flight fall, for a world reset.
    pub fn reset(&mut self) {
        self.preview_position = None;
        self.active_fall = None;
    }

    /// Updates the hover preview from the cursor ray.
    ///
    /// The preview cell is the snap of the hit point nudged one unit along
    /// the hit normal, so hovering a side face previews the neighboring cell.
    /// A ray that misses everything keeps the last preview. The preview keeps
    /// moving while a fall is in flight; only commits wait for the landing.
    ///
    /// # Arguments
    /// * `ray` - Picking ray under the cursor
    /// * `world` - World to hit-test
    /// * `grid` - Grid configuration for snapping
    pub fn hover(&mut self, ray: Ray, world: &World, grid: &GridConfig) {
        if let Some(hit) = ray.intersect_registry(&world.registry, grid.cell_size) {
            self.preview_position = Some(snap_point_to_grid(hit.point + hit.normal, grid));
        }
    }

    /// Commits a click: places a block, or deletes the hit object.
    ///
    /// Placement snaps the nudged hit point to the grid; with gravity active
    /// the candidate is then settled by the ground probe, and when settling
    /// moves it the block spawns at hover height and falls. Deletion removes
    /// the hit object unless it is a protected fixture. All of this is
    /// suppressed while a fall is in flight.
    ///
    /// # Arguments
    /// * `ray` - Picking ray under the cursor
    /// * `world` - World to mutate
    /// * `grid` - Grid configuration for snapping and settling
    /// * `delete_mode` - Whether the click deletes instead of placing
    /// * `gravity_active` - Whether placements settle downward
    pub fn commit(
        &mut self,
        ray: Ray,
        world: &mut World,
        grid: &GridConfig,
        delete_mode: bool,
        gravity_active: bool,
    ) -> CommitOutcome {
        if self.is_busy() {
            log::debug!("Ignoring click while a block is falling");
            return CommitOutcome::Ignored;
        }

        let Some(hit) = ray.intersect_registry(&world.registry, grid.cell_size) else {
            return CommitOutcome::Ignored;
        };

        if delete_mode {
            if hit.protected {
                return CommitOutcome::Ignored;
            }
            world.registry.remove(hit.object);
            return CommitOutcome::Deleted(hit.object);
        }

        let (Some(geometry), Some(surface)) =
            (self.selection.geometry, self.selection.surface)
        else {
            log::warn!("Ignoring placement click without a selected block");
            return CommitOutcome::Ignored;
        };

        let kind = ObjectKind::Block { geometry, surface };
        let candidate = snap_point_to_grid(hit.point + hit.normal, grid);

        if !gravity_active {
            let id = world.registry.add(kind, candidate);
            return CommitOutcome::Placed(id);
        }

        let resolved = resolve_ground_collision(candidate, &world.registry, grid);
        let id = world.registry.add(kind, candidate);
        if resolved == candidate {
            return CommitOutcome::Placed(id);
        }

        self.active_fall = Some(FallAnimation::new(id, candidate, resolved));
        CommitOutcome::Falling(id)
    }

    /// Advances the in-flight fall animation, if any, by one frame.
    ///
    /// The animated object's pose is written back into the registry. When the
    /// object has vanished (world reset mid-fall) the animation is dropped
    /// and the controller stops being busy.
    ///
    /// # Arguments
    /// * `world` - World holding the animated object
    /// * `dt` - Frame time to advance by
    pub fn advance_fall(&mut self, world: &mut World, dt: Duration) {
        let Some(fall) = self.active_fall.as_mut() else {
            return;
        };

        let Some(object) = world.registry.get_mut(fall.object) else {
            log::debug!("Dropping fall animation for a removed object");
            self.active_fall = None;
            return;
        };

        let frame = fall.advance(dt);
        object.position = frame.position;
        object.scale = frame.scale;
        if frame.finished {
            self.active_fall = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn top_down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Point3::new(x, 100.0, z),
            direction: Vector3::new(0.0, -1.0, 0.0),
        }
    }

    #[test]
    fn clicking_the_ground_places_a_grounded_block() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();

        let outcome =
            controller.commit(top_down_ray(5.9, -1.2), &mut world, &grid, false, true);
        let CommitOutcome::Placed(id) = outcome else {
            panic!("expected a resting placement, got {:?}", outcome);
        };
        let block = world.registry.get(id).unwrap();
        assert_eq!(block.position, Point3::new(6.0, 2.0, -2.0));
        assert!(!controller.is_busy());
    }

    #[test]
    fn hovering_a_side_face_previews_the_neighbor_cell() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Brick,
            },
            Point3::new(2.0, 2.0, 2.0),
        );

        let ray = Ray {
            origin: Point3::new(20.0, 2.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        controller.hover(ray, &world, &grid);
        assert_eq!(controller.preview_position(), Some(Point3::new(6.0, 2.0, 2.0)));
    }

    #[test]
    fn a_missed_hover_keeps_the_last_preview() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();

        controller.hover(top_down_ray(2.0, 2.0), &world, &grid);
        let before = controller.preview_position();
        assert!(before.is_some());

        let miss = Ray {
            origin: Point3::new(500.0, 100.0, 500.0),
            direction: Vector3::new(0.0, -1.0, 0.0),
        };
        controller.hover(miss, &world, &grid);
        assert_eq!(controller.preview_position(), before);
    }

    #[test]
    fn gravity_drops_an_elevated_placement() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 2.0, 2.0),
        );

        // A side-face placement next to a grounded block stays put.
        let ray = Ray {
            origin: Point3::new(20.0, 2.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        let outcome = controller.commit(ray, &mut world, &grid, false, true);
        assert!(matches!(outcome, CommitOutcome::Placed(_)));

        // A side-face placement next to a floating ledge has only the first
        // placement far below and must fall onto it.
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 10.0, 2.0),
        );
        let elevated = Ray {
            origin: Point3::new(20.0, 10.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        let fell = controller.commit(elevated, &mut world, &grid, false, true);
        match fell {
            CommitOutcome::Falling(id) => {
                assert!(controller.is_busy());
                controller.advance_fall(&mut world, Duration::from_secs(1));
                assert!(!controller.is_busy());
                let block = world.registry.get(id).unwrap();
                assert_eq!(block.position.y, 6.0);
                assert_eq!(block.scale, Vector3::new(1.0, 1.0, 1.0));
            }
            other => panic!("expected a falling placement, got {:?}", other),
        }
    }

    #[test]
    fn gravity_off_places_at_the_snapped_cell_with_no_fall() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 10.0, 2.0),
        );

        // Beside the floating ledge there is nothing below, so with gravity
        // assist off the block must stay at the elevated snapped cell.
        let elevated = Ray {
            origin: Point3::new(20.0, 10.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        let outcome = controller.commit(elevated, &mut world, &grid, false, false);
        let CommitOutcome::Placed(id) = outcome else {
            panic!("expected a resting placement, got {:?}", outcome);
        };
        let block = world.registry.get(id).unwrap();
        assert_eq!(block.position, Point3::new(6.0, 10.0, 2.0));
        assert!(!controller.is_busy());
    }

    #[test]
    fn the_preview_keeps_tracking_while_a_block_falls() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 10.0, 2.0),
        );

        let elevated = Ray {
            origin: Point3::new(20.0, 10.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        let outcome = controller.commit(elevated, &mut world, &grid, false, true);
        assert!(matches!(outcome, CommitOutcome::Falling(_)));
        assert!(controller.is_busy());

        controller.hover(top_down_ray(10.0, 10.0), &world, &grid);
        assert_eq!(
            controller.preview_position(),
            Some(Point3::new(10.0, 2.0, 10.0))
        );
    }

    #[test]
    fn commits_are_suppressed_while_falling() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 10.0, 2.0),
        );

        let elevated = Ray {
            origin: Point3::new(20.0, 10.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        let outcome = controller.commit(elevated, &mut world, &grid, false, true);
        assert!(matches!(outcome, CommitOutcome::Falling(_)));

        let count = world.registry.len();
        let suppressed =
            controller.commit(top_down_ray(10.0, 10.0), &mut world, &grid, false, true);
        assert_eq!(suppressed, CommitOutcome::Ignored);
        assert_eq!(world.registry.len(), count);
    }

    #[test]
    fn fixtures_survive_delete_clicks() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();

        let outcome = controller.commit(top_down_ray(2.0, 2.0), &mut world, &grid, true, true);
        assert_eq!(outcome, CommitOutcome::Ignored);
        assert_eq!(world.registry.len(), 5);
    }

    #[test]
    fn delete_removes_a_placed_block() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        let id = world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Brick,
            },
            Point3::new(2.0, 2.0, 2.0),
        );

        let outcome = controller.commit(top_down_ray(2.0, 2.0), &mut world, &grid, true, true);
        assert_eq!(outcome, CommitOutcome::Deleted(id));
        assert!(world.registry.get(id).is_none());
    }

    #[test]
    fn a_reset_mid_fall_drops_the_animation() {
        let mut world = World::new();
        let grid = GridConfig::default();
        let mut controller = PlacementController::new();
        world.registry.add(
            ObjectKind::Block {
                geometry: GeometryKind::Cube,
                surface: SurfaceKind::Stone,
            },
            Point3::new(2.0, 10.0, 2.0),
        );

        let elevated = Ray {
            origin: Point3::new(20.0, 10.0, 2.0),
            direction: Vector3::new(-1.0, 0.0, 0.0),
        };
        controller.commit(elevated, &mut world, &grid, false, true);
        assert!(controller.is_busy());

        world.reset();
        controller.advance_fall(&mut world, Duration::from_millis(16));
        assert!(!controller.is_busy());
        assert_eq!(world.registry.len(), 5);
    }
}
