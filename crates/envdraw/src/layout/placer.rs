//! Random-sampling node placement
//!
//! New frames and functions are dropped at a random grid point whose
//! footprint, plus a margin, overlaps nothing already drawn. Sampling gives up
//! after a fixed number of attempts and accepts the last candidate, so
//! placement always terminates on a crowded canvas.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::core::{LayoutConfig, OccupancyIndex, PlacementConfig, Point, Rect};

/// Result of a placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Chosen top-left corner
    pub point: Point,
    /// Random candidates drawn; zero when the canvas was empty
    pub attempts: usize,
    /// False when the attempt budget ran out and the last candidate was taken
    pub overlap_free: bool,
}

/// Picks positions for new top-level nodes
#[derive(Debug, Clone)]
pub struct NodePlacer {
    config: PlacementConfig,
    region: Rect,
    rng: StdRng,
}

impl NodePlacer {
    pub fn new(config: &LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config: config.placement.clone(),
            region: config.placement_region(),
            rng,
        }
    }

    /// Region candidates are drawn from
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Space a node placed at `origin` is required to keep clear
    pub fn clearance(&self, origin: Point) -> Rect {
        let footprint = self.config.footprint;
        Rect::from_origin(origin, footprint.width, footprint.height).inflate(self.config.margin)
    }

    /// Choose a position for a new node
    pub fn place<O: OccupancyIndex + ?Sized>(&mut self, occupancy: &O) -> Placement {
        let (first_x, first_y) = self.config.first_position;
        if occupancy.is_empty() {
            return Placement {
                point: Point::new(first_x, first_y),
                attempts: 0,
                overlap_free: true,
            };
        }

        let max_attempts = self.config.max_attempts.max(1);
        let mut candidate = Point::new(first_x, first_y);
        for attempt in 1..=max_attempts {
            candidate = self.sample();
            let crowd = occupancy.count_overlapping(&self.clearance(candidate));
            trace!(%candidate, attempt, crowd, "placement candidate");
            if crowd == 0 {
                return Placement {
                    point: candidate,
                    attempts: attempt,
                    overlap_free: true,
                };
            }
        }

        debug!(
            %candidate,
            attempts = max_attempts,
            "no overlap-free position found, accepting last candidate"
        );
        Placement {
            point: candidate,
            attempts: max_attempts,
            overlap_free: false,
        }
    }

    fn sample(&mut self) -> Point {
        let x = self.rng.random_range(self.region.min_x..=self.region.max_x);
        let y = self.rng.random_range(self.region.min_y..=self.region.max_y);
        Point::new(x, y).floored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Scene, Shape, ShapeTag, Surface};
    use crate::diagram::NodeId;

    fn block(scene: &mut Scene, bounds: Rect) {
        scene.draw(ShapeTag::Node(NodeId::new(0)), Shape::Rect { bounds });
    }

    #[test]
    fn test_empty_canvas_uses_first_position() {
        let mut placer = NodePlacer::new(&LayoutConfig::seeded(1));
        let placement = placer.place(&Scene::new());
        assert_eq!(placement.point, Point::new(50, 50));
        assert_eq!(placement.attempts, 0);
        assert!(placement.overlap_free);
    }

    #[test]
    fn test_candidates_are_grid_aligned_and_in_region() {
        let config = LayoutConfig::seeded(42);
        let mut placer = NodePlacer::new(&config);
        let mut scene = Scene::new();
        block(&mut scene, Rect::from_origin(Point::new(50, 50), 150, 40));

        for _ in 0..50 {
            let placement = placer.place(&scene);
            assert!(placement.point.is_grid_aligned());
            assert!(placer.region().inflate(10).contains(placement.point));
        }
    }

    #[test]
    fn test_accepted_position_is_clear() {
        let mut placer = NodePlacer::new(&LayoutConfig::seeded(7));
        let mut scene = Scene::new();
        block(&mut scene, Rect::from_origin(Point::new(50, 50), 150, 40));

        let placement = placer.place(&scene);
        assert!(placement.overlap_free);
        assert_eq!(scene.count_overlapping(&placer.clearance(placement.point)), 0);
    }

    #[test]
    fn test_full_canvas_gives_up_after_budget() {
        let mut placer = NodePlacer::new(&LayoutConfig::seeded(3));
        let mut scene = Scene::new();
        block(&mut scene, Rect::new(0, 0, 800, 600));

        let placement = placer.place(&scene);
        assert_eq!(placement.attempts, 30);
        assert!(!placement.overlap_free);
    }

    #[test]
    fn test_same_seed_same_positions() {
        let mut scene = Scene::new();
        block(&mut scene, Rect::from_origin(Point::new(50, 50), 150, 40));

        let mut a = NodePlacer::new(&LayoutConfig::seeded(99));
        let mut b = NodePlacer::new(&LayoutConfig::seeded(99));
        for _ in 0..10 {
            assert_eq!(a.place(&scene), b.place(&scene));
        }
    }
}
