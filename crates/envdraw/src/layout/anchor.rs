//! Anchor selection
//!
//! Chooses which inbound anchor of a head node a connector should attach to:
//! the closest one by Manhattan distance from the tail's outbound anchor,
//! nudged away from anchors other connectors already use.

use tracing::trace;

use crate::core::Point;

/// Picks the inbound anchor for a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleSelector {
    usage_penalty: i64,
}

impl Default for HandleSelector {
    fn default() -> Self {
        Self { usage_penalty: 50 }
    }
}

impl HandleSelector {
    pub fn new(usage_penalty: i64) -> Self {
        Self { usage_penalty }
    }

    /// Cost of attaching at `anchor` for a tail leaving from `from`
    pub fn cost(&self, from: Point, anchor: Point, others_using: usize) -> i64 {
        let usage = i64::try_from(others_using).unwrap_or(i64::MAX / self.usage_penalty.max(1));
        i64::from(from.manhattan(anchor)) + self.usage_penalty * usage
    }

    /// Cheapest anchor among `candidates`, or `None` when there are none
    ///
    /// `taken` holds the anchors cached by the head's other connectors. On a
    /// tie the anchor listed first wins.
    pub fn select_anchor(&self, from: Point, candidates: &[Point], taken: &[Point]) -> Option<Point> {
        let chosen = candidates.iter().copied().min_by_key(|&anchor| {
            let others = taken.iter().filter(|&&used| used == anchor).count();
            self.cost(from, anchor, others)
        });
        trace!(%from, candidates = candidates.len(), chosen = ?chosen, "anchor selected");
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_anchor_wins() {
        let selector = HandleSelector::default();
        let anchors = [Point::new(250, 100), Point::new(250, 160)];
        let chosen = selector.select_anchor(Point::new(100, 100), &anchors, &[]);
        assert_eq!(chosen, Some(Point::new(250, 100)));
    }

    #[test]
    fn test_congestion_moves_to_free_anchor() {
        let selector = HandleSelector::default();
        let a = Point::new(200, 100);
        let b = Point::new(200, 120);
        // b is 20 units further, but a is used twice (100 units of penalty)
        let chosen = selector.select_anchor(Point::new(100, 100), &[a, b], &[a, a]);
        assert_eq!(chosen, Some(b));
    }

    #[test]
    fn test_equidistant_anchors_prefer_unused() {
        let selector = HandleSelector::default();
        let from = Point::new(0, 0);
        let p1 = Point::new(40, 0);
        let p2 = Point::new(0, 40);
        let chosen = selector.select_anchor(from, &[p1, p2], &[p1, p1]);
        assert_eq!(chosen, Some(p2));
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let selector = HandleSelector::default();
        let above = Point::new(100, 90);
        let below = Point::new(100, 110);
        let chosen = selector.select_anchor(Point::new(100, 100), &[above, below], &[]);
        assert_eq!(chosen, Some(above));
        let chosen = selector.select_anchor(Point::new(100, 100), &[below, above], &[]);
        assert_eq!(chosen, Some(below));
    }

    #[test]
    fn test_no_candidates() {
        let selector = HandleSelector::default();
        assert_eq!(selector.select_anchor(Point::new(0, 0), &[], &[]), None);
    }

    #[test]
    fn test_cost() {
        let selector = HandleSelector::new(50);
        assert_eq!(selector.cost(Point::new(0, 0), Point::new(30, 40), 2), 170);
    }
}
