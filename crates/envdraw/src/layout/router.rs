//! Orthogonal path search
//!
//! Connectors are routed by a uniform-cost search over a 4-connected lattice
//! with [`GRID_STEP`] spacing, anchored at the route's start point. Occupied
//! space is never a wall, only expensive: every step pays its remaining
//! Manhattan distance to the goal plus a penalty for each shape found in a
//! tight probe box and in a wider proximity box around the new point. Leaving
//! the initial direction of travel costs a bend penalty, and more when the
//! current straight run is still short.
//!
//! The search may visit a window around the canvas and the endpoints, but the
//! number of expansions is capped by the grid-cell count of the inflated
//! canvas alone, so an endpoint dragged far away never makes a search longer.
//! Running out of budget yields a truncated route completed with an L-shaped
//! tail; an empty queue, or a zero budget, is reported as
//! [`RouteError::Unreachable`].

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use serde::Serialize;
use tracing::{debug, trace, trace_span};

use crate::core::{Heading, OccupancyIndex, Point, Rect, RouteError, RouterConfig, GRID_STEP};

/// How a route was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteQuality {
    /// The search reached the goal
    Complete,
    /// The expansion budget ran out; the tail is a plain L
    Truncated,
    /// No search result; a direct two-point stub
    Fallback,
}

/// A routed polyline from start to goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub points: Vec<Point>,
    pub quality: RouteQuality,
    pub expansions: usize,
}

impl Route {
    /// Direct two-point line used when routing fails
    pub fn stub(start: Point, goal: Point) -> Self {
        Self {
            points: vec![start, goal],
            quality: RouteQuality::Fallback,
            expansions: 0,
        }
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// True when every segment is horizontal or vertical
    pub fn is_orthogonal(&self) -> bool {
        self.points.windows(2).all(|w| w[0].is_orthogonal_to(w[1]))
    }

    /// Number of direction changes along the route
    pub fn bends(&self) -> usize {
        let headings: Vec<Heading> = self
            .points
            .windows(2)
            .filter_map(|w| Heading::between(w[0], w[1]))
            .collect();
        headings.windows(2).filter(|h| h[0] != h[1]).count()
    }

    /// The route with colinear interior points removed
    pub fn simplified(&self) -> Vec<Point> {
        compress_to_polyline(&self.points)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in self.points.iter_mut() {
            *p = p.offset(dx, dy);
        }
    }
}

/// Drop repeated points and interior points on a straight run
pub fn compress_to_polyline(points: &[Point]) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if deduped.last() != Some(&p) {
            deduped.push(p);
        }
    }
    if deduped.len() < 3 {
        return if points.len() >= 2 && deduped.len() == 1 {
            vec![deduped[0], deduped[0]]
        } else {
            deduped
        };
    }

    let mut out = vec![deduped[0]];
    for i in 1..deduped.len() - 1 {
        let (prev, cur, next) = (deduped[i - 1], deduped[i], deduped[i + 1]);
        let straight = (prev.x == cur.x && cur.x == next.x) || (prev.y == cur.y && cur.y == next.y);
        if !straight {
            out.push(cur);
        }
    }
    out.push(deduped[deduped.len() - 1]);
    out
}

/// Lattice of candidate points inside the search window
#[derive(Debug, Clone, Copy)]
struct Lattice {
    origin: Point,
    cols: usize,
    rows: usize,
}

impl Lattice {
    /// Lattice through `anchor`, covering as much of `window` as it can
    fn new(anchor: Point, window: Rect) -> Self {
        let origin = Point::new(
            anchor.x - (anchor.x - window.min_x).div_euclid(GRID_STEP) * GRID_STEP,
            anchor.y - (anchor.y - window.min_y).div_euclid(GRID_STEP) * GRID_STEP,
        );
        let cols = usize::try_from((window.max_x - origin.x).div_euclid(GRID_STEP) + 1).unwrap_or(0);
        let rows = usize::try_from((window.max_y - origin.y).div_euclid(GRID_STEP) + 1).unwrap_or(0);
        Self { origin, cols, rows }
    }

    fn cells(&self) -> usize {
        self.cols.saturating_mul(self.rows)
    }

    fn index(&self, p: Point) -> Option<usize> {
        let dx = p.x - self.origin.x;
        let dy = p.y - self.origin.y;
        if dx < 0 || dy < 0 || dx % GRID_STEP != 0 || dy % GRID_STEP != 0 {
            return None;
        }
        let col = usize::try_from(dx / GRID_STEP).ok()?;
        let row = usize::try_from(dy / GRID_STEP).ok()?;
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }
}

/// One partial path in the search arena
#[derive(Debug, Clone, Copy)]
struct SearchState {
    point: Point,
    cost: i64,
    parent: Option<usize>,
    /// Second point of the path, fixing its initial direction
    first_step: Option<Point>,
    heading: Option<Heading>,
    /// Grid steps since the last change of heading
    run: u32,
}

/// Soft-occupancy orthogonal router
#[derive(Debug, Clone)]
pub struct PathRouter {
    config: RouterConfig,
    canvas: Rect,
}

impl PathRouter {
    pub fn new(config: RouterConfig, canvas: Rect) -> Self {
        Self { config, canvas }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Region the search may visit for a route between two points
    pub fn search_window(&self, start: Point, goal: Point) -> Rect {
        self.canvas
            .union(Rect::spanning(start, goal))
            .inflate(self.config.window_margin)
    }

    /// Expansion cap used when the config sets none: one per grid cell of
    /// the canvas inflated by the window margin
    pub fn default_budget(&self) -> usize {
        let area = self.canvas.inflate(self.config.window_margin);
        let cols = usize::try_from(area.width().div_euclid(GRID_STEP) + 1).unwrap_or(0);
        let rows = usize::try_from(area.height().div_euclid(GRID_STEP) + 1).unwrap_or(0);
        cols.saturating_mul(rows)
    }

    /// Occupancy cost of standing at `p`
    pub fn crowding_cost<O: OccupancyIndex + ?Sized>(&self, p: Point, occupancy: &O) -> i64 {
        let probe = occupancy.count_overlapping(&Rect::around(p, self.config.probe_half_extent));
        let near =
            occupancy.count_overlapping(&Rect::around(p, self.config.proximity_half_extent));
        self.config.probe_penalty * count_as_i64(probe)
            + self.config.proximity_penalty * count_as_i64(near)
    }

    /// Route from `start` to `goal` around the shapes in `occupancy`
    pub fn route<O: OccupancyIndex + ?Sized>(
        &self,
        start: Point,
        goal: Point,
        occupancy: &O,
    ) -> Result<Route, RouteError> {
        let _span = trace_span!("route", %start, %goal).entered();

        if start == goal {
            return Ok(Route {
                points: vec![start, start],
                quality: RouteQuality::Complete,
                expansions: 0,
            });
        }

        let lattice = Lattice::new(start, self.search_window(start, goal));
        let budget = self
            .config
            .max_expansions
            .unwrap_or_else(|| self.default_budget());
        let unreachable = |expansions| RouteError::Unreachable {
            start,
            goal,
            expansions,
        };
        let Some(goal_index) = lattice.index(goal) else {
            debug!("goal is off the start lattice");
            return Err(unreachable(0));
        };
        if budget == 0 {
            return Err(unreachable(0));
        }

        let mut arena: Vec<SearchState> = vec![SearchState {
            point: start,
            cost: 0,
            parent: None,
            first_step: None,
            heading: None,
            run: 0,
        }];
        let mut settled: HashSet<usize> = HashSet::with_capacity(budget.min(lattice.cells()));
        let mut heap: BinaryHeap<Reverse<(i64, u64, usize)>> = BinaryHeap::new();
        let mut tie_seq: u64 = 0;
        heap.push(Reverse((0, tie_seq, 0)));

        let mut expansions = 0usize;
        let mut budget_spent = false;
        let mut best: Option<usize> = None;

        while let Some(Reverse((_, _, state_idx))) = heap.pop() {
            let state = arena[state_idx];
            let Some(cell) = lattice.index(state.point) else {
                continue;
            };
            if !settled.insert(cell) {
                continue;
            }

            if cell == goal_index {
                let points = trace_back(&arena, state_idx);
                trace!(expansions, cost = state.cost, len = points.len(), "route complete");
                return Ok(Route {
                    points,
                    quality: RouteQuality::Complete,
                    expansions,
                });
            }

            if best.map_or(true, |b| closer(&arena[b], &state, goal)) {
                best = Some(state_idx);
            }

            if expansions >= budget {
                budget_spent = true;
                break;
            }
            expansions += 1;

            for heading in Heading::ALL {
                let (dx, dy) = heading.delta();
                let next = state.point.offset(dx * GRID_STEP, dy * GRID_STEP);
                let Some(next_cell) = lattice.index(next) else {
                    continue;
                };
                if settled.contains(&next_cell) {
                    continue;
                }
                let successor =
                    self.extend(start, &state, state_idx, heading, next, goal, occupancy);
                arena.push(successor);
                tie_seq += 1;
                heap.push(Reverse((successor.cost, tie_seq, arena.len() - 1)));
            }
        }

        match best {
            Some(best_idx) if budget_spent && expansions > 0 => {
                let mut points = trace_back(&arena, best_idx);
                append_l_tail(&mut points, goal);
                debug!(
                    expansions,
                    reached = %arena[best_idx].point,
                    "expansion budget exhausted, returning truncated route"
                );
                Ok(Route {
                    points,
                    quality: RouteQuality::Truncated,
                    expansions,
                })
            }
            _ => Err(unreachable(expansions)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn extend<O: OccupancyIndex + ?Sized>(
        &self,
        start: Point,
        state: &SearchState,
        state_idx: usize,
        heading: Heading,
        next: Point,
        goal: Point,
        occupancy: &O,
    ) -> SearchState {
        let run = if state.heading == Some(heading) {
            state.run + 1
        } else {
            1
        };
        let mut step = i64::from(next.manhattan(goal)) + self.crowding_cost(next, occupancy);

        // Paths of two or more points pay for leaving their initial line.
        let first_step = match state.first_step {
            Some(second) => {
                let on_initial_line = if start.x == second.x {
                    next.x == start.x
                } else {
                    next.y == start.y
                };
                if !on_initial_line {
                    step += self.config.bend_penalty;
                    if run < 2 {
                        step += self.config.short_segment_penalty;
                    }
                }
                Some(second)
            }
            None => Some(next),
        };

        SearchState {
            point: next,
            cost: state.cost + step,
            parent: Some(state_idx),
            first_step,
            heading: Some(heading),
            run,
        }
    }
}

fn count_as_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX / 1024)
}

/// Whether `candidate` is a better truncation point than `current`
fn closer(current: &SearchState, candidate: &SearchState, goal: Point) -> bool {
    let a = (current.point.manhattan(goal), current.cost);
    let b = (candidate.point.manhattan(goal), candidate.cost);
    b < a
}

fn trace_back(arena: &[SearchState], mut idx: usize) -> Vec<Point> {
    let mut points = vec![arena[idx].point];
    while let Some(parent) = arena[idx].parent {
        points.push(arena[parent].point);
        idx = parent;
    }
    points.reverse();
    points
}

/// Extend `points` to `goal` horizontally, then vertically, one grid step at a time
fn append_l_tail(points: &mut Vec<Point>, goal: Point) {
    let Some(&last) = points.last() else {
        points.push(goal);
        return;
    };
    let corner = Point::new(goal.x, last.y);
    for target in [corner, goal] {
        let mut cursor = points.last().copied().unwrap_or(last);
        while cursor != target {
            let step_x = (target.x - cursor.x).signum() * (target.x - cursor.x).abs().min(GRID_STEP);
            let step_y = (target.y - cursor.y).signum() * (target.y - cursor.y).abs().min(GRID_STEP);
            cursor = cursor.offset(step_x, step_y);
            points.push(cursor);
        }
    }
}
