//! Layout configuration
//!
//! Every tunable of the placement, anchor selection and routing engine lives
//! here. Defaults reproduce the classic environment-diagram behaviour; a JSON
//! file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DiagramError, Rect, Size};

/// Node placement tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Position returned when the canvas is empty
    pub first_position: (i32, i32),
    /// Number of random candidates tried before accepting an overlapping one
    pub max_attempts: usize,
    /// Extra space required around a candidate footprint
    pub margin: i32,
    /// Footprint assumed for frames and functions when placing them
    pub footprint: Size,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            first_position: (50, 50),
            max_attempts: 30,
            margin: 10,
            footprint: Size::new(150, 70),
        }
    }
}

/// Path search tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Half extent of the tight box probed at each candidate point
    pub probe_half_extent: i32,
    /// Half extent of the wider proximity box
    pub proximity_half_extent: i32,
    pub probe_penalty: i64,
    pub proximity_penalty: i64,
    pub bend_penalty: i64,
    pub short_segment_penalty: i64,
    /// Margin added around the canvas and the endpoints to bound the search
    pub window_margin: i32,
    /// Expansion cap; `None` means one per grid cell of the canvas plus margin
    pub max_expansions: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            probe_half_extent: 2,
            proximity_half_extent: 10,
            probe_penalty: 200,
            proximity_penalty: 150,
            bend_penalty: 50,
            short_segment_penalty: 100,
            window_margin: 100,
            max_expansions: None,
        }
    }
}

/// Complete configuration of a diagram session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    /// Seed for placement sampling; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Cost added per other connector already using an anchor
    pub anchor_usage_penalty: i64,
    /// Re-route every incident connector on each drag motion event
    pub reroute_during_drag: bool,
    pub placement: PlacementConfig,
    pub router: RouterConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            seed: None,
            anchor_usage_penalty: 50,
            reroute_during_drag: true,
            placement: PlacementConfig::default(),
            router: RouterConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with a fixed placement seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_canvas(mut self, width: i32, height: i32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.router.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_reroute_during_drag(mut self, reroute: bool) -> Self {
        self.reroute_during_drag = reroute;
        self
    }

    /// The drawable canvas area
    pub fn canvas_bounds(&self) -> Rect {
        Rect::new(0, 0, self.canvas_width, self.canvas_height)
    }

    /// Region new nodes are sampled from, leaving room for a footprint
    pub fn placement_region(&self) -> Rect {
        let (first_x, first_y) = self.placement.first_position;
        let max_x = (self.canvas_width - self.placement.footprint.width).max(first_x);
        let max_y = (self.canvas_height - self.placement.footprint.height - 30).max(first_y);
        Rect::new(first_x, first_y, max_x, max_y)
    }

    /// Load a JSON configuration file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, DiagramError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DiagramError> {
        serde_json::from_str(content).map_err(|e| {
            DiagramError::script_error(format!("invalid config: {}", e), e.line(), e.column())
        })
    }
}
