use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LayoutConfig;

/// Node positions keyed by node id.
pub type Positions = BTreeMap<String, Position>;

/// Center of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    /// Distance from the node's root.
    pub depth: usize,
}

impl Position {
    pub fn new(x: f32, y: f32, depth: usize) -> Self {
        Self { x, y, depth }
    }

    pub(crate) fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            depth: self.depth,
        }
    }
}

/// Visible parent to child connection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutingChannel {
    pub channel_offset: f32,
    pub channel_index: usize,
    pub total_channels: usize,
}

impl RoutingChannel {
    /// Lane used by every edge of a horizontal parent: one shared bus.
    pub const SHARED: Self = Self {
        channel_offset: 0.0,
        channel_index: 0,
        total_channels: 1,
    };
}

/// Polyline of a connector, from the parent's attachment point to the child's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePath {
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replaces zero, negative or non-finite dimensions with the configured defaults.
    pub fn resolve(self, config: &LayoutConfig) -> Self {
        let usable = |value: f32| value.is_finite() && value > 0.0;
        Self {
            width: if usable(self.width) {
                self.width
            } else {
                config.default_viewport_width
            },
            height: if usable(self.height) {
                self.height
            } else {
                config.default_viewport_height
            },
        }
    }
}

/// Extent of all node boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Bounding box of the node centers, padded by half a node on each side.
    /// `None` when there are no positions.
    pub fn of_positions(positions: &Positions, config: &LayoutConfig) -> Option<Self> {
        let mut iter = positions.values();
        let first = iter.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for pos in iter {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_y = min_y.min(pos.y);
            max_y = max_y.max(pos.y);
        }
        let half_w = config.node_width / 2.0;
        let half_h = config.node_height / 2.0;
        Some(Self {
            min_x: min_x - half_w,
            min_y: min_y - half_h,
            max_x: max_x + half_w,
            max_y: max_y + half_h,
        })
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Camera transform: `screen = layout * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.2},{:.2}) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// Everything a renderer needs for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub positions: Positions,
    /// Visible edges in pre-order.
    pub edges: Vec<Edge>,
    pub channels: BTreeMap<Edge, RoutingChannel>,
    pub paths: BTreeMap<Edge, EdgePath>,
    pub bounds: Option<Bounds>,
    /// Resolved viewport the positions were centered in.
    pub viewport: Viewport,
}

impl ChartLayout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.get(id)
    }

    pub fn path_for(&self, edge: &Edge) -> Option<&EdgePath> {
        self.paths.get(edge)
    }

    pub fn channel_for(&self, edge: &Edge) -> Option<&RoutingChannel> {
        self.channels.get(edge)
    }
}
