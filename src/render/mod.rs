//! Declarative view output.
//!
//! Renderers never touch a UI toolkit: they produce a [`Frame`] that any consumer
//! (canvas, widget tree, terminal) can replay. Frames serialize to camelCase JSON and
//! are what `/ws/view` clients receive.

mod detail;
mod graph;
mod sidebar;

pub use detail::{DetailView, detail};
pub use graph::{GRID_COLOR, Surface, draw_graph, polyline};
pub use sidebar::{Bar, SidebarRow, sidebar};

use serde::Serialize;

/// One full redraw of the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Increases by one per rendered frame.
    pub seq: u64,
    /// Epoch millis at render time.
    pub generated_at: i64,
    pub temp_alert: bool,
    pub sidebar: Vec<SidebarRow>,
    pub detail: Option<DetailView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Channels from a `#rrggbb` string; anything unparseable reads as 0.
    pub fn from_hex(hex: &str, a: f64) -> Self {
        let channel = |range: std::ops::Range<usize>| {
            hex.strip_prefix('#')
                .and_then(|h| h.get(range.start.min(h.len())..range.end.min(h.len())))
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0)
        };
        Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
            a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    /// Resize the backing raster to the given size (clears it).
    Resize { width: u32, height: u32 },
    Clear { width: u32, height: u32 },
    /// Independent straight segments in one stroke.
    StrokeLines {
        segments: Vec<[Point; 2]>,
        color: String,
        width: f64,
    },
    StrokePath {
        points: Vec<Point>,
        color: String,
        width: f64,
        join: LineJoin,
    },
    /// Closed polygon filled with a gradient.
    FillPath {
        points: Vec<Point>,
        gradient: LinearGradient,
    },
}

/// Round half up, as a percentage readout (`44.5` -> 45, `-0.5` -> 0).
pub fn round_percent(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
