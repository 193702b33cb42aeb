// Filled line chart over a fixed-length sample series.

use super::{DrawOp, GradientStop, LineJoin, LinearGradient, Point, Rgba};

pub const GRID_COLOR: &str = "#383838";
const GRID_ROWS: u32 = 4;
const GRID_COLS: u32 = 6;
const GRID_LINE_WIDTH: f64 = 1.0;
const LINE_WIDTH: f64 = 3.0;
const FILL_ALPHA: f64 = 0.2;

/// Graph raster: backing size plus the size it is currently displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub display_width: u32,
    pub display_height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            display_width: width,
            display_height: height,
        }
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_width = width;
        self.display_height = height;
    }

    /// Matches the backing size to the display size; returns the resize op if they differed.
    fn sync(&mut self) -> Option<DrawOp> {
        if self.width == self.display_width && self.height == self.display_height {
            return None;
        }
        self.width = self.display_width;
        self.height = self.display_height;
        Some(DrawOp::Resize {
            width: self.width,
            height: self.height,
        })
    }
}

/// Sample index -> x across the full width, value -> y with 0% at the bottom.
/// Values are not clamped. A single sample spans the whole width as a flat line.
pub fn polyline(width: f64, height: f64, samples: &[f64]) -> Vec<Point> {
    let y = |v: f64| height - (v / 100.0 * height);
    match samples {
        [] => Vec::new(),
        [only] => vec![Point::new(0.0, y(*only)), Point::new(width, y(*only))],
        _ => {
            let step = width / (samples.len() - 1) as f64;
            samples
                .iter()
                .enumerate()
                .map(|(i, v)| Point::new(i as f64 * step, y(*v)))
                .collect()
        }
    }
}

fn grid(width: f64, height: f64) -> DrawOp {
    let rows = (1..GRID_ROWS).map(|i| {
        let y = height / GRID_ROWS as f64 * i as f64;
        [Point::new(0.0, y), Point::new(width, y)]
    });
    let cols = (1..GRID_COLS).map(|i| {
        let x = width / GRID_COLS as f64 * i as f64;
        [Point::new(x, 0.0), Point::new(x, height)]
    });
    DrawOp::StrokeLines {
        segments: rows.chain(cols).collect(),
        color: GRID_COLOR.into(),
        width: GRID_LINE_WIDTH,
    }
}

pub fn draw_graph(surface: &mut Surface, samples: &[f64], accent: &str) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(5);
    ops.extend(surface.sync());
    ops.push(DrawOp::Clear {
        width: surface.width,
        height: surface.height,
    });

    let (w, h) = (surface.width as f64, surface.height as f64);
    ops.push(grid(w, h));

    let line = polyline(w, h, samples);
    if line.is_empty() {
        return ops;
    }
    ops.push(DrawOp::StrokePath {
        points: line.clone(),
        color: accent.into(),
        width: LINE_WIDTH,
        join: LineJoin::Round,
    });

    let mut area = line;
    area.push(Point::new(w, h));
    area.push(Point::new(0.0, h));
    ops.push(DrawOp::FillPath {
        points: area,
        gradient: LinearGradient {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, h),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Rgba::from_hex(accent, FILL_ALPHA),
                },
                GradientStop {
                    offset: 1.0,
                    color: Rgba::TRANSPARENT,
                },
            ],
        },
    });
    ops
}
