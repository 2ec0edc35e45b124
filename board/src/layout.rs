#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::position::{BOARD_SIZE, Square};

/// A point in CSS pixels relative to the board's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Shrink the rectangle by `margin` on every side.
    #[must_use]
    pub fn inset(self, margin: f64) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - 2.0 * margin).max(0.0),
            h: (self.h - 2.0 * margin).max(0.0),
        }
    }
}

/// Board geometry for one container size.
///
/// `side` is in CSS pixels. `dpr` is the device pixel ratio used to size the
/// backing store so strokes stay crisp on dense displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub side: f64,
    pub dpr: f64,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self { side: 0.0, dpr: 1.0 }
    }
}

impl BoardLayout {
    /// Fit a square board into a `width` × `height` container.
    #[must_use]
    pub fn fit(width: f64, height: f64, dpr: f64) -> Self {
        let side = width.min(height);
        let side = if side.is_finite() { side.max(0.0) } else { 0.0 };
        let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
        Self { side, dpr }
    }

    /// Edge length of one square in CSS pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell(&self) -> f64 {
        self.side / BOARD_SIZE as f64
    }

    /// Backing-store size in device pixels (same for width and height).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(&self) -> u32 {
        (self.side * self.dpr).round() as u32
    }

    /// Map a click to the square under it, clamping into the board.
    #[must_use]
    pub fn square_at(&self, point: Point) -> Square {
        let cell = self.cell();
        let file = axis_index(point.x, cell);
        let rank = axis_index(point.y, cell);
        Square::new(rank, file).unwrap_or_default()
    }

    /// Screen rectangle covered by `square`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn square_rect(&self, square: Square) -> Rect {
        let cell = self.cell();
        Rect {
            x: square.file() as f64 * cell,
            y: square.rank() as f64 * cell,
            w: cell,
            h: cell,
        }
    }
}

/// `clamp(floor(v / cell), 0, 7)`, with degenerate cells mapping to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn axis_index(v: f64, cell: f64) -> usize {
    if cell <= 0.0 || !cell.is_finite() || v.is_nan() {
        return 0;
    }
    let idx = (v / cell).floor();
    idx.clamp(0.0, (BOARD_SIZE - 1) as f64) as usize
}
