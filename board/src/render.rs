//! Rendering: paints the two board layers onto abstract surfaces.
//!
//! The board is drawn on two stacked surfaces. The squares layer holds the
//! checkerboard plus selection overlays and only changes when the selection
//! or size does. The pieces layer holds piece images and only changes when
//! the position, size, or an image load does. Keeping them apart means a
//! selection change never re-draws images and vice versa.
//!
//! Painters take read-only views of board state and produce pixels through
//! [`Surface`]; they never mutate application state. All coordinates are in
//! CSS pixels, and each surface applies the device pixel ratio itself when
//! it is resized.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{
    CANDIDATE_INSET_PX, CANDIDATE_LINE_WIDTH_PX, CANDIDATE_STROKE, DARK_SQUARE, LIGHT_SQUARE, SELECTED_FILL,
};
use crate::images::{ImageLoader, LoadState, PieceImageCache};
use crate::layout::{BoardLayout, Rect};
use crate::position::{BOARD_SIZE, Grid, Square};
use crate::selection::Selection;

/// A paint target. Implementations must keep drawing in CSS pixels after
/// [`Surface::resize`] by scaling for `layout.dpr` internally.
pub trait Surface {
    type Image;
    type Error;

    /// Size the backing store to `layout` and reset the transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the new size or transform.
    fn resize(&mut self, layout: &BoardLayout) -> Result<(), Self::Error>;

    /// Erase the full board area.
    fn clear(&mut self, layout: &BoardLayout);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);

    /// Draw `image` scaled into `rect`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image cannot be drawn.
    fn draw_image(&mut self, image: &Self::Image, rect: Rect) -> Result<(), Self::Error>;
}

/// Paint the checkerboard, selection highlight, and candidate outlines.
pub fn paint_squares<S: Surface>(surface: &mut S, layout: &BoardLayout, selection: &Selection) {
    surface.clear(layout);

    for rank in 0..BOARD_SIZE {
        for file in 0..BOARD_SIZE {
            let Some(square) = Square::new(rank, file) else {
                continue;
            };
            let color = if square.is_light() { LIGHT_SQUARE } else { DARK_SQUARE };
            surface.fill_rect(layout.square_rect(square), color);
        }
    }

    if let Some(selected) = selection.selected() {
        surface.fill_rect(layout.square_rect(selected), SELECTED_FILL);
    }

    for &candidate in selection.candidates() {
        let rect = layout.square_rect(candidate).inset(CANDIDATE_INSET_PX);
        surface.stroke_rect(rect, CANDIDATE_STROKE, CANDIDATE_LINE_WIDTH_PX);
    }
}

/// Paint every occupied cell whose image has loaded.
///
/// Cells whose image is still pending, failed, or has no artwork are left
/// blank. Returns how many pieces were skipped for a pending load, so the
/// caller knows a later completion will need another pass.
///
/// # Errors
///
/// Returns `Err` if the surface fails to draw an image.
pub fn paint_pieces<S, L>(
    surface: &mut S,
    layout: &BoardLayout,
    grid: &Grid,
    images: &PieceImageCache<L>,
) -> Result<usize, S::Error>
where
    S: Surface,
    L: ImageLoader<Image = S::Image>,
{
    surface.clear(layout);

    let mut waiting = 0;
    for (square, piece) in grid.pieces() {
        let Some(entry) = images.get_or_create(piece) else {
            continue;
        };
        match entry.ready() {
            Some(image) => surface.draw_image(image, layout.square_rect(square))?,
            None if entry.state() == LoadState::Pending => waiting += 1,
            None => {}
        }
    }
    Ok(waiting)
}
