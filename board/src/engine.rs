use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::images::{ImageLoader, LoadListener, PieceImageCache};
use crate::layout::{BoardLayout, Point};
use crate::position::{Grid, Square};
use crate::render::{Surface, paint_pieces, paint_squares};
use crate::selection::Selection;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Move-candidate collaborator: called with `(file, rank)` of the clicked
/// square, returns destination `(rank, file)` pairs.
pub type MoveCandidates = dyn Fn(usize, usize) -> Vec<(i32, i32)>;

/// What a click did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An occupied square was selected with this many candidates installed.
    Selected { square: Square, candidates: usize },
    /// The click landed on an empty square; selection is cleared.
    Cleared,
}

/// Which layers a render pass repainted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Painted {
    pub squares: bool,
    pub pieces: bool,
}

/// Core board state: everything that doesn't depend on paint targets.
///
/// Separated from `Board` so it can be tested without surfaces or images.
#[derive(Debug, Clone)]
pub struct BoardCore {
    position: String,
    grid: Grid,
    selection: Selection,
    layout: BoardLayout,
    squares_stale: bool,
    pieces_stale: bool,
}

impl BoardCore {
    #[must_use]
    pub fn new(position: &str) -> Self {
        Self {
            position: position.to_owned(),
            grid: Grid::expand(position),
            selection: Selection::default(),
            layout: BoardLayout::default(),
            squares_stale: true,
            pieces_stale: true,
        }
    }

    // --- Data inputs ---

    /// Replace the displayed position. Returns `false` if it is unchanged.
    pub fn set_position(&mut self, position: &str) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position.to_owned();
        self.grid = Grid::expand(position);
        self.pieces_stale = true;
        true
    }

    /// Adopt a new layout. Returns `false` if it is unchanged.
    pub fn set_layout(&mut self, layout: BoardLayout) -> bool {
        if self.layout == layout {
            return false;
        }
        self.layout = layout;
        self.squares_stale = true;
        self.pieces_stale = true;
        true
    }

    // --- Input ---

    /// Resolve a click and update the selection.
    ///
    /// Never touches the position; the board has no authority to move pieces.
    pub fn click(&mut self, point: Point, moves: &MoveCandidates) -> ClickOutcome {
        let square = self.layout.square_at(point);
        let before = self.selection.clone();

        let outcome = if self.grid.is_occupied(square) {
            self.selection.select(square, moves(square.file(), square.rank()));
            ClickOutcome::Selected { square, candidates: self.selection.candidates().len() }
        } else {
            self.selection.clear();
            ClickOutcome::Cleared
        };

        if self.selection != before {
            self.squares_stale = true;
        }
        outcome
    }

    // --- Queries ---

    #[must_use]
    pub fn position(&self) -> &str {
        &self.position
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    /// Report and reset which layers need repainting.
    pub fn take_stale(&mut self) -> (bool, bool) {
        let stale = (self.squares_stale, self.pieces_stale);
        self.squares_stale = false;
        self.pieces_stale = false;
        stale
    }
}

/// The full board renderer. Wraps `BoardCore` and owns both paint targets.
///
/// The squares surface and the pieces surface are always resized together
/// with the same layout, so they stay pixel-aligned.
pub struct Board<S, L>
where
    S: Surface,
    L: ImageLoader<Image = S::Image>,
{
    pub core: BoardCore,
    moves: Box<MoveCandidates>,
    images: Rc<PieceImageCache<L>>,
    squares: S,
    pieces: S,
    waiting: Rc<Cell<usize>>,
    image_arrived: Rc<Cell<bool>>,
    redraw_hook: Rc<RefCell<Option<Box<dyn Fn()>>>>,
    _listener: Rc<LoadListener>,
}

impl<S, L> Board<S, L>
where
    S: Surface,
    L: ImageLoader<Image = S::Image>,
{
    /// Create a board showing `position`.
    ///
    /// `moves` is called with `(file, rank)` whenever an occupied square is
    /// clicked. `images` may be shared with other boards.
    pub fn new<F>(position: &str, moves: F, images: Rc<PieceImageCache<L>>, squares: S, pieces: S) -> Self
    where
        F: Fn(usize, usize) -> Vec<(i32, i32)> + 'static,
    {
        let waiting = Rc::new(Cell::new(0));
        let image_arrived = Rc::new(Cell::new(false));
        let redraw_hook: Rc<RefCell<Option<Box<dyn Fn()>>>> = Rc::new(RefCell::new(None));

        let listener: Rc<LoadListener> = {
            let waiting = Rc::clone(&waiting);
            let image_arrived = Rc::clone(&image_arrived);
            let redraw_hook = Rc::clone(&redraw_hook);
            Rc::new(move |_letter| {
                if waiting.get() == 0 {
                    return;
                }
                image_arrived.set(true);
                if let Some(hook) = redraw_hook.borrow().as_ref() {
                    hook();
                }
            })
        };
        images.subscribe(&listener);

        Self {
            core: BoardCore::new(position),
            moves: Box::new(moves),
            images,
            squares,
            pieces,
            waiting,
            image_arrived,
            redraw_hook,
            _listener: listener,
        }
    }

    /// Install the callback run when a pending piece image finishes loading.
    ///
    /// Hosts use it to schedule a [`Board::render`]; only the pieces layer
    /// will be repainted.
    pub fn set_redraw_hook<F: Fn() + 'static>(&self, hook: F) {
        *self.redraw_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn set_position(&mut self, position: &str) -> bool {
        self.core.set_position(position)
    }

    /// Fit the board to a new container size.
    ///
    /// Returns `Ok(false)` if the resulting layout is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either surface rejects the new size.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<bool, S::Error> {
        let layout = BoardLayout::fit(width, height, dpr);
        if !self.core.set_layout(layout) {
            return Ok(false);
        }
        self.squares.resize(&layout)?;
        self.pieces.resize(&layout)?;
        Ok(true)
    }

    pub fn click(&mut self, point: Point) -> ClickOutcome {
        self.core.click(point, &*self.moves)
    }

    /// Repaint whichever layers have been invalidated since the last pass.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a surface fails to draw.
    pub fn render(&mut self) -> Result<Painted, S::Error> {
        let (squares, pieces) = self.core.take_stale();
        let pieces = self.image_arrived.replace(false) || pieces;
        let layout = self.core.layout();

        if squares {
            paint_squares(&mut self.squares, &layout, self.core.selection());
        }
        if pieces {
            let waiting = paint_pieces(&mut self.pieces, &layout, self.core.grid(), &self.images)?;
            self.waiting.set(waiting);
        }
        Ok(Painted { squares, pieces })
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.core.selection()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.core.grid()
    }

    #[must_use]
    pub fn layout(&self) -> BoardLayout {
        self.core.layout()
    }

    #[must_use]
    pub fn squares_surface(&self) -> &S {
        &self.squares
    }

    #[must_use]
    pub fn pieces_surface(&self) -> &S {
        &self.pieces
    }
}
