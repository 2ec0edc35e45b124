//! Piece image cache.
//!
//! One image per distinct piece letter, created on first reference and kept
//! for the life of the cache. Every board sharing a cache reads the same
//! entries, so a letter's image is loaded at most once no matter how many
//! boards draw it or how often they repaint.
//!
//! Loading is delegated to an [`ImageLoader`]. Completion is reported back
//! through a callback, which marks the entry ready and tells subscribers so
//! they can repaint their piece layer.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::consts::PIECE_ASSET_ROOT;
use crate::position::Piece;

/// Asset path for a piece, e.g. `/pieces/wK.svg`. `None` for letters without artwork.
#[must_use]
pub fn asset_path(piece: Piece) -> Option<String> {
    if !piece.is_known() {
        return None;
    }
    let prefix = piece.color().prefix();
    let letter = piece.letter().to_ascii_uppercase();
    Some(format!("{PIECE_ASSET_ROOT}/{prefix}{letter}.svg"))
}

/// Load progress of one cached image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Callback handed to a loader; `true` on success.
pub type LoadDone = Box<dyn FnOnce(bool)>;

/// Starts image loads for the cache.
pub trait ImageLoader {
    /// Drawable handle for a loaded image.
    type Image;

    /// Begin loading `src`. `done` must be called exactly once, when the
    /// load settles.
    fn begin_load(&self, src: &str, done: LoadDone) -> Self::Image;
}

/// A cached image and its load state.
#[derive(Debug)]
pub struct PieceImage<I> {
    image: I,
    state: Rc<Cell<LoadState>>,
}

impl<I> PieceImage<I> {
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    /// The image, once it has finished loading.
    #[must_use]
    pub fn ready(&self) -> Option<&I> {
        (self.state.get() == LoadState::Ready).then_some(&self.image)
    }
}

/// Listener for load completions; receives the piece letter.
pub type LoadListener = dyn Fn(char);

type Listeners = Rc<RefCell<Vec<Weak<LoadListener>>>>;

/// Get-or-create cache keyed by case-sensitive piece letter.
pub struct PieceImageCache<L: ImageLoader> {
    loader: L,
    entries: RefCell<HashMap<char, Rc<PieceImage<L::Image>>>>,
    listeners: Listeners,
    loads_started: Cell<usize>,
}

impl<L: ImageLoader> PieceImageCache<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: RefCell::new(HashMap::new()),
            listeners: Rc::new(RefCell::new(Vec::new())),
            loads_started: Cell::new(0),
        }
    }

    /// Return the cached entry for `piece`, starting its load on first use.
    ///
    /// Returns `None` for pieces without artwork; those cells stay blank.
    pub fn get_or_create(&self, piece: Piece) -> Option<Rc<PieceImage<L::Image>>> {
        if let Some(entry) = self.entries.borrow().get(&piece.letter()) {
            return Some(Rc::clone(entry));
        }

        let src = asset_path(piece)?;
        let state = Rc::new(Cell::new(LoadState::Pending));
        let done = completion(piece.letter(), Rc::clone(&state), Rc::clone(&self.listeners));

        tracing::debug!(letter = %piece.letter(), %src, "loading piece image");
        self.loads_started.set(self.loads_started.get() + 1);
        let image = self.loader.begin_load(&src, done);

        let entry = Rc::new(PieceImage { image, state });
        self.entries
            .borrow_mut()
            .insert(piece.letter(), Rc::clone(&entry));
        Some(entry)
    }

    /// Register a completion listener. Held weakly: dropping the `Rc`
    /// unsubscribes.
    pub fn subscribe(&self, listener: &Rc<LoadListener>) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(Rc::downgrade(listener));
    }

    /// Number of loads ever started by this cache.
    #[must_use]
    pub fn loads_started(&self) -> usize {
        self.loads_started.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

fn completion(letter: char, state: Rc<Cell<LoadState>>, listeners: Listeners) -> LoadDone {
    Box::new(move |ok| {
        if !ok {
            // Blank cell, no notification.
            tracing::debug!(%letter, "piece image failed to load");
            state.set(LoadState::Failed);
            return;
        }
        state.set(LoadState::Ready);

        // Snapshot first so listeners may subscribe or drop during the call.
        let alive: Vec<Rc<LoadListener>> = listeners
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for listener in alive {
            listener(letter);
        }
    })
}
