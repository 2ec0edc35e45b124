//! Selected square and its candidate destinations.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::position::Square;

/// Renderer-owned selection: at most one selected square plus the
/// destinations a move collaborator reported for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Square>,
    candidates: Vec<Square>,
}

impl Selection {
    #[must_use]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Candidate destinations in first-reported order.
    #[must_use]
    pub fn candidates(&self) -> &[Square] {
        &self.candidates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.candidates.is_empty()
    }

    #[must_use]
    pub fn is_candidate(&self, square: Square) -> bool {
        self.candidates.contains(&square)
    }

    /// Select `origin` and install candidates from raw `(rank, file)` pairs.
    ///
    /// Off-board pairs and repeats are dropped; everything else keeps the
    /// order the collaborator returned it in.
    pub fn select<I>(&mut self, origin: Square, raw: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        self.selected = Some(origin);
        self.candidates.clear();
        for pair in raw {
            let Ok(square) = Square::try_from(pair) else {
                tracing::debug!(rank = pair.0, file = pair.1, "dropping off-board candidate");
                continue;
            };
            if !self.candidates.contains(&square) {
                self.candidates.push(square);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.candidates.clear();
    }
}
