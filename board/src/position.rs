//! Position strings and the 8×8 occupancy grid they describe.
//!
//! A position is eight `/`-separated rank records. Each record is a run of
//! piece letters and digits, where a digit `N` stands for `N` empty squares.
//! Rank 0 is the first record (top row as drawn) and file 0 is the leftmost
//! column.
//!
//! Two readers are provided. [`Grid::expand`] is what the renderer uses: it
//! never fails and degrades malformed records into truncated or padded rows.
//! [`Grid::parse`] is strict and reports the first structural problem.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of ranks and files on the board.
pub const BOARD_SIZE: usize = 8;

/// Conventional opening layout.
pub const STANDARD_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Lowercase letters with a defined image mapping.
const KNOWN_PIECES: [char; 8] = ['p', 'n', 'b', 'r', 'f', 'q', 'k', 'c'];

/// Side a piece belongs to, derived from the letter's case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Single-letter prefix used in asset names.
    #[must_use]
    pub fn prefix(self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }
}

/// A piece letter as it appears in a position string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece(char);

impl Piece {
    /// Wrap an ASCII letter. Returns `None` for anything else.
    #[must_use]
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_alphabetic().then_some(Self(letter))
    }

    #[must_use]
    pub fn letter(self) -> char {
        self.0
    }

    #[must_use]
    pub fn color(self) -> Color {
        if self.0.is_ascii_uppercase() { Color::White } else { Color::Black }
    }

    /// Whether this letter names one of the pieces that has artwork.
    #[must_use]
    pub fn is_known(self) -> bool {
        KNOWN_PIECES.contains(&self.0.to_ascii_lowercase())
    }
}

/// A board coordinate. Both components are always in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rank: usize, file: usize) -> Option<Self> {
        // Both are below 8 here, so the narrowing is lossless.
        if rank < BOARD_SIZE && file < BOARD_SIZE {
            Some(Self { rank: rank as u8, file: file as u8 })
        } else {
            None
        }
    }

    #[must_use]
    pub fn rank(self) -> usize {
        usize::from(self.rank)
    }

    #[must_use]
    pub fn file(self) -> usize {
        usize::from(self.file)
    }

    /// Light squares are those where `rank + file` is even.
    #[must_use]
    pub fn is_light(self) -> bool {
        (self.rank + self.file) % 2 == 0
    }
}

/// `(rank, file)` pairs as produced by move-candidate collaborators.
impl TryFrom<(i32, i32)> for Square {
    type Error = PositionError;

    fn try_from((rank, file): (i32, i32)) -> Result<Self, Self::Error> {
        let square = match (usize::try_from(rank), usize::try_from(file)) {
            (Ok(r), Ok(f)) => Self::new(r, f),
            _ => None,
        };
        square.ok_or(PositionError::SquareOutOfRange { rank, file })
    }
}

/// Structural problems reported by [`Grid::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),
    #[error("rank {rank} covers {squares} squares, expected 8")]
    RankWidth { rank: usize, squares: usize },
    #[error("rank {rank} has invalid character {ch:?}")]
    InvalidChar { rank: usize, ch: char },
    #[error("rank {rank} splits an empty run into adjacent digits")]
    AdjacentDigits { rank: usize },
    #[error("square ({rank}, {file}) is off the board")]
    SquareOutOfRange { rank: i32, file: i32 },
}

/// Row-major 8×8 occupancy, rank 0 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Grid {
    /// Expand a position string, tolerating any malformation.
    ///
    /// Only the placement field is read, so a full FEN record works too.
    /// Ranks beyond the eighth are ignored, missing ranks stay empty, and
    /// anything that would land past file 7 is dropped.
    #[must_use]
    pub fn expand(position: &str) -> Self {
        let mut grid = Self::default();
        let placement = position.split_whitespace().next().unwrap_or_default();

        for (rank, record) in placement.split('/').take(BOARD_SIZE).enumerate() {
            let mut file = 0usize;
            for ch in record.chars() {
                if let Some(run) = ch.to_digit(10) {
                    file = file.saturating_add(run as usize);
                } else if let Some(piece) = Piece::new(ch) {
                    if file < BOARD_SIZE {
                        grid.cells[rank][file] = Some(piece);
                    }
                    file = file.saturating_add(1);
                }
            }
        }
        grid
    }

    /// Parse a position string, rejecting anything that is not exactly 8×8
    /// in canonical run-length form. Whatever parses collapses back to the
    /// same placement through [`Grid::to_position`].
    ///
    /// # Errors
    ///
    /// Returns the first [`PositionError`] encountered.
    pub fn parse(position: &str) -> Result<Self, PositionError> {
        let placement = position.split_whitespace().next().unwrap_or_default();
        let records: Vec<&str> = placement.split('/').collect();
        if records.len() != BOARD_SIZE {
            return Err(PositionError::RankCount(records.len()));
        }

        for (rank, record) in records.iter().enumerate() {
            let mut squares = 0usize;
            let mut after_digit = false;
            for ch in record.chars() {
                match ch {
                    '1'..='8' if after_digit => return Err(PositionError::AdjacentDigits { rank }),
                    '1'..='8' => {
                        squares += ch as usize - '0' as usize;
                        after_digit = true;
                    }
                    c if c.is_ascii_alphabetic() => {
                        squares += 1;
                        after_digit = false;
                    }
                    c => return Err(PositionError::InvalidChar { rank, ch: c }),
                }
            }
            if squares != BOARD_SIZE {
                return Err(PositionError::RankWidth { rank, squares });
            }
        }

        Ok(Self::expand(placement))
    }

    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.rank()][square.file()]
    }

    #[must_use]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Occupied cells in rank-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(rank, row)| {
            row.iter().enumerate().filter_map(move |(file, cell)| {
                let piece = (*cell)?;
                Square::new(rank, file).map(|sq| (sq, piece))
            })
        })
    }

    /// Collapse back into canonical form, run-length encoding empty squares.
    #[must_use]
    pub fn to_position(&self) -> String {
        let mut out = String::with_capacity(64);
        for (rank, row) in self.cells.iter().enumerate() {
            if rank > 0 {
                out.push('/');
            }
            let mut empty = 0u32;
            for cell in row {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            out.extend(char::from_digit(empty, 10));
                            empty = 0;
                        }
                        out.push(piece.letter());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.extend(char::from_digit(empty, 10));
            }
        }
        out
    }

    /// Place or remove a piece.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.rank()][square.file()] = piece;
    }
}

impl FromStr for Grid {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Text diagram, one rank per line, `.` for empty squares.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', Piece::letter))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
