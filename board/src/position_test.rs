use super::*;

const PRIME_POSITION: &str = "cnbqkbnc/pppppppp/8/8/8/8/PPPPPPPP/CNBQKBNC";

fn sq(rank: usize, file: usize) -> Square {
    Square::new(rank, file).expect("square should be on the board")
}

fn rank_letters(grid: &Grid, rank: usize) -> String {
    (0..BOARD_SIZE)
        .map(|file| grid.piece_at(sq(rank, file)).map_or('.', Piece::letter))
        .collect()
}

// =============================================================
// Piece / Color
// =============================================================

#[test]
fn piece_case_decides_color() {
    assert_eq!(Piece::new('K').map(Piece::color), Some(Color::White));
    assert_eq!(Piece::new('k').map(Piece::color), Some(Color::Black));
}

#[test]
fn piece_rejects_non_letters() {
    assert!(Piece::new('3').is_none());
    assert!(Piece::new('/').is_none());
    assert!(Piece::new(' ').is_none());
}

#[test]
fn known_pieces_include_prime_rook_and_c() {
    for letter in ['p', 'n', 'b', 'r', 'f', 'q', 'k', 'c', 'P', 'F', 'C'] {
        assert!(Piece::new(letter).is_some_and(Piece::is_known), "{letter} should be known");
    }
    assert!(!Piece::new('x').is_some_and(Piece::is_known));
}

#[test]
fn color_prefixes() {
    assert_eq!(Color::White.prefix(), 'w');
    assert_eq!(Color::Black.prefix(), 'b');
}

// =============================================================
// Square
// =============================================================

#[test]
fn square_new_rejects_out_of_range() {
    assert!(Square::new(8, 0).is_none());
    assert!(Square::new(0, 8).is_none());
    assert!(Square::new(7, 7).is_some());
}

#[test]
fn square_try_from_pair_is_rank_then_file() {
    let square = Square::try_from((2, 5)).expect("in range");
    assert_eq!(square.rank(), 2);
    assert_eq!(square.file(), 5);
}

#[test]
fn square_try_from_negative_is_error() {
    assert_eq!(
        Square::try_from((-1, 3)),
        Err(PositionError::SquareOutOfRange { rank: -1, file: 3 })
    );
    assert!(Square::try_from((0, 8)).is_err());
}

#[test]
fn square_light_dark_checkerboard() {
    assert!(sq(0, 0).is_light());
    assert!(!sq(0, 1).is_light());
    assert!(!sq(1, 0).is_light());
    assert!(sq(7, 7).is_light());
}

// =============================================================
// expand
// =============================================================

#[test]
fn expand_prime_position_back_rank() {
    let grid = Grid::expand(PRIME_POSITION);
    assert_eq!(rank_letters(&grid, 0), "cnbqkbnc");
    assert_eq!(rank_letters(&grid, 7), "CNBQKBNC");
}

#[test]
fn expand_prime_position_middle_ranks_empty() {
    let grid = Grid::expand(PRIME_POSITION);
    for rank in 2..=5 {
        assert_eq!(rank_letters(&grid, rank), "........", "rank {rank}");
    }
}

#[test]
fn expand_accepts_full_fen_record() {
    let grid = Grid::expand("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(grid, Grid::expand(STANDARD_POSITION));
}

#[test]
fn expand_short_rank_is_padded() {
    let grid = Grid::expand("ppp/8/8/8/8/8/8/8");
    assert_eq!(rank_letters(&grid, 0), "ppp.....");
}

#[test]
fn expand_long_rank_is_truncated() {
    let grid = Grid::expand("pppppppppppp/8/8/8/8/8/8/8");
    assert_eq!(rank_letters(&grid, 0), "pppppppp");
}

#[test]
fn expand_digit_overflow_does_not_spill() {
    let grid = Grid::expand("7pp/9p/8/8/8/8/8/8");
    assert_eq!(rank_letters(&grid, 0), ".......p");
    assert_eq!(rank_letters(&grid, 1), "........");
    assert_eq!(rank_letters(&grid, 2), "........");
}

#[test]
fn expand_missing_ranks_stay_empty() {
    let grid = Grid::expand("rnbqkbnr");
    assert_eq!(rank_letters(&grid, 0), "rnbqkbnr");
    assert_eq!(grid.pieces().count(), 8);
}

#[test]
fn expand_extra_ranks_are_ignored() {
    let grid = Grid::expand("8/8/8/8/8/8/8/8/pppppppp");
    assert_eq!(grid.pieces().count(), 0);
}

#[test]
fn expand_skips_punctuation_and_keeps_unknown_letters() {
    let grid = Grid::expand("x-y6/8/8/8/8/8/8/8");
    assert_eq!(rank_letters(&grid, 0), "xy......");
}

#[test]
fn expand_empty_string_is_empty_board() {
    assert_eq!(Grid::expand(""), Grid::default());
}

// =============================================================
// parse
// =============================================================

#[test]
fn parse_accepts_valid_position() {
    let grid: Grid = PRIME_POSITION.parse().expect("valid position");
    assert_eq!(grid, Grid::expand(PRIME_POSITION));
}

#[test]
fn parse_rejects_wrong_rank_count() {
    assert_eq!(Grid::parse("8/8/8"), Err(PositionError::RankCount(3)));
}

#[test]
fn parse_rejects_short_rank() {
    assert_eq!(
        Grid::parse("8/7/8/8/8/8/8/8"),
        Err(PositionError::RankWidth { rank: 1, squares: 7 })
    );
}

#[test]
fn parse_rejects_bad_character() {
    assert_eq!(
        Grid::parse("8/8/8/3?4/8/8/8/8"),
        Err(PositionError::InvalidChar { rank: 3, ch: '?' })
    );
}

#[test]
fn parse_rejects_adjacent_digits() {
    assert_eq!(
        Grid::parse("8/8/8/8/8/8/8/44"),
        Err(PositionError::AdjacentDigits { rank: 7 })
    );
    assert_eq!(
        Grid::parse("8/8/pp11pppp/8/8/8/8/8"),
        Err(PositionError::AdjacentDigits { rank: 2 })
    );
}

#[test]
fn parse_rejects_nine_digit() {
    assert!(Grid::parse("9/8/8/8/8/8/8/8").is_err());
}

// =============================================================
// to_position / pieces / display
// =============================================================

#[test]
fn to_position_round_trips_known_layouts() {
    for position in [STANDARD_POSITION, PRIME_POSITION, "8/8/8/8/8/8/8/8", "4k3/8/8/3pP3/8/8/8/R3K2R"] {
        assert_eq!(Grid::expand(position).to_position(), position);
    }
}

#[test]
fn lenient_expand_canonicalises_split_digit_runs() {
    let split = "44/8/8/8/8/8/8/8";
    assert!(Grid::parse(split).is_err());
    assert_eq!(Grid::expand(split).to_position(), "8/8/8/8/8/8/8/8");
}

#[test]
fn pieces_are_rank_major() {
    let grid = Grid::expand("7k/8/8/8/8/8/8/K7");
    let found: Vec<_> = grid.pieces().map(|(s, p)| (s.rank(), s.file(), p.letter())).collect();
    assert_eq!(found, vec![(0, 7, 'k'), (7, 0, 'K')]);
}

#[test]
fn set_places_and_clears() {
    let mut grid = Grid::default();
    grid.set(sq(4, 4), Piece::new('Q'));
    assert!(grid.is_occupied(sq(4, 4)));
    assert_eq!(grid.to_position(), "8/8/8/8/4Q3/8/8/8");
    grid.set(sq(4, 4), None);
    assert!(!grid.is_occupied(sq(4, 4)));
}

#[test]
fn display_draws_dots_for_empty() {
    let text = Grid::expand("7k/8/8/8/8/8/8/K7").to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], ".......k");
    assert_eq!(lines[7], "K.......");
}
