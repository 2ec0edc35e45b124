//! Shared constants for the board crate.

// ── Colors ──────────────────────────────────────────────────────

/// Fill for squares where `rank + file` is even.
pub const LIGHT_SQUARE: &str = "#EEEED2";

/// Fill for the remaining squares.
pub const DARK_SQUARE: &str = "#769656";

/// Translucent overlay painted on the selected square.
pub const SELECTED_FILL: &str = "rgba(255, 221, 0, 0.45)";

/// Outline color for candidate destinations.
pub const CANDIDATE_STROKE: &str = "rgba(20, 85, 30, 0.85)";

// ── Geometry ────────────────────────────────────────────────────

/// Inset from the square edge for candidate outlines, in CSS pixels.
pub const CANDIDATE_INSET_PX: f64 = 3.0;

/// Candidate outline width, in CSS pixels.
pub const CANDIDATE_LINE_WIDTH_PX: f64 = 3.0;

// ── Assets ──────────────────────────────────────────────────────

/// Directory holding `{w,b}{LETTER}.svg` piece artwork.
pub const PIECE_ASSET_ROOT: &str = "/pieces";
