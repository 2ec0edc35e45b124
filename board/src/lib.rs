//! Chess board display for prime-chess.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It turns a
//! position string into an 8x8 picture on two stacked canvases, resolves
//! clicks to squares, and highlights the squares a collaborator says the
//! clicked piece may move to. It never moves pieces itself; the position is
//! always supplied from outside.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`position`] | Position strings, pieces, squares, and the 8x8 [`position::Grid`] |
//! | [`layout`] | Square board geometry and pixel/square conversions |
//! | [`selection`] | Selected square plus candidate destinations |
//! | [`images`] | Shared get-or-create piece image cache |
//! | [`render`] | Layer painters over an abstract [`render::Surface`] |
//! | [`engine`] | Top-level [`engine::Board`] and testable [`engine::BoardCore`] |
//! | [`web`] | Canvas surfaces, DOM image loading, and the mounted host |
//! | [`consts`] | Colors, insets, and asset locations |

pub mod consts;
pub mod engine;
pub mod images;
pub mod layout;
pub mod position;
pub mod render;
pub mod selection;
pub mod web;

#[cfg(test)]
mod testing;
