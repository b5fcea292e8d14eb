//! dg-cli: terminal front end for dungeon floor plans

pub mod ascii;
pub mod display;

pub use ascii::AsciiRenderer;
pub use display::{GlyphSet, GraphicsMode, Tile};
