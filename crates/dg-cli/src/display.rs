//! Glyph system for terminal rendering
//!
//! Provides both classic ASCII and Unicode block glyphs.

use crossterm::style::Color;
use strum::{Display, EnumString};

/// Available graphics modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase")]
pub enum GraphicsMode {
    /// Classic ASCII characters.
    #[default]
    Classic,
    /// Unicode block characters.
    Fancy,
}

impl GraphicsMode {
    pub fn glyphs(self) -> Box<dyn GlyphSet> {
        match self {
            GraphicsMode::Classic => Box::new(ClassicGlyphs),
            GraphicsMode::Fancy => Box::new(FancyGlyphs),
        }
    }
}

/// What occupies one cell of the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    /// Room left out of the corridor network
    Ordinary,
    /// Primary room joined by the spanning tree
    Hub,
    /// Ordinary room promoted because a corridor crosses it
    Connector,
    Corridor,
}

impl Tile {
    pub fn color(self) -> Option<Color> {
        match self {
            Tile::Empty | Tile::Ordinary => None,
            Tile::Hub => Some(Color::Red),
            Tile::Connector => Some(Color::Blue),
            Tile::Corridor => Some(Color::Magenta),
        }
    }
}

/// Set of glyphs used for rendering map features.
pub trait GlyphSet: Send + Sync {
    fn tile_char(&self, tile: Tile) -> char;
}

/// Plain ASCII glyph set.
pub struct ClassicGlyphs;

impl GlyphSet for ClassicGlyphs {
    fn tile_char(&self, tile: Tile) -> char {
        match tile {
            Tile::Empty => ' ',
            Tile::Ordinary => '#',
            Tile::Hub => 'P',
            Tile::Connector => 'C',
            Tile::Corridor => '.',
        }
    }
}

/// Unicode block glyph set.
pub struct FancyGlyphs;

impl GlyphSet for FancyGlyphs {
    fn tile_char(&self, tile: Tile) -> char {
        match tile {
            Tile::Empty => ' ',
            Tile::Ordinary => '░',
            Tile::Hub => '█',
            Tile::Connector => '▓',
            Tile::Corridor => '·',
        }
    }
}
