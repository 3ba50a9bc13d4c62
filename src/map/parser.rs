//! Map parsing functionality for converting raw maze layouts into tile grids.

use crate::error::ParseError;

/// Classification of one maze tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    /// Walkable tile that starts with a pellet.
    Path,
    /// Walkable tile with nothing on it.
    Empty,
    PowerPellet,
    /// Ghost pen interior.
    Pen,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        self != TileKind::Wall
    }
}

/// Parsed tiles in row-major order.
#[derive(Debug)]
pub struct ParsedLayout {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
}

/// Parser for converting raw layouts into structured tile data.
pub struct LayoutParser;

impl LayoutParser {
    /// Parses a single layout character into a tile kind.
    pub fn parse_character(c: char) -> Option<TileKind> {
        match c {
            '1' => Some(TileKind::Wall),
            '0' => Some(TileKind::Path),
            '2' => Some(TileKind::Empty),
            '3' => Some(TileKind::PowerPellet),
            '4' => Some(TileKind::Pen),
            _ => None,
        }
    }

    /// Parses a raw layout, one string per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty, has rows of different lengths, contains
    /// unknown characters, or has a non-wall tile on its border.
    pub fn parse_layout(rows: &[&str]) -> Result<ParsedLayout, ParseError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (z, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: z,
                    expected: width,
                    found,
                });
            }

            for (x, character) in row.chars().enumerate() {
                let tile = Self::parse_character(character).ok_or(ParseError::UnknownCharacter { character, x, z })?;
                let on_border = x == 0 || z == 0 || x == width - 1 || z == height - 1;
                if on_border && tile != TileKind::Wall {
                    return Err(ParseError::UnsealedBorder { x, z });
                }
                tiles.push(tile);
            }
        }

        Ok(ParsedLayout { width, height, tiles })
    }
}
