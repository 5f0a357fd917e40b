// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Grid layout: assigns each character a row-major cell of the atlas

use crate::config::AtlasConfig;
use crate::error::AtlasResult;
use log::{debug, warn};
use std::collections::BTreeMap;

/// One character placed in the atlas grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCell {
    pub ch: char,
    pub index: u32,
    pub column: u32,
    pub row: u32,
    /// Pixel-space origin of the cell (top-left), may be fractional
    pub x: f32,
    pub y: f32,
}

/// Character to cell index table, later duplicates win
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellIndexMap {
    ids: BTreeMap<char, u32>,
}

impl CellIndexMap {
    pub fn get(&self, ch: char) -> Option<u32> {
        self.ids.get(&ch).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entries ordered by character
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.ids.iter().map(|(&c, &i)| (c, i))
    }
}

#[derive(Debug, Clone)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub font_size: u32,
    pub image_size: u32,
    cells: Vec<GlyphCell>,
    index_map: CellIndexMap,
}

impl GridLayout {
    /// Fails with a configuration error when the character set
    /// overflows the grid.
    pub fn new(cfg: &AtlasConfig) -> AtlasResult<Self> {
        cfg.validate()?;

        let cell_width = cfg.cell_width();
        let cell_height = cfg.cell_height();
        let mut cells = Vec::with_capacity(cfg.chars.chars().count());
        let mut index_map = CellIndexMap::default();

        for (i, ch) in cfg.chars.chars().enumerate() {
            let index = i as u32;
            let column = index % cfg.columns;
            let row = index / cfg.columns;
            let cell = GlyphCell {
                ch,
                index,
                column,
                row,
                x: column as f32 * cell_width,
                y: row as f32 * cell_height,
            };
            if let Some(prev) = index_map.ids.insert(ch, index) {
                warn!("duplicate character {:?}: cell {} replaces {}", ch, index, prev);
            }
            cells.push(cell);
        }

        debug!(
            "grid {}x{}, cell {:.2}x{:.2}px, {} glyphs, {} distinct",
            cfg.columns,
            cfg.rows,
            cell_width,
            cell_height,
            cells.len(),
            index_map.len()
        );

        Ok(Self {
            columns: cfg.columns,
            rows: cfg.rows,
            cell_width,
            cell_height,
            font_size: cfg.font_size() as u32,
            image_size: cfg.image_size,
            cells,
            index_map,
        })
    }

    /// Cells in character-set order
    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    pub fn index_map(&self) -> &CellIndexMap {
        &self.index_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;

    fn cfg(chars: &str, columns: u32, rows: u32) -> AtlasConfig {
        AtlasConfig {
            chars: chars.to_string(),
            columns,
            rows,
            ..AtlasConfig::default()
        }
    }

    #[test]
    fn test_reference_layout() {
        let layout = GridLayout::new(&AtlasConfig::default()).unwrap();
        let map = layout.index_map();
        assert_eq!(map.len(), 70);
        assert_eq!(map.get('y'), Some(0));
        assert_eq!(map.get(' '), Some(9));
        assert_eq!(map.get('o'), Some(10));
        assert_eq!(map.get('0'), Some(60));
        assert_eq!(map.get('9'), Some(69));
        assert_eq!(map.get('~'), None);
        assert_eq!(layout.font_size, 16);
    }

    #[test]
    fn test_cell_origins() {
        let layout = GridLayout::new(&AtlasConfig::default()).unwrap();
        let cells = layout.cells();

        let c = cells[13];
        assert_eq!((c.column, c.row), (3, 1));
        assert!((c.x - 3.0 * 12.8).abs() < 1e-4);
        assert!((c.y - 128.0 / 7.0).abs() < 1e-4);

        let last = cells[69];
        assert_eq!((last.column, last.row), (9, 6));
        assert!((last.x - 115.2).abs() < 1e-4);
        assert!((last.y - 6.0 * 128.0 / 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_index_is_row_major_position() {
        let layout = GridLayout::new(&cfg("abcdefg", 3, 3)).unwrap();
        for (i, cell) in layout.cells().iter().enumerate() {
            assert_eq!(cell.index, i as u32);
            assert_eq!(cell.index, cell.row * 3 + cell.column);
            assert_eq!(layout.index_map().get(cell.ch), Some(cell.index));
        }
    }

    #[test]
    fn test_later_duplicate_wins() {
        let layout = GridLayout::new(&cfg("abca", 2, 2)).unwrap();
        let map = layout.index_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get('a'), Some(3));
        assert_eq!(map.get('b'), Some(1));
        assert_eq!(layout.cells().len(), 4);
    }

    #[test]
    fn test_capacity_exceeded() {
        let err = GridLayout::new(&cfg("abcde", 2, 2)).unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }

    #[test]
    fn test_empty_charset() {
        let layout = GridLayout::new(&cfg("", 2, 2)).unwrap();
        assert!(layout.index_map().is_empty());
        assert!(layout.cells().is_empty());
    }

    #[test]
    fn test_huge_grid_allocates_per_char() {
        let cfg = AtlasConfig {
            columns: 70000,
            rows: 70000,
            image_size: 700000,
            ..AtlasConfig::default()
        };
        let layout = GridLayout::new(&cfg).unwrap();
        assert_eq!(layout.cells().len(), 70);
        assert_eq!(layout.cells()[69].row, 0);
        assert_eq!(layout.cells()[69].column, 69);
    }
}
