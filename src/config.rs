// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Atlas configuration, defaults reproduce the reference font.png build

use crate::error::{AtlasError, AtlasResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const IMAGE_SIZE: u32 = 128;
pub const COLUMNS: u32 = 10;
pub const ROWS: u32 = 7;
pub const FILTER_SIZE: u32 = 2;

/// Rows of the atlas, top to bottom. Row 0 ends with a space cell.
pub const CHARS: &str = concat!(
    "yz:-<>![] ",
    "opqrstuvwx",
    "efghijklmn",
    "UVWXYZabcd",
    "KLMNOPQRST",
    "ABCDFEGHIJ",
    "0123456789",
);

pub const SHIP_SCALE: f64 = 1.0;
/// Characters are 5 wide, 9 high and get stretched in the shader,
/// the sprite is squeezed by the inverse ratio beforehand.
pub const SHIP_DISTORT: f64 = 5.0 / 9.0;
pub const SHIP_OFFSET: f64 = 0.25;
pub const TINT: [u8; 3] = [135, 0, 0];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtlasConfig {
    pub image_size: u32,
    pub columns: u32,
    pub rows: u32,
    pub filter_size: u32,
    pub chars: String,

    // Sprite correction
    pub ship_scale: f64,
    pub ship_distort: f64,
    pub ship_offset: f64,
    pub tint: [u8; 3],

    // Resources
    pub font_path: PathBuf,
    pub sprite_path: PathBuf,
    pub output_path: PathBuf,
    pub symbol_map_path: Option<PathBuf>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            image_size: IMAGE_SIZE,
            columns: COLUMNS,
            rows: ROWS,
            filter_size: FILTER_SIZE,
            chars: CHARS.to_string(),
            ship_scale: SHIP_SCALE,
            ship_distort: SHIP_DISTORT,
            ship_offset: SHIP_OFFSET,
            tint: TINT,
            font_path: PathBuf::from("bedstead.ttf"),
            sprite_path: PathBuf::from("ship.png"),
            output_path: PathBuf::from("font.png"),
            symbol_map_path: None,
        }
    }
}

impl AtlasConfig {
    pub fn from_toml_str(content: &str) -> AtlasResult<Self> {
        toml::from_str(content).map_err(|e| AtlasError::Config(format!("invalid TOML: {}", e)))
    }

    pub fn from_toml_file(path: &Path) -> AtlasResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AtlasError::resource(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Grid capacity in cells, wide enough for any u32 grid
    pub fn capacity(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Monospace point size, leaves filter_size pixels of margin per cell
    pub fn font_size(&self) -> i64 {
        (self.image_size / self.rows.max(1)) as i64 - self.filter_size as i64
    }

    pub fn cell_width(&self) -> f32 {
        self.image_size as f32 / self.columns as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.image_size as f32 / self.rows as f32
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if self.image_size == 0 {
            return Err(AtlasError::Config("image_size must be positive".to_string()));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(AtlasError::Config(format!(
                "grid must have at least one cell, got {}x{}",
                self.columns, self.rows
            )));
        }
        let count = self.chars.chars().count();
        if count as u64 > self.capacity() {
            return Err(AtlasError::Config(format!(
                "{} characters do not fit in a {}x{} grid ({} cells)",
                count,
                self.columns,
                self.rows,
                self.capacity()
            )));
        }
        if self.font_size() <= 0 {
            return Err(AtlasError::Config(format!(
                "cell height {} leaves no room for glyphs with filter size {}",
                self.image_size / self.rows,
                self.filter_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_build() {
        let cfg = AtlasConfig::default();
        assert_eq!(cfg.chars.chars().count(), 70);
        assert_eq!(cfg.capacity(), 70);
        assert_eq!(cfg.font_size(), 16);
        assert!((cfg.cell_width() - 12.8).abs() < 1e-6);
        assert!((cfg.cell_height() - 128.0 / 7.0).abs() < 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_overfull_charset_rejected() {
        let cfg = AtlasConfig {
            columns: 5,
            rows: 2,
            chars: "ABCDEFGHIJK".to_string(),
            ..AtlasConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AtlasError::Config(_))));
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let cfg = AtlasConfig {
            columns: 70000,
            rows: 70000,
            image_size: 140000,
            ..AtlasConfig::default()
        };
        assert_eq!(cfg.capacity(), 4_900_000_000);
        // 2 px rows minus the filter margin
        assert!(matches!(cfg.validate(), Err(AtlasError::Config(_))));

        let cfg = AtlasConfig {
            image_size: 700000,
            ..cfg
        };
        assert_eq!(cfg.font_size(), 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_font_size_rejected() {
        let cfg = AtlasConfig {
            image_size: 16,
            rows: 8,
            columns: 1,
            chars: "A".to_string(),
            filter_size: 2,
            ..AtlasConfig::default()
        };
        assert_eq!(cfg.font_size(), 0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let cfg = AtlasConfig::from_toml_str(
            r#"
image_size = 256
tint = [0, 200, 10]
output_path = "out/atlas.png"
"#,
        )
        .unwrap();
        assert_eq!(cfg.image_size, 256);
        assert_eq!(cfg.tint, [0, 200, 10]);
        assert_eq!(cfg.output_path, PathBuf::from("out/atlas.png"));
        assert_eq!(cfg.columns, COLUMNS);
        assert_eq!(cfg.chars, CHARS);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            AtlasConfig::from_toml_str("image_size = \"big\""),
            Err(AtlasError::Config(_))
        ));
        assert!(matches!(
            AtlasConfig::from_toml_str("no_such_key = 1"),
            Err(AtlasError::Config(_))
        ));
    }
}
