// RustPixel
// copyright zipxing@hotmail.com 2022～2025

//! Offline generator for a glyph distance-field atlas.
//!
//! A fixed character set is laid out row-major on a COLUMNS x ROWS grid,
//! each glyph is rasterized into a mask (red channel), an approximate
//! distance field is computed over the mask (green channel), and the
//! result is merged with an aspect-corrected, tinted sprite (red
//! channel) into a single RGBA texture.
//!
//! The stages run strictly in order, each one owning the image it
//! produces:
//!
//! ```text
//! layout -> raster -> field -> composite -> atlas file
//! ```
//!
//! The character to cell table built by the layout stage is returned
//! with the atlas and can be exported as a JSON symbol map.

pub mod atlas;
pub mod composite;
pub mod config;
pub mod error;
pub mod field;
pub mod layout;
pub mod log;
pub mod raster;

pub use atlas::{build_atlas, build_symbol_map, generate, save_atomic, Atlas};
pub use config::AtlasConfig;
pub use error::{AtlasError, AtlasResult};
pub use layout::{CellIndexMap, GlyphCell, GridLayout};
pub use raster::{FontRasterizer, GlyphBitmap, GlyphRasterizer};
