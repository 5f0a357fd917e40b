// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Atlas pipeline: layout -> mask -> distance field -> composite -> file

use crate::composite::{composite, load_sprite, OutputImage};
use crate::config::AtlasConfig;
use crate::error::{AtlasError, AtlasResult};
use crate::field::distance_field;
use crate::layout::{CellIndexMap, GridLayout};
use crate::raster::{rasterize_mask, FontRasterizer, GlyphRasterizer};
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Generated atlas with its character table
#[derive(Debug, Clone)]
pub struct Atlas {
    pub image: OutputImage,
    pub layout: GridLayout,
}

impl Atlas {
    pub fn cells(&self) -> &CellIndexMap {
        self.layout.index_map()
    }
}

/// Run every stage in memory. Each stage reads the previous image and
/// returns a new one.
pub fn build_atlas(
    cfg: &AtlasConfig,
    rasterizer: &dyn GlyphRasterizer,
    sprite: &RgbaImage,
) -> AtlasResult<Atlas> {
    let layout = GridLayout::new(cfg)?;
    let mask = rasterize_mask(&layout, rasterizer);
    let field = distance_field(&mask, cfg.filter_size);
    let image = composite(sprite, &field, cfg)?;
    Ok(Atlas { image, layout })
}

/// Load resources, build the atlas and write the output files.
pub fn generate(cfg: &AtlasConfig) -> AtlasResult<Atlas> {
    cfg.validate()?;

    info!(
        "Generating {}x{} atlas, {} chars in {}x{} cells, font size {}",
        cfg.image_size,
        cfg.image_size,
        cfg.chars.chars().count(),
        cfg.columns,
        cfg.rows,
        cfg.font_size()
    );

    let font = FontRasterizer::load(&cfg.font_path, cfg.font_size() as u32)?;
    info!("Font: {}", cfg.font_path.display());
    let sprite = load_sprite(&cfg.sprite_path)?;
    info!("Sprite: {}", cfg.sprite_path.display());

    let atlas = build_atlas(cfg, &font, &sprite)?;

    save_atomic(&atlas.image, &cfg.output_path)?;
    info!("Saved {}", cfg.output_path.display());

    if let Some(map_path) = &cfg.symbol_map_path {
        let map = build_symbol_map(&atlas.layout);
        let text = serde_json::to_string_pretty(&map)
            .map_err(|e| AtlasError::io(map_path, e.into()))?;
        write_atomic(map_path, |tmp| Ok(fs::write(tmp, text.as_bytes())?))?;
        info!("Saved {}", map_path.display());
    }

    Ok(atlas)
}

/// Describe the cell grid for a text renderer
pub fn build_symbol_map(layout: &GridLayout) -> Value {
    let symbols: String = layout.cells().iter().map(|c| c.ch).collect();
    let cells: serde_json::Map<String, Value> = layout
        .index_map()
        .iter()
        .map(|(ch, index)| (ch.to_string(), json!(index)))
        .collect();

    json!({
        "version": 1,
        "image_size": layout.image_size,
        "columns": layout.columns,
        "rows": layout.rows,
        "cell_width": layout.cell_width,
        "cell_height": layout.cell_height,
        "font_size": layout.font_size,
        "symbols": symbols,
        "cells": cells
    })
}

/// Encode next to the destination and rename over it, the output is
/// either complete or untouched.
pub fn save_atomic(img: &RgbaImage, path: &Path) -> AtlasResult<()> {
    let format = ImageFormat::from_path(path).map_err(|e| AtlasError::from(e).with_path(path))?;
    write_atomic(path, |tmp| Ok(img.save_with_format(tmp, format)?))
}

fn write_atomic<F>(path: &Path, write: F) -> AtlasResult<()>
where
    F: FnOnce(&Path) -> AtlasResult<()>,
{
    let tmp = temp_path(path);
    debug!("writing {} via {}", path.display(), tmp.display());
    let result = write(&tmp).and_then(|_| Ok(fs::rename(&tmp, path)?));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e.with_path(path));
    }
    Ok(())
}

/// Hidden sibling, same directory keeps the rename atomic
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
