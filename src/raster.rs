// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Glyph mask rasterization using fontdue

use crate::error::{AtlasError, AtlasResult};
use crate::layout::GridLayout;
use image::{ImageBuffer, Rgba, RgbaImage};
use log::{debug, info};
use std::path::Path;

/// Red channel carries glyph ink, everything else is fixed
pub type MaskImage = RgbaImage;

/// Solid "outside" colour, not transparent
pub const MASK_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Coverage bitmap of a single glyph, positioned relative to the
/// top-left of the text origin (left edge, ascender line).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub left: i32,
    pub top: i32,
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.coverage.is_empty()
    }
}

/// Renders one glyph at a fixed point size
pub trait GlyphRasterizer {
    fn rasterize(&self, ch: char) -> GlyphBitmap;
}

/// Monospace font loaded from disk
pub struct FontRasterizer {
    font: fontdue::Font,
    size: f32,
    ascent: f32,
}

impl FontRasterizer {
    pub fn load(path: &Path, size: u32) -> AtlasResult<Self> {
        let data = std::fs::read(path).map_err(|e| AtlasError::resource(path, e))?;
        Self::from_bytes(&data, size).map_err(|e| match e {
            AtlasError::ResourceLoad { reason, .. } => AtlasError::resource(path, reason),
            other => other,
        })
    }

    pub fn from_bytes(data: &[u8], size: u32) -> AtlasResult<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| AtlasError::resource(Path::new("<font>"), e))?;
        let size = size as f32;
        let ascent = font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8);
        debug!("font loaded: size {}px, ascent {:.2}px", size, ascent);
        Ok(Self { font, size, ascent })
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, ch: char) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(ch, self.size);
        // fontdue puts ymin at the bitmap bottom, relative to the baseline
        let glyph_top = metrics.ymin + metrics.height as i32;
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin,
            top: self.ascent.round() as i32 - glyph_top,
            coverage,
        }
    }
}

/// Draw every glyph of the layout into a fresh mask.
pub fn rasterize_mask(layout: &GridLayout, rasterizer: &dyn GlyphRasterizer) -> MaskImage {
    let size = layout.image_size;
    let mut mask: MaskImage = ImageBuffer::from_pixel(size, size, MASK_BACKGROUND);

    let mut drawn = 0;
    for cell in layout.cells() {
        let glyph = rasterizer.rasterize(cell.ch);
        if glyph.is_empty() {
            continue;
        }
        draw_glyph(
            &mut mask,
            &glyph,
            cell.x.floor() as i32,
            cell.y.floor() as i32,
        );
        drawn += 1;
    }

    info!("Rasterized {} glyphs into {}x{} mask", drawn, size, size);
    mask
}

/// Overlapping ink keeps the strongest coverage
fn draw_glyph(mask: &mut MaskImage, glyph: &GlyphBitmap, origin_x: i32, origin_y: i32) {
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    for gy in 0..glyph.height {
        for gx in 0..glyph.width {
            let px = origin_x + glyph.left + gx as i32;
            let py = origin_y + glyph.top + gy as i32;
            if px < 0 || px >= w || py < 0 || py >= h {
                continue;
            }
            let ink = glyph.coverage[gy * glyph.width + gx];
            if ink == 0 {
                continue;
            }
            let p = mask.get_pixel_mut(px as u32, py as u32);
            p[0] = p[0].max(ink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AtlasConfig;

    /// Fills a fixed block for every non-space character
    struct BlockRasterizer;

    impl GlyphRasterizer for BlockRasterizer {
        fn rasterize(&self, ch: char) -> GlyphBitmap {
            if ch == ' ' {
                return GlyphBitmap::default();
            }
            GlyphBitmap {
                width: 3,
                height: 4,
                left: 1,
                top: 2,
                coverage: vec![255; 12],
            }
        }
    }

    fn layout(chars: &str) -> GridLayout {
        let cfg = AtlasConfig {
            image_size: 32,
            columns: 2,
            rows: 2,
            filter_size: 2,
            chars: chars.to_string(),
            ..AtlasConfig::default()
        };
        GridLayout::new(&cfg).unwrap()
    }

    #[test]
    fn test_blank_mask_is_opaque_black() {
        let mask = rasterize_mask(&layout("    "), &BlockRasterizer);
        assert_eq!(mask.dimensions(), (32, 32));
        assert!(mask.pixels().all(|p| *p == MASK_BACKGROUND));
    }

    #[test]
    fn test_glyph_lands_in_its_cell() {
        let mask = rasterize_mask(&layout(" b"), &BlockRasterizer);
        // cell 1 origin is (16, 0), block covers x 17..20, y 2..6
        for y in 0..32 {
            for x in 0..32 {
                let inside = (17..20).contains(&x) && (2..6).contains(&y);
                let p = mask.get_pixel(x, y);
                assert_eq!(p[0], if inside { 255 } else { 0 }, "at {},{}", x, y);
                assert_eq!((p[1], p[2], p[3]), (0, 0, 255));
            }
        }
    }

    #[test]
    fn test_glyph_clipped_at_canvas_edge() {
        struct Wide;
        impl GlyphRasterizer for Wide {
            fn rasterize(&self, _: char) -> GlyphBitmap {
                GlyphBitmap {
                    width: 40,
                    height: 1,
                    left: -4,
                    top: 0,
                    coverage: vec![200; 40],
                }
            }
        }
        let mask = rasterize_mask(&layout("a"), &Wide);
        assert_eq!(mask.get_pixel(0, 0)[0], 200);
        assert_eq!(mask.get_pixel(31, 0)[0], 200);
        assert_eq!(mask.get_pixel(0, 1)[0], 0);
    }

    #[test]
    fn test_bad_font_is_resource_error() {
        let err = FontRasterizer::from_bytes(b"not a font", 16)
            .err()
            .expect("garbage must not parse");
        assert!(matches!(err, AtlasError::ResourceLoad { .. }));

        let err = FontRasterizer::load(Path::new("/nonexistent/bedstead.ttf"), 16)
            .err()
            .expect("missing file must fail");
        match err {
            AtlasError::ResourceLoad { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/bedstead.ttf"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
