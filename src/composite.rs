// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Sprite compositing: aspect correction, tint and merge with the field

use crate::config::AtlasConfig;
use crate::error::{AtlasError, AtlasResult};
use crate::field::FieldImage;
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use log::{debug, info};
use std::path::Path;

/// Tinted sprite in red, distance in green
pub type OutputImage = RgbaImage;

/// Inverse-mapping affine transform, destination pixel to source point:
///
/// ```text
/// x' = a * x + b * y + c
/// y' = d * x + e * y + f
/// ```
///
/// Destination pixels are mapped at their centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    /// Squeeze horizontally by `distort` and shift by a fraction of the
    /// sprite width, so the glyph-shaped stretch in the shader restores it.
    pub fn ship(width: u32, scale: f64, distort: f64, offset: f64) -> Self {
        Self {
            a: scale * distort,
            b: 0.0,
            c: width as f64 * offset,
            d: 0.0,
            e: scale,
            f: 0.0,
        }
    }

    /// Source coordinates sampled for destination pixel (x, y)
    pub fn map(&self, x: u32, y: u32) -> (f64, f64) {
        let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
        (
            self.a * cx + self.b * cy + self.c,
            self.d * cx + self.e * cy + self.f,
        )
    }

    /// Nearest-neighbour resample into an image of the same size,
    /// samples falling outside the source become transparent black.
    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        let (w, h) = src.dimensions();
        ImageBuffer::from_fn(w, h, |x, y| {
            let (sx, sy) = self.map(x, y);
            match (nearest(sx, w), nearest(sy, h)) {
                (Some(ix), Some(iy)) => *src.get_pixel(ix, iy),
                _ => Rgba([0, 0, 0, 0]),
            }
        })
    }
}

/// Truncate towards zero, anything below 0 is out of range
#[inline]
fn nearest(v: f64, len: u32) -> Option<u32> {
    if v < 0.0 {
        return None;
    }
    let i = v as u64;
    if i < len as u64 {
        Some(i as u32)
    } else {
        None
    }
}

pub fn load_sprite(path: &Path) -> AtlasResult<RgbaImage> {
    let img = image::open(path).map_err(|e| AtlasError::resource(path, e))?;
    let img = img.to_rgba8();
    debug!("sprite {}: {}x{}", path.display(), img.width(), img.height());
    Ok(img)
}

/// Scale colour by alpha so transparent pixels carry no colour into a
/// filtered resize
fn premultiply(img: &RgbaImage) -> RgbaImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        let a = p[3] as u32;
        for c in p.0.iter_mut().take(3) {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
    out
}

fn unpremultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let a = p[3] as u32;
        for c in p.0.iter_mut().take(3) {
            *c = if a == 0 {
                0
            } else {
                ((*c as u32 * 255 + a / 2) / a).min(255) as u8
            };
        }
    }
}

/// Aspect-correct the sprite and scale it to the atlas size.
///
/// The resize filters premultiplied colour, fully transparent pixels
/// come out as transparent black.
pub fn prepare_sprite(sprite: &RgbaImage, cfg: &AtlasConfig) -> RgbaImage {
    let transform = AffineTransform::ship(
        sprite.width(),
        cfg.ship_scale,
        cfg.ship_distort,
        cfg.ship_offset,
    );
    let corrected = transform.apply(sprite);

    if corrected.dimensions() == (cfg.image_size, cfg.image_size) {
        corrected
    } else {
        let mut resized = imageops::resize(
            &premultiply(&corrected),
            cfg.image_size,
            cfg.image_size,
            imageops::FilterType::CatmullRom,
        );
        unpremultiply(&mut resized);
        resized
    }
}

/// Multiply blend with a flat opaque colour, `src * tint / 255`
pub fn multiply(img: &RgbaImage, tint: [u8; 3]) -> RgbaImage {
    let tint = [tint[0], tint[1], tint[2], 255];
    let mut out = img.clone();
    for p in out.pixels_mut() {
        for (c, t) in p.0.iter_mut().zip(tint) {
            *c = (*c as u32 * t as u32 / 255) as u8;
        }
    }
    out
}

/// Saturating per-channel add of two equally sized images
pub fn add(lhs: &RgbaImage, rhs: &RgbaImage) -> AtlasResult<RgbaImage> {
    if lhs.dimensions() != rhs.dimensions() {
        return Err(AtlasError::Config(format!(
            "cannot add {:?} and {:?} images",
            lhs.dimensions(),
            rhs.dimensions()
        )));
    }
    let mut out = lhs.clone();
    for (p, q) in out.pixels_mut().zip(rhs.pixels()) {
        for (c, o) in p.0.iter_mut().zip(q.0) {
            *c = c.saturating_add(o);
        }
    }
    Ok(out)
}

/// Final atlas: tinted sprite plus distance field
pub fn composite(
    sprite: &RgbaImage,
    field: &FieldImage,
    cfg: &AtlasConfig,
) -> AtlasResult<OutputImage> {
    let prepared = prepare_sprite(sprite, cfg);
    let tinted = multiply(&prepared, cfg.tint);
    let out = add(&tinted, field)?;
    info!(
        "Composited {}x{} sprite with tint {:?}",
        sprite.width(),
        sprite.height(),
        cfg.tint
    );
    Ok(out)
}
