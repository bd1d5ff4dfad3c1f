//! Element snapshot boundary.
//!
//! The rasteriser itself is a host collaborator behind [`Rasterize`]. This module owns the
//! sizing contract (`round(css * pixel_ratio)` device pixels) and the premultiplied pixel format
//! handed to warp targets.

use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{OperationId, Size};
use crate::foundation::error::{GenieError, GenieResult};

/// Host rasteriser for one element.
pub trait Rasterize {
    /// Element box size in CSS pixels.
    fn css_size(&self) -> (f64, f64);

    /// Snapshot at `scale` device pixels per CSS pixel, straight-alpha RGBA8.
    fn rasterize(&self, scale: f64) -> GenieResult<image::RgbaImage>;
}

/// Snapshot ready for texture upload: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Ratio the snapshot was taken at (already sanitised).
    pub pixel_ratio: f64,
}

impl CapturedImage {
    /// Wrap a straight-alpha image, premultiplying its pixels.
    pub fn from_rgba(img: image::RgbaImage, pixel_ratio: f64) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            pixel_ratio,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Premultiplied texel at `(x, y)`, clamped to the edge.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Request for an asynchronous snapshot, carrying the operation it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureTicket {
    pub op: OperationId,
    pub pixel_ratio: f64,
    pub css_width: f64,
    pub css_height: f64,
}

impl CaptureTicket {
    /// Device-pixel size the resolved image must have.
    pub fn target_size(&self) -> Size {
        target_pixel_size(self.css_width, self.css_height, self.pixel_ratio)
    }
}

/// Finite positive ratios pass through; anything else becomes `1`.
pub fn sanitize_pixel_ratio(pixel_ratio: f64) -> f64 {
    if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    }
}

/// `max(1, round(max(1, round(css)) * pr))` per axis.
pub fn target_pixel_size(css_width: f64, css_height: f64, pixel_ratio: f64) -> Size {
    let pr = sanitize_pixel_ratio(pixel_ratio);
    let axis = |css: f64| -> u32 {
        let css = if css.is_finite() { css.round().max(1.0) } else { 1.0 };
        (css * pr).round().clamp(1.0, f64::from(u32::MAX)) as u32
    };
    Size::new(axis(css_width), axis(css_height))
}

/// Snapshot `element` at `pixel_ratio`, resampling to the contract size when the rasteriser
/// returns something else. Rasteriser failures propagate unchanged.
#[tracing::instrument(skip(element))]
pub fn capture_element_to_image(
    element: &dyn Rasterize,
    pixel_ratio: f64,
) -> GenieResult<CapturedImage> {
    let pr = sanitize_pixel_ratio(pixel_ratio);
    let (css_w, css_h) = element.css_size();
    let target = target_pixel_size(css_w, css_h, pr);

    let mut img = element.rasterize(pr)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(GenieError::capture("rasteriser returned an empty image"));
    }
    if img.dimensions() != (target.w, target.h) {
        tracing::debug!(
            got_w = img.width(),
            got_h = img.height(),
            want_w = target.w,
            want_h = target.h,
            "resampling snapshot"
        );
        img = image::imageops::resize(
            &img,
            target.w,
            target.h,
            image::imageops::FilterType::Triangle,
        );
    }
    Ok(CapturedImage::from_rgba(img, pr))
}

/// A fixed bitmap standing in for an element (CLI input, tests).
#[derive(Clone, Debug)]
pub struct BitmapElement {
    pub css_width: f64,
    pub css_height: f64,
    pub pixels: image::RgbaImage,
}

impl BitmapElement {
    /// Decode encoded image bytes; the CSS size defaults to the pixel size over `pixel_ratio`.
    pub fn decode(bytes: &[u8], pixel_ratio: f64) -> GenieResult<Self> {
        let pixels = image::load_from_memory(bytes)
            .context("decode snapshot image")?
            .to_rgba8();
        let pr = sanitize_pixel_ratio(pixel_ratio);
        Ok(Self {
            css_width: f64::from(pixels.width()) / pr,
            css_height: f64::from(pixels.height()) / pr,
            pixels,
        })
    }
}

impl Rasterize for BitmapElement {
    fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    fn rasterize(&self, _scale: f64) -> GenieResult<image::RgbaImage> {
        Ok(self.pixels.clone())
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../tests/unit/capture.rs"]
mod tests;
