//! Offline rendering of the clip-path driver.
//!
//! Fills the genie clip outline with the snapshot under the same transform and opacity the
//! controller writes on the content node, so one frame of the CSS path can be inspected as
//! pixels.

use std::sync::Arc;

use crate::capture::{CapturedImage, sanitize_pixel_ratio};
use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{GenieError, GenieResult};
use crate::geometry::clip::ClipShape;
use crate::geometry::metrics::GenieMetrics;
use crate::geometry::transform::GenieTransform;
use crate::render::target::FrameRGBA;

pub struct ClipPreview {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    paint: vello_cpu::Image,
    width: u16,
    height: u16,
    pixel_ratio: f64,
}

impl ClipPreview {
    /// Surface matches the snapshot's device-pixel size.
    pub fn new(image: &CapturedImage) -> GenieResult<Self> {
        let (w, h) = dims_u16(image.width, image.height)?;
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, w, h)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            paint,
            width: w,
            height: h,
            pixel_ratio: sanitize_pixel_ratio(image.pixel_ratio),
        })
    }

    /// Render one frame: snapshot clipped to `clip`, under `transform` about the origin point.
    pub fn render(
        &mut self,
        metrics: &GenieMetrics,
        clip: &ClipShape,
        transform: GenieTransform,
        opacity: f64,
    ) -> GenieResult<FrameRGBA> {
        let pr = self.pixel_ratio;
        let opacity = opacity.clamp(0.0, 1.0) as f32;

        self.ctx.reset();
        self.ctx.set_transform(affine_to_cpu(
            Affine::scale(pr) * transform.to_affine(metrics.origin_local()),
        ));
        self.ctx
            .set_paint_transform(affine_to_cpu(Affine::scale(1.0 / pr)));
        self.ctx.set_paint(self.paint.clone());
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_path(&bezpath_to_cpu(&clip.to_bez_path()));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        self.ctx.flush();

        clear_pixmap(&mut self.pixmap);
        self.ctx.render_to_pixmap(&mut self.pixmap);

        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn dims_u16(width: u32, height: u32) -> GenieResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GenieError::validation("preview width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GenieError::validation("preview height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(GenieError::validation("preview surface is empty"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(bytes: &[u8], w: u16, h: u16) -> GenieResult<vello_cpu::Pixmap> {
    if bytes.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(GenieError::validation("snapshot byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/clip_preview.rs"]
mod tests;
