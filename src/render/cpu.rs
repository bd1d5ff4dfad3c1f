use crate::capture::CapturedImage;
use crate::foundation::core::Size;
use crate::foundation::error::{GenieError, GenieResult};
use crate::render::mesh::GridMesh;
use crate::render::shader::{ALPHA_DISCARD, WarpUniforms, WarpedVertex, warp_vertex};
use crate::render::target::{FrameRGBA, WarpTarget};

/// Software warp target: runs [`warp_vertex`] per vertex, then rasterises textured triangles
/// with bilinear sampling and premultiplied source-over blending.
pub struct CpuWarpTarget {
    size: Size,
    pixels: Vec<u8>,
    prepared: Option<Prepared>,
}

struct Prepared {
    mesh: GridMesh,
    texture: CapturedImage,
    uniforms: WarpUniforms,
    scratch: Vec<WarpedVertex>,
}

impl CpuWarpTarget {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![0; size.area() as usize * 4],
            prepared: None,
        }
    }
}

impl WarpTarget for CpuWarpTarget {
    fn prepare(
        &mut self,
        mesh: &GridMesh,
        image: &CapturedImage,
        uniforms: &WarpUniforms,
    ) -> GenieResult<()> {
        if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
            return Err(GenieError::gpu("snapshot byte length mismatch"));
        }
        if image.width == 0 || image.height == 0 {
            return Err(GenieError::gpu("snapshot is empty"));
        }
        self.prepared = Some(Prepared {
            mesh: mesh.clone(),
            texture: image.clone(),
            uniforms: *uniforms,
            scratch: Vec::with_capacity(mesh.vertex_count()),
        });
        Ok(())
    }

    fn draw(&mut self, progress: f32) -> GenieResult<()> {
        let prepared = self
            .prepared
            .as_mut()
            .ok_or_else(|| GenieError::gpu("draw before prepare"))?;
        self.pixels.fill(0);

        let uniforms = prepared.uniforms.with_progress(progress);
        prepared.scratch.clear();
        for (pos, uv) in prepared.mesh.positions.iter().zip(&prepared.mesh.uvs) {
            prepared.scratch.push(warp_vertex(&uniforms, *pos, *uv));
        }

        for [a, b, c] in prepared.mesh.triangles() {
            let tri = [
                prepared.scratch[a as usize],
                prepared.scratch[b as usize],
                prepared.scratch[c as usize],
            ];
            raster_triangle(&mut self.pixels, self.size, &tri, &prepared.texture);
        }
        Ok(())
    }

    fn release(&mut self) {
        self.prepared = None;
    }

    fn read_pixels(&mut self) -> GenieResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: self.size.w,
            height: self.size.h,
            data: self.pixels.clone(),
            premultiplied: true,
        })
    }

    fn live_resources(&self) -> usize {
        // mesh + texture + uniform block
        if self.prepared.is_some() { 3 } else { 0 }
    }

    fn size(&self) -> Size {
        self.size
    }
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Tie-break for pixel centres exactly on an edge. Antisymmetric, so a shared edge is owned by
/// exactly one of its two triangles.
fn owns_edge(a: [f32; 2], b: [f32; 2]) -> bool {
    b[1] > a[1] || (b[1] == a[1] && b[0] < a[0])
}

fn covered(w: f32, a: [f32; 2], b: [f32; 2]) -> bool {
    w > 0.0 || (w == 0.0 && owns_edge(a, b))
}

fn raster_triangle(dst: &mut [u8], size: Size, tri: &[WarpedVertex; 3], tex: &CapturedImage) {
    let mut v = *tri;
    let mut area = edge(v[0].position, v[1].position, v[2].position);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        v.swap(1, 2);
        area = -area;
    }
    let [p0, p1, p2] = [v[0].position, v[1].position, v[2].position];

    let min_x = p0[0].min(p1[0]).min(p2[0]).floor().max(0.0) as u32;
    let min_y = p0[1].min(p1[1]).min(p2[1]).floor().max(0.0) as u32;
    let max_x = (p0[0].max(p1[0]).max(p2[0]).ceil().max(0.0) as u32).min(size.w);
    let max_y = (p0[1].max(p1[1]).max(p2[1]).ceil().max(0.0) as u32).min(size.h);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];
            let w0 = edge(p1, p2, p);
            let w1 = edge(p2, p0, p);
            let w2 = edge(p0, p1, p);
            if !(covered(w0, p1, p2) && covered(w1, p2, p0) && covered(w2, p0, p1)) {
                continue;
            }
            let (b0, b1, b2) = (w0 / area, w1 / area, w2 / area);
            let s = b0 * v[0].tex[0] + b1 * v[1].tex[0] + b2 * v[2].tex[0];
            let t = b0 * v[0].tex[1] + b1 * v[1].tex[1] + b2 * v[2].tex[1];
            let src = sample_bilinear(tex, s, t);
            if f32::from(src[3]) <= ALPHA_DISCARD * 255.0 {
                continue;
            }
            let i = ((y * size.w + x) * 4) as usize;
            let px = over([dst[i], dst[i + 1], dst[i + 2], dst[i + 3]], src);
            dst[i..i + 4].copy_from_slice(&px);
        }
    }
}

type PremulRgba8 = [u8; 4];

/// Linear filtering with clamp-to-edge addressing over premultiplied texels.
fn sample_bilinear(tex: &CapturedImage, s: f32, t: f32) -> PremulRgba8 {
    let x = s.clamp(0.0, 1.0) * tex.width as f32 - 0.5;
    let y = t.clamp(0.0, 1.0) * tex.height as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let a = tex.texel(x0, y0);
    let b = tex.texel(x0 + 1, y0);
    let c = tex.texel(x0, y0 + 1);
    let d = tex.texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for (k, o) in out.iter_mut().enumerate() {
        let top = f32::from(a[k]) * (1.0 - fx) + f32::from(b[k]) * fx;
        let bottom = f32::from(c[k]) * (1.0 - fx) + f32::from(d[k]) * fx;
        *o = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Premultiplied source-over.
fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
