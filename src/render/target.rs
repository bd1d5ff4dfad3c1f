use crate::capture::CapturedImage;
use crate::foundation::core::Size;
use crate::foundation::error::{GenieError, GenieResult};
use crate::render::mesh::GridMesh;
use crate::render::shader::WarpUniforms;

/// A rendered surface as premultiplied RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha for encoders that expect it.
    pub fn to_straight(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Drawing surface for one mesh-warp playback.
///
/// A playback calls `prepare` once, `draw` per frame and `release` exactly once; targets must
/// also tolerate repeated `release` calls.
pub trait WarpTarget {
    /// Upload the mesh, the snapshot texture and the static uniforms.
    fn prepare(
        &mut self,
        mesh: &GridMesh,
        image: &CapturedImage,
        uniforms: &WarpUniforms,
    ) -> GenieResult<()>;

    /// Clear the surface and draw the mesh at `progress`.
    fn draw(&mut self, progress: f32) -> GenieResult<()>;

    /// Drop every per-playback resource.
    fn release(&mut self);

    fn read_pixels(&mut self) -> GenieResult<FrameRGBA>;

    /// Per-playback resources currently held (mesh buffers, texture, uniforms).
    fn live_resources(&self) -> usize;

    fn size(&self) -> Size;
}

impl<T: WarpTarget + ?Sized> WarpTarget for Box<T> {
    fn prepare(
        &mut self,
        mesh: &GridMesh,
        image: &CapturedImage,
        uniforms: &WarpUniforms,
    ) -> GenieResult<()> {
        (**self).prepare(mesh, image, uniforms)
    }

    fn draw(&mut self, progress: f32) -> GenieResult<()> {
        (**self).draw(progress)
    }

    fn release(&mut self) {
        (**self).release();
    }

    fn read_pixels(&mut self) -> GenieResult<FrameRGBA> {
        (**self).read_pixels()
    }

    fn live_resources(&self) -> usize {
        (**self).live_resources()
    }

    fn size(&self) -> Size {
        (**self).size()
    }
}

/// Available warp target kinds.
///
/// - `Cpu` is always available.
/// - `Gpu` requires the `gpu` cargo feature and a usable adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Cpu,
    Gpu,
}

/// Create a warp target of `size` device pixels.
pub fn create_target(kind: BackendKind, size: Size) -> GenieResult<Box<dyn WarpTarget>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuWarpTarget::new(size))),
        BackendKind::Gpu => {
            #[cfg(feature = "gpu")]
            {
                Ok(Box::new(crate::render::gpu::WgpuWarpTarget::new(size)?))
            }
            #[cfg(not(feature = "gpu"))]
            {
                let _ = size;
                Err(GenieError::gpu(
                    "gpu backend requested but crate was built without the `gpu` feature",
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
