use wgpu::util::DeviceExt;

use crate::capture::CapturedImage;
use crate::foundation::core::Size;
use crate::foundation::error::{GenieError, GenieResult};
use crate::render::mesh::GridMesh;
use crate::render::shader::{FRAGMENT_WGSL, VERTEX_WGSL, WarpUniforms};
use crate::render::target::{FrameRGBA, WarpTarget};

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

/// Whether a headless adapter can be acquired on this machine.
pub fn can_use_gpu() -> bool {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .is_ok()
}

/// `Uniforms` block of [`VERTEX_WGSL`], padded to 16-byte alignment.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct UniformBlock {
    resolution: [f32; 2],
    size: [f32; 2],
    origin_local: [f32; 2],
    direction: [f32; 2],
    neck: [f32; 2],
    release_range: [f32; 2],
    curve_strength: f32,
    progress: f32,
    _pad: [f32; 2],
}

impl From<WarpUniforms> for UniformBlock {
    fn from(u: WarpUniforms) -> Self {
        Self {
            resolution: u.resolution,
            size: u.size,
            origin_local: u.origin_local,
            direction: u.direction,
            neck: u.neck,
            release_range: u.release_range,
            curve_strength: u.curve_strength,
            progress: u.progress,
            _pad: [0.0; 2],
        }
    }
}

/// Buffers and bindings owned by one playback.
struct PlaybackResources {
    positions: wgpu::Buffer,
    uvs: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    uniforms: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    static_uniforms: WarpUniforms,
}

impl PlaybackResources {
    fn destroy(self) {
        self.positions.destroy();
        self.uvs.destroy();
        self.indices.destroy();
        self.uniforms.destroy();
        self.texture.destroy();
    }
}

/// Offscreen `wgpu` surface running the WGSL warp pair.
pub struct WgpuWarpTarget {
    size: Size,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    surface: wgpu::Texture,
    surface_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    readback_bytes_per_row: u32,
    playback: Option<PlaybackResources>,
}

impl WgpuWarpTarget {
    pub fn new(size: Size) -> GenieResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                GenieError::gpu("no gpu adapter available")
            }
            other => GenieError::gpu(format!("wgpu request_adapter failed: {other:?}")),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("genie_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| GenieError::gpu(format!("wgpu request_device failed: {e:?}")))?;

        let bytes_per_row_unpadded = size
            .w
            .checked_mul(4)
            .ok_or_else(|| GenieError::gpu("warp surface width overflow"))?;
        let readback_bytes_per_row =
            align_to(bytes_per_row_unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let readback_size = u64::from(readback_bytes_per_row)
            .checked_mul(u64::from(size.h))
            .ok_or_else(|| GenieError::gpu("readback buffer size overflow"))?;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("genie_readback"),
            size: readback_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let surface = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("genie_surface"),
            size: extent(size.w, size.h),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let surface_view = surface.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("genie_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("genie_warp_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("genie_warp_vs"),
            source: wgpu::ShaderSource::Wgsl(VERTEX_WGSL.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("genie_warp_fs"),
            source: wgpu::ShaderSource::Wgsl(FRAGMENT_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("genie_warp_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("genie_warp_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRS,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &UV_ATTRS,
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::debug!(w = size.w, h = size.h, "wgpu warp target ready");

        Ok(Self {
            size,
            device,
            queue,
            pipeline,
            bind_group_layout,
            sampler,
            surface,
            surface_view,
            readback,
            readback_bytes_per_row,
            playback: None,
        })
    }

    fn upload_texture(&self, image: &CapturedImage) -> wgpu::Texture {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("genie_snapshot"),
            size: extent(image.width, image.height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba8_premul,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            extent(image.width, image.height),
        );
        texture
    }
}

impl WarpTarget for WgpuWarpTarget {
    fn prepare(
        &mut self,
        mesh: &GridMesh,
        image: &CapturedImage,
        uniforms: &WarpUniforms,
    ) -> GenieResult<()> {
        if image.width == 0 || image.height == 0 {
            return Err(GenieError::gpu("snapshot is empty"));
        }
        if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
            return Err(GenieError::gpu("snapshot byte length mismatch"));
        }
        self.release();

        let positions = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("genie_positions"),
            contents: bytemuck::cast_slice(&mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uvs = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("genie_uvs"),
            contents: bytemuck::cast_slice(&mesh.uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("genie_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("genie_uniforms"),
            contents: bytemuck::bytes_of(&UniformBlock::from(*uniforms)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture = self.upload_texture(image);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("genie_warp_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let index_count = u32::try_from(mesh.index_count())
            .map_err(|_| GenieError::gpu("mesh index count overflow"))?;
        self.playback = Some(PlaybackResources {
            positions,
            uvs,
            indices,
            index_count,
            uniforms: uniform_buffer,
            texture,
            bind_group,
            static_uniforms: *uniforms,
        });
        Ok(())
    }

    fn draw(&mut self, progress: f32) -> GenieResult<()> {
        let res = self
            .playback
            .as_ref()
            .ok_or_else(|| GenieError::gpu("draw before prepare"))?;
        self.queue.write_buffer(
            &res.uniforms,
            0,
            bytemuck::bytes_of(&UniformBlock::from(
                res.static_uniforms.with_progress(progress),
            )),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("genie_warp_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("genie_warp_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.surface_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &res.bind_group, &[]);
            rp.set_vertex_buffer(0, res.positions.slice(..));
            rp.set_vertex_buffer(1, res.uvs.slice(..));
            rp.set_index_buffer(res.indices.slice(..), wgpu::IndexFormat::Uint32);
            rp.draw_indexed(0..res.index_count, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn release(&mut self) {
        if let Some(res) = self.playback.take() {
            res.destroy();
        }
    }

    fn read_pixels(&mut self) -> GenieResult<FrameRGBA> {
        let (width, height) = (self.size.w, self.size.h);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("genie_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.surface,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.readback_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            extent(width, height),
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| GenieError::gpu(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| GenieError::gpu("readback channel closed"))?
            .map_err(|e| GenieError::gpu(format!("readback map failed: {e:?}")))?;

        let row_bytes = width as usize * 4;
        let mut data = Vec::with_capacity(row_bytes * height as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(self.readback_bytes_per_row as usize) {
                data.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.readback.unmap();

        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    fn live_resources(&self) -> usize {
        // vertex, uv, index and uniform buffers plus the snapshot texture
        if self.playback.is_some() { 5 } else { 0 }
    }

    fn size(&self) -> Size {
        self.size
    }
}

impl Drop for WgpuWarpTarget {
    fn drop(&mut self) {
        self.release();
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

#[cfg(test)]
#[path = "../../tests/unit/render/gpu.rs"]
mod tests;
