use std::collections::HashMap;

use anyhow::{bail, Context as _, Result};
use vizline_engine::render::{Backend, RenderData, TextureHandle};
use vizline_engine::{Config, DrawMode, Vertex};

use crate::pipeline::{atlas_layout, command_layout, Pipelines, DEPTH_FORMAT};
use crate::uniforms::{uniform_stride, CommandUniform};

// ── targets ───────────────────────────────────────────────────────────────

struct ColorTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

struct DepthTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

struct FontTexture {
    // kept alive for the bind group
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Device objects created by `init` and dropped by `term`.
struct Resources {
    vertex_buffer: wgpu::Buffer,
    max_vertices: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_stride: u64,
    max_commands: usize,
    command_bind_group: wgpu::BindGroup,
    atlas_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: Pipelines,
    // staging for per-command uniforms, reused across frames
    uniform_bytes: Vec<u8>,
}

// ── backend ───────────────────────────────────────────────────────────────

/// [`Backend`] that draws recorded frames with wgpu.
///
/// Frames are drawn on top of the current color target (`LoadOp::Load`);
/// the depth buffer is owned by the backend and cleared every frame.
/// Call [`set_target`](Self::set_target) before each `render`.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    target: Option<ColorTarget>,
    depth: Option<DepthTarget>,
    resources: Option<Resources>,
    fonts: HashMap<u64, FontTexture>,
    next_texture: u64,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            format,
            target: None,
            depth: None,
            resources: None,
            fonts: HashMap::new(),
            next_texture: 0,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Sets the color attachment for the next frames. `view` must have the
    /// backend's format.
    pub fn set_target(&mut self, view: wgpu::TextureView, width: u32, height: u32) {
        self.target = Some(ColorTarget { view, width, height });
    }

    pub fn font_texture_count(&self) -> usize {
        self.fonts.len()
    }

    fn ensure_depth(&mut self, width: u32, height: u32) {
        if self.depth.as_ref().is_some_and(|d| d.width == width && d.height == height) {
            return;
        }
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vizline depth"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("depth target resized to {width}×{height}");
        self.depth = Some(DepthTarget { view, width, height });
    }
}

impl Backend for WgpuBackend {
    fn init(&mut self, config: &Config) -> Result<()> {
        let alignment = self.device.limits().min_uniform_buffer_offset_alignment;
        let stride = uniform_stride(alignment);
        let max_vertices = config.max_vertices.max(1);
        let max_commands = config.max_commands.max(1);

        let vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vizline vertex buffer"),
            size: (max_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vizline command uniforms"),
            size: max_commands as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let command_bgl = command_layout(&self.device);
        let atlas_bgl = atlas_layout(&self.device);
        let command_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vizline command bind group"),
            layout: &command_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(CommandUniform::SIZE),
                }),
            }],
        });
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("vizline atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let pipelines = Pipelines::new(&self.device, self.format, &command_bgl, &atlas_bgl);

        log::info!(
            "wgpu backend ready: {max_vertices} vertices, {max_commands} commands, uniform stride {stride}"
        );

        self.resources = Some(Resources {
            vertex_buffer,
            max_vertices,
            uniform_buffer,
            uniform_stride: stride,
            max_commands,
            command_bind_group,
            atlas_bgl,
            sampler,
            pipelines,
            uniform_bytes: Vec::with_capacity(max_commands * stride as usize),
        });
        Ok(())
    }

    fn render(&mut self, frame: &RenderData<'_>) -> Result<()> {
        let (width, height) = match &self.target {
            Some(t) => (t.width, t.height),
            None => bail!("no render target set"),
        };
        if width == 0 || height == 0 || frame.commands.is_empty() {
            return Ok(());
        }
        self.ensure_depth(width, height);

        let res = self.resources.as_mut().context("render called before init")?;
        if frame.vertices.len() > res.max_vertices {
            bail!("frame has {} vertices, buffer holds {}", frame.vertices.len(), res.max_vertices);
        }
        if frame.commands.len() > res.max_commands {
            bail!("frame has {} commands, buffer holds {}", frame.commands.len(), res.max_commands);
        }

        // ── upload ─────────────────────────────────────────────────────────
        let camera = frame.camera;
        let vp = camera.viewport;
        let viewport = [vp.x, vp.y, vp.width, vp.height];
        let stride = res.uniform_stride as usize;

        res.uniform_bytes.clear();
        res.uniform_bytes.resize(frame.commands.len() * stride, 0);
        for (i, cmd) in frame.commands.iter().enumerate() {
            let uniform = CommandUniform::new(
                &camera.view_proj,
                &cmd.transform,
                viewport,
                frame.config.line_antialias_radius,
            );
            let offset = i * stride;
            res.uniform_bytes[offset..offset + CommandUniform::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !frame.vertices.is_empty() {
            self.queue.write_buffer(&res.vertex_buffer, 0, bytemuck::cast_slice(frame.vertices));
        }
        self.queue.write_buffer(&res.uniform_buffer, 0, &res.uniform_bytes);

        // ── draw ───────────────────────────────────────────────────────────
        let Some(target) = self.target.as_ref() else { return Ok(()) };
        let Some(depth) = self.depth.as_ref() else { return Ok(()) };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("vizline frame encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vizline frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let Some((x, y, w, h)) = clamp_viewport(viewport, width, height) else {
                log::debug!("viewport {viewport:?} lies outside the {width}×{height} target");
                return Ok(());
            };
            rpass.set_viewport(x, y, w, h, 0.0, 1.0);
            rpass.set_vertex_buffer(0, res.vertex_buffer.slice(..));

            for (i, cmd) in frame.commands.iter().enumerate() {
                if cmd.vertex_count == 0 {
                    continue;
                }
                if cmd.mode == DrawMode::Text {
                    let texture = cmd
                        .font
                        .and_then(|id| frame.fonts.get(id.index()))
                        .and_then(|font| self.fonts.get(&font.texture().0));
                    let Some(texture) = texture else {
                        log::warn!("text command {i} has no font texture, skipping");
                        continue;
                    };
                    rpass.set_bind_group(1, &texture.bind_group, &[]);
                }
                rpass.set_pipeline(res.pipelines.get(cmd.mode, cmd.depth_test));
                rpass.set_bind_group(0, &res.command_bind_group, &[(i * stride) as u32]);
                let range = cmd.range();
                rpass.draw(range.start as u32..range.end as u32, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn term(&mut self) {
        if self.resources.is_some() {
            log::debug!("wgpu backend released ({} font textures)", self.fonts.len());
        }
        self.fonts.clear();
        self.resources = None;
        self.depth = None;
        self.target = None;
    }

    fn create_font_texture(&mut self, bitmap: &[u8], width: u32, height: u32) -> Result<TextureHandle> {
        let res = self.resources.as_ref().context("font texture created before init")?;
        if bitmap.len() != width as usize * height as usize {
            bail!("atlas is {} bytes, expected {width}×{height}", bitmap.len());
        }

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vizline font atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
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
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vizline atlas bind group"),
            layout: &res.atlas_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&res.sampler) },
            ],
        });

        self.next_texture += 1;
        let handle = TextureHandle(self.next_texture);
        self.fonts.insert(handle.0, FontTexture { _texture: texture, bind_group });
        log::debug!("uploaded font atlas {width}×{height} as texture {}", handle.0);
        Ok(handle)
    }

    fn destroy_font_texture(&mut self, texture: TextureHandle) {
        if self.fonts.remove(&texture.0).is_none() {
            log::warn!("destroying unknown font texture {}", texture.0);
        }
    }
}

/// Clips a pixel viewport to the target. `None` when nothing remains.
fn clamp_viewport(vp: [f32; 4], width: u32, height: u32) -> Option<(f32, f32, f32, f32)> {
    let (tw, th) = (width as f32, height as f32);
    let x0 = vp[0].clamp(0.0, tw);
    let y0 = vp[1].clamp(0.0, th);
    let x1 = (vp[0] + vp[2]).clamp(0.0, tw);
    let y1 = (vp[1] + vp[3]).clamp(0.0, th);
    if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
        None
    } else {
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}
