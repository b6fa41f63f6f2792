//! Render pipelines keyed by draw mode and depth testing.

use vizline_engine::DrawMode;

use crate::uniforms::{vertex_layout, CommandUniform};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── layouts ───────────────────────────────────────────────────────────────

/// Group 0: per-command uniform, addressed with a dynamic offset.
pub(crate) fn command_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("vizline command bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(CommandUniform::SIZE),
            },
            count: None,
        }],
    })
}

/// Group 1 of the text pipeline: font atlas and its sampler.
pub(crate) fn atlas_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("vizline atlas bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

// ── pipeline set ──────────────────────────────────────────────────────────

const MODES: [DrawMode; 4] = [DrawMode::Point, DrawMode::Stroke, DrawMode::Fill, DrawMode::Text];

fn slot(mode: DrawMode, depth_test: bool) -> usize {
    let m = match mode {
        DrawMode::Point => 0,
        DrawMode::Stroke => 1,
        DrawMode::Fill => 2,
        DrawMode::Text => 3,
    };
    m * 2 + usize::from(depth_test)
}

fn topology(mode: DrawMode) -> wgpu::PrimitiveTopology {
    match mode {
        DrawMode::Point => wgpu::PrimitiveTopology::PointList,
        DrawMode::Stroke => wgpu::PrimitiveTopology::LineList,
        DrawMode::Fill | DrawMode::Text => wgpu::PrimitiveTopology::TriangleList,
    }
}

fn depth_state(depth_test: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: depth_test,
        depth_compare: if depth_test {
            wgpu::CompareFunction::LessEqual
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// One pipeline per (mode, depth test) pair.
pub(crate) struct Pipelines {
    pipelines: Vec<wgpu::RenderPipeline>,
}

impl Pipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        command_bgl: &wgpu::BindGroupLayout,
        atlas_bgl: &wgpu::BindGroupLayout,
    ) -> Self {
        let geometry_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vizline geometry shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/geometry.wgsl").into()),
        });
        let text_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vizline text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let geometry_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vizline geometry pipeline layout"),
            bind_group_layouts: &[command_bgl],
            immediate_size: 0,
        });
        let text_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vizline text pipeline layout"),
            bind_group_layouts: &[command_bgl, atlas_bgl],
            immediate_size: 0,
        });

        let mut pipelines = Vec::with_capacity(MODES.len() * 2);
        for mode in MODES {
            for depth_test in [false, true] {
                let (shader, layout) = if mode == DrawMode::Text {
                    (&text_shader, &text_layout)
                } else {
                    (&geometry_shader, &geometry_layout)
                };
                debug_assert_eq!(pipelines.len(), slot(mode, depth_test));
                pipelines.push(build(device, format, shader, layout, mode, depth_test));
            }
        }
        log::debug!("created {} render pipelines", pipelines.len());

        Self { pipelines }
    }

    pub(crate) fn get(&self, mode: DrawMode, depth_test: bool) -> &wgpu::RenderPipeline {
        &self.pipelines[slot(mode, depth_test)]
    }
}

fn build(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    mode: DrawMode,
    depth_test: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("vizline pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: topology(mode),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_state(depth_test)),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
