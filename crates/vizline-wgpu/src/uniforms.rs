//! GPU-side layouts shared by the pipelines.

use bytemuck::{Pod, Zeroable};
use vizline_engine::math::{Mat4, Vec4};
use vizline_engine::Vertex;

/// Maps OpenGL clip depth `[-w, w]` onto wgpu's `[0, w]`.
pub(crate) const CLIP_DEPTH_FIX: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

/// Per-command uniform (96 bytes), bound with a dynamic offset.
///
///  offset  0  mvp       mat4x4<f32>  clip-fixed proj * view * transform
///  offset 64  viewport  vec4<f32>    x, y, width, height in pixels
///  offset 80  params    vec4<f32>    x = antialias radius
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CommandUniform {
    pub mvp: [[f32; 4]; 4],
    pub viewport: [f32; 4],
    pub params: [f32; 4],
}

impl CommandUniform {
    pub(crate) fn new(view_proj: &Mat4, transform: &Mat4, viewport: [f32; 4], aa_radius: f32) -> Self {
        let mvp = CLIP_DEPTH_FIX * *view_proj * *transform;
        Self {
            mvp: mvp.to_cols_array_2d(),
            viewport,
            params: [aa_radius, 0.0, 0.0, 0.0],
        }
    }

    pub(crate) const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}

/// Size of one uniform slot, padded to the device's dynamic-offset alignment.
pub(crate) fn uniform_stride(alignment: u32) -> u64 {
    let a = u64::from(alignment.max(1));
    CommandUniform::SIZE.div_ceil(a) * a
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x4,
    1 => Float32x3,
    2 => Unorm8x4,
];

pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}
