use bytemuck::{Pod, Zeroable};

use crate::math::Vec3;
use crate::paint::Color;

/// A recorded vertex (32 bytes).
///
///  offset  0  pos_size  [f32; 4]  xyz position, w = primitive size in pixels
///  offset 16  uv        [f32; 3]  atlas coordinates for text, zero for geometry
///  offset 28  color     [u8; 4]   straight-alpha RGBA
///
/// Geometry positions are in the owning command's local space; the command's
/// transform maps them to world space. Text positions are viewport pixels
/// (origin top-left, +Y down) with normalized device depth in `z`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos_size: [f32; 4],
    pub uv: [f32; 3],
    pub color: [u8; 4],
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3, size: f32, uv: [f32; 3], color: Color) -> Self {
        Self {
            pos_size: [position.x, position.y, position.z, size],
            uv,
            color: color.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.pos_size[0], self.pos_size[1], self.pos_size[2])
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.pos_size[3]
    }

    #[inline]
    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.pos_size[0] += dx;
        self.pos_size[1] += dy;
    }
}
