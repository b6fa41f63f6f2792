use crate::buffer::Reserved;
use crate::math::Vec3;
use crate::paint::Color;
use crate::vertex::Vertex;

/// The single append path into the vertex stream.
///
/// Stamps the current color and primitive size onto every vertex.
pub(crate) struct Emitter<'a> {
    out: Reserved<'a, Vertex>,
    color: Color,
    size: f32,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(out: Reserved<'a, Vertex>, color: Color, size: f32) -> Self {
        Self { out, color, size }
    }

    #[inline]
    pub(crate) fn vertex(&mut self, p: Vec3) {
        self.out.push(Vertex::new(p, self.size, [0.0; 3], self.color));
    }

    #[inline]
    pub(crate) fn textured(&mut self, p: Vec3, uv: [f32; 2], color: Color) {
        self.out.push(Vertex::new(p, self.size, [uv[0], uv[1], 0.0], color));
    }

    #[inline]
    pub(crate) fn line(&mut self, a: Vec3, b: Vec3) {
        self.vertex(a);
        self.vertex(b);
    }

    #[inline]
    pub(crate) fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.vertex(a);
        self.vertex(b);
        self.vertex(c);
    }

    /// Counter-clockwise quad `a b c d` as two triangles.
    #[inline]
    pub(crate) fn quad_fill(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    #[inline]
    pub(crate) fn written(&self) -> usize {
        self.out.written()
    }

    /// Vertices written so far through this emitter.
    #[inline]
    pub(crate) fn written_mut(&mut self) -> &mut [Vertex] {
        self.out.written_mut()
    }
}
