use core::f32::consts::TAU;

use crate::command::DrawMode;
use crate::math::{self, Mat3, Vec3};
use crate::tessellate::{Bounds, Emitter, Ring, Shape};

/// Circular arc in the plane spanned by the first two basis columns.
///
/// Angles run counter-clockwise from the first basis axis. An angle of a full
/// turn or more produces a closed circle.
pub(crate) struct Arc {
    pub center: Vec3,
    pub radius: f32,
    pub angle: f32,
    pub basis: Mat3,
    /// Reverses the winding of filled triangles.
    pub flip: bool,
}

impl Arc {
    /// Full circle in the local XY plane.
    pub(crate) fn circle(center: Vec3, radius: f32) -> Self {
        Self::new(center, radius, TAU)
    }

    pub(crate) fn new(center: Vec3, radius: f32, angle: f32) -> Self {
        Self { center, radius, angle, basis: Mat3::IDENTITY, flip: false }
    }

    pub(crate) fn with_basis(mut self, basis: Mat3) -> Self {
        self.basis = basis;
        self
    }

    fn is_closed(&self) -> bool {
        self.angle >= TAU - 1e-4
    }

    fn ring(&self, resolution: u32) -> Ring {
        let frame = math::affine(self.basis * Mat3::from_diagonal(Vec3::splat(self.radius)), self.center);
        Ring::arc(resolution, self.angle).transformed(&frame)
    }
}

impl Shape for Arc {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        let r = resolution as usize;
        let closed = self.is_closed();
        match mode {
            DrawMode::Point if closed => Some(r),
            DrawMode::Point => Some(r + 2),
            DrawMode::Stroke if closed => Some(2 * r),
            DrawMode::Stroke => Some(2 * r + 4),
            DrawMode::Fill => Some(3 * r),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::Sphere { center: self.center, radius: self.radius * math::max_scale(&self.basis) }
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        let ring = self.ring(resolution);
        let closed = ring.is_closed();
        let rim = ring.points();
        match mode {
            DrawMode::Point => {
                ring.emit_points(out);
                if !closed {
                    out.vertex(self.center);
                }
            }
            DrawMode::Stroke => {
                ring.emit_outline(out);
                if !closed {
                    out.line(self.center, rim[0]);
                    out.line(rim[rim.len() - 1], self.center);
                }
            }
            _ => {
                emit_fan(self.center, &ring, self.flip, out);
            }
        }
    }
}

/// Center fan over a ring: one triangle `(center, p[i], p[i + 1])` per segment.
pub(super) fn emit_fan(center: Vec3, ring: &Ring, flip: bool, out: &mut Emitter<'_>) {
    for pair in ring.points().windows(2) {
        if flip {
            out.triangle(center, pair[1], pair[0]);
        } else {
            out.triangle(center, pair[0], pair[1]);
        }
    }
}
