use crate::command::DrawMode;
use crate::math::{Mat4, Vec3};
use crate::tessellate::{Bounds, Emitter, Ring, Shape};

use super::arc::emit_fan;

/// Maps the canonical unit cone (unit base circle in the XY plane at the
/// origin, apex at `(0, 0, 1)`) onto a segment from `base` to `apex` with a
/// base radius of `radius`.
///
/// The two radial axes are perpendicular to the segment; the helper axis is
/// the world axis least aligned with it so the cross product stays well
/// conditioned.
pub(crate) fn segment_frame(base: Vec3, apex: Vec3, radius: f32) -> Mat4 {
    let axis = apex - base;
    let n = axis.normalize();
    let a = n.abs();
    let helper = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let u = n.cross(helper).normalize();
    let v = n.cross(u);
    Mat4::from_cols(
        (u * radius).extend(0.0),
        (v * radius).extend(0.0),
        axis.extend(0.0),
        base.extend(1.0),
    )
}

fn segment_bounds(base: Vec3, apex: Vec3, radius: f32) -> Bounds {
    let half = (apex - base).length() * 0.5;
    Bounds::Sphere {
        center: base.lerp(apex, 0.5),
        radius: (half * half + radius * radius).sqrt(),
    }
}

/// Lines joining `a` and `b` at every quarter turn.
fn emit_spokes(a: &Ring, b: &[Vec3], out: &mut Emitter<'_>) {
    let stride = (a.segments() / 4).max(1);
    for i in (0..4).map(|k| k * stride) {
        out.line(a.points()[i], b[i.min(b.len() - 1)]);
    }
}

pub(crate) struct Cone {
    pub base: Vec3,
    pub apex: Vec3,
    pub radius: f32,
}

impl Shape for Cone {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        let r = resolution as usize;
        match mode {
            DrawMode::Point => Some(r + 1),
            DrawMode::Stroke => Some(2 * r + 8),
            DrawMode::Fill => Some(6 * r),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        segment_bounds(self.base, self.apex, self.radius)
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        let ring = Ring::circle(resolution).transformed(&segment_frame(self.base, self.apex, self.radius));
        match mode {
            DrawMode::Point => {
                ring.emit_points(out);
                out.vertex(self.apex);
            }
            DrawMode::Stroke => {
                ring.emit_outline(out);
                emit_spokes(&ring, &[self.apex], out);
            }
            _ => {
                // Base cap faces away from the apex.
                emit_fan(self.base, &ring, true, out);
                emit_fan(self.apex, &ring, false, out);
            }
        }
    }
}

/// Truncated cone; a cylinder when both radii match.
pub(crate) struct ConicalFrustum {
    pub base: Vec3,
    pub apex: Vec3,
    pub base_radius: f32,
    pub apex_radius: f32,
}

impl ConicalFrustum {
    fn rings(&self, resolution: u32) -> (Ring, Ring) {
        let template = Ring::circle(resolution);
        let bottom = segment_frame(self.base, self.apex, self.base_radius);
        let top = segment_frame(self.base, self.apex, self.apex_radius) * Mat4::from_translation(Vec3::Z);
        (template.transformed(&bottom), template.transformed(&top))
    }
}

impl Shape for ConicalFrustum {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        let r = resolution as usize;
        match mode {
            DrawMode::Point => Some(2 * r),
            DrawMode::Stroke => Some(4 * r + 8),
            DrawMode::Fill => Some(12 * r),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        segment_bounds(self.base, self.apex, self.base_radius.max(self.apex_radius))
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        let (bottom, top) = self.rings(resolution);
        match mode {
            DrawMode::Point => {
                bottom.emit_points(out);
                top.emit_points(out);
            }
            DrawMode::Stroke => {
                bottom.emit_outline(out);
                top.emit_outline(out);
                emit_spokes(&bottom, top.points(), out);
            }
            _ => {
                emit_fan(self.base, &bottom, true, out);
                emit_fan(self.apex, &top, false, out);
                for (b, t) in bottom.points().windows(2).zip(top.points().windows(2)) {
                    out.quad_fill(b[0], b[1], t[1], t[0]);
                }
            }
        }
    }
}
