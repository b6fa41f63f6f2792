use crate::command::DrawMode;
use crate::math::Vec3;
use crate::tessellate::{Bounds, Emitter, Shape};

use super::{Cone, ConicalFrustum};

/// Cylindrical shaft topped by a cone head.
///
/// `head_length` is the fraction of the segment taken by the head.
pub(crate) struct Arrow {
    shaft: ConicalFrustum,
    head: Cone,
}

impl Arrow {
    pub(crate) fn new(base: Vec3, apex: Vec3, shaft_radius: f32, head_radius: f32, head_length: f32) -> Self {
        let split = base.lerp(apex, 1.0 - head_length.clamp(0.0, 1.0));
        Self {
            shaft: ConicalFrustum { base, apex: split, base_radius: shaft_radius, apex_radius: shaft_radius },
            head: Cone { base: split, apex, radius: head_radius },
        }
    }
}

impl Shape for Arrow {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        Some(self.shaft.vertex_count(mode, resolution)? + self.head.vertex_count(mode, resolution)?)
    }

    fn bounds(&self) -> Bounds {
        let (base, apex) = (self.shaft.base, self.head.apex);
        let half = (apex - base).length() * 0.5;
        let radius = self.shaft.base_radius.max(self.head.radius);
        Bounds::Sphere { center: base.lerp(apex, 0.5), radius: (half * half + radius * radius).sqrt() }
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        self.shaft.emit(mode, resolution, out);
        self.head.emit(mode, resolution, out);
    }
}
