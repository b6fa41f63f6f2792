use core::f32::consts::TAU;

use crate::config::MAX_DETAIL_LEVEL;
use crate::math::{Mat4, Vec3};

use super::Emitter;

const MAX_RING_POINTS: usize = (4 << MAX_DETAIL_LEVEL) + 1;

/// Arc samples held inline: a template generated once and instantiated as
/// transformed copies, without touching the heap.
///
/// A ring with `n` segments stores `n + 1` samples; for closed rings the last
/// sample repeats the first.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Ring {
    points: [Vec3; MAX_RING_POINTS],
    len: usize,
    closed: bool,
}

impl Ring {
    /// Unit-radius arc in the XY plane spanning `[0, angle]`.
    pub(crate) fn arc(segments: u32, angle: f32) -> Self {
        let segments = (segments as usize).clamp(1, MAX_RING_POINTS - 1);
        let closed = angle >= TAU - 1e-4;
        let angle = angle.min(TAU);
        let step = angle / segments as f32;

        let mut points = [Vec3::ZERO; MAX_RING_POINTS];
        for (i, p) in points.iter_mut().take(segments + 1).enumerate() {
            let (s, c) = (step * i as f32).sin_cos();
            *p = Vec3::new(c, s, 0.0);
        }
        if closed {
            points[segments] = points[0];
        }
        Self { points, len: segments + 1, closed }
    }

    /// Full unit circle in the XY plane.
    #[inline]
    pub(crate) fn circle(segments: u32) -> Self {
        Self::arc(segments, TAU)
    }

    /// Copy of this ring with every sample mapped through `m`.
    pub(crate) fn transformed(&self, m: &Mat4) -> Self {
        let mut out = *self;
        for p in out.points.iter_mut().take(self.len) {
            *p = m.transform_point3(*p);
        }
        out
    }

    #[inline]
    pub(crate) fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    #[inline]
    pub(crate) fn segments(&self) -> usize {
        self.len - 1
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Distinct samples: `segments` for closed rings, `segments + 1` otherwise.
    #[inline]
    pub(crate) fn distinct_points(&self) -> &[Vec3] {
        if self.closed { &self.points[..self.len - 1] } else { self.points() }
    }

    pub(crate) fn emit_points(&self, out: &mut Emitter<'_>) {
        for &p in self.distinct_points() {
            out.vertex(p);
        }
    }

    pub(crate) fn emit_outline(&self, out: &mut Emitter<'_>) {
        for pair in self.points().windows(2) {
            out.line(pair[0], pair[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_closes_exactly() {
        let r = Ring::circle(16);
        assert_eq!(r.points().len(), 17);
        assert_eq!(r.points()[0], r.points()[16]);
        assert_eq!(r.distinct_points().len(), 16);
        assert!(r.is_closed());
    }

    #[test]
    fn partial_arc_keeps_both_ends() {
        let r = Ring::arc(8, core::f32::consts::PI);
        assert!(!r.is_closed());
        assert_eq!(r.distinct_points().len(), 9);
        let end = r.points()[8];
        assert!((end - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn samples_lie_on_unit_circle() {
        for p in Ring::circle(64).points() {
            assert!((p.length() - 1.0).abs() < 1e-6);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn transformed_copy_leaves_template_untouched() {
        let template = Ring::circle(4);
        let moved = template.transformed(&Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)));
        assert_eq!(template.points()[0], Vec3::X);
        assert_eq!(moved.points()[0], Vec3::new(1.0, 0.0, 2.0));
    }
}
