//! Primitive tessellation.
//!
//! Every primitive is a [`Shape`]: it reports its exact vertex demand for a
//! draw mode, exposes a bounding volume for culling, and emits its vertices
//! through an [`Emitter`]. The context sequences those three steps so that
//! capacity and culling are decided before the first write.
//!
//! Extending the tessellator:
//! - add a shape module under `tessellate::shapes::*`
//! - implement [`Shape`] for it
//! - add a drawing method on [`Context`](crate::Context)

mod emitter;
mod ring;
pub(crate) mod shapes;

pub(crate) use emitter::Emitter;
pub(crate) use ring::Ring;

use crate::command::DrawMode;
use crate::config::MAX_DETAIL_LEVEL;
use crate::math::{Mat3, Vec3};

/// Ring resolution for a detail level: `4 * 2^level`, level clamped to `0..=MAX_DETAIL_LEVEL`.
#[inline]
pub const fn resolution(detail_level: u32) -> u32 {
    let level = if detail_level > MAX_DETAIL_LEVEL { MAX_DETAIL_LEVEL } else { detail_level };
    4 << level
}

/// Bounding volume of a primitive in its command's local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Bounds {
    Sphere { center: Vec3, radius: f32 },
    Aabb { min: Vec3, max: Vec3 },
    Obb { center: Vec3, axes: Mat3 },
}

impl Bounds {
    pub(crate) fn from_points(points: &[Vec3]) -> Self {
        let first = points.first().copied().unwrap_or_default();
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Bounds::Aabb { min, max }
    }
}

/// A primitive that can be tessellated into the vertex stream.
pub(crate) trait Shape {
    /// Exact number of vertices `emit` writes, or `None` if `mode` is unsupported.
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize>;

    fn bounds(&self) -> Bounds;

    /// Writes exactly `vertex_count(mode, resolution)` vertices.
    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_doubles_per_level() {
        assert_eq!(resolution(0), 4);
        assert_eq!(resolution(1), 8);
        assert_eq!(resolution(2), 16);
        assert_eq!(resolution(4), 64);
        assert_eq!(resolution(7), 64);
    }

    #[test]
    fn point_bounds_cover_all_points() {
        let b = Bounds::from_points(&[Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 5.0)]);
        assert_eq!(
            b,
            Bounds::Aabb { min: Vec3::new(-1.0, -2.0, 0.0), max: Vec3::new(1.0, 3.0, 5.0) }
        );
    }
}
