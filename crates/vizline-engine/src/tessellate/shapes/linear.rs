use crate::command::DrawMode;
use crate::math::Vec3;
use crate::tessellate::{Bounds, Emitter, Shape};

/// A single point sample.
pub(crate) struct Point(pub Vec3);

impl Shape for Point {
    fn vertex_count(&self, mode: DrawMode, _resolution: u32) -> Option<usize> {
        matches!(mode, DrawMode::Point).then_some(1)
    }

    fn bounds(&self) -> Bounds {
        Bounds::Aabb { min: self.0, max: self.0 }
    }

    fn emit(&self, _mode: DrawMode, _resolution: u32, out: &mut Emitter<'_>) {
        out.vertex(self.0);
    }
}

/// A segment between two points.
pub(crate) struct Line {
    pub a: Vec3,
    pub b: Vec3,
}

impl Shape for Line {
    fn vertex_count(&self, mode: DrawMode, _resolution: u32) -> Option<usize> {
        match mode {
            DrawMode::Point | DrawMode::Stroke => Some(2),
            _ => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::Aabb { min: self.a.min(self.b), max: self.a.max(self.b) }
    }

    fn emit(&self, _mode: DrawMode, _resolution: u32, out: &mut Emitter<'_>) {
        out.line(self.a, self.b);
    }
}

/// Planar quad with corners in counter-clockwise order.
pub(crate) struct Quad {
    pub corners: [Vec3; 4],
}

impl Quad {
    /// Axis-aligned rectangle in the XY plane at `z`.
    pub(crate) fn rect(min: [f32; 2], max: [f32; 2], z: f32) -> Self {
        Self {
            corners: [
                Vec3::new(min[0], min[1], z),
                Vec3::new(max[0], min[1], z),
                Vec3::new(max[0], max[1], z),
                Vec3::new(min[0], max[1], z),
            ],
        }
    }
}

impl Shape for Quad {
    fn vertex_count(&self, mode: DrawMode, _resolution: u32) -> Option<usize> {
        match mode {
            DrawMode::Point => Some(4),
            DrawMode::Stroke => Some(8),
            DrawMode::Fill => Some(6),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.corners)
    }

    fn emit(&self, mode: DrawMode, _resolution: u32, out: &mut Emitter<'_>) {
        let [a, b, c, d] = self.corners;
        match mode {
            DrawMode::Point => self.corners.iter().for_each(|&p| out.vertex(p)),
            DrawMode::Stroke => {
                out.line(a, b);
                out.line(b, c);
                out.line(c, d);
                out.line(d, a);
            }
            _ => out.quad_fill(a, b, c, d),
        }
    }
}

/// Lines on the `y = 0` plane every `step` units across `[min, max]` in X and Z.
pub(crate) struct Grid {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub step: f32,
}

impl Grid {
    /// Number of grid lines across `[lo, hi]`. Zero for empty ranges or non-positive steps.
    fn lines(&self, lo: f32, hi: f32) -> usize {
        if !(self.step > 0.0) || !(hi >= lo) {
            return 0;
        }
        // the cast saturates for tiny steps; keep the +1 from wrapping
        (((hi - lo) / self.step + 1e-4).floor() as usize).saturating_add(1)
    }

    fn x_lines(&self) -> usize {
        self.lines(self.min[0], self.max[0])
    }

    fn z_lines(&self) -> usize {
        self.lines(self.min[1], self.max[1])
    }

    fn corners(&self) -> [Vec3; 4] {
        let (x0, z0, x1, z1) = (self.min[0], self.min[1], self.max[0], self.max[1]);
        // Counter-clockwise seen from +Y.
        [
            Vec3::new(x0, 0.0, z0),
            Vec3::new(x0, 0.0, z1),
            Vec3::new(x1, 0.0, z1),
            Vec3::new(x1, 0.0, z0),
        ]
    }
}

impl Shape for Grid {
    fn vertex_count(&self, mode: DrawMode, _resolution: u32) -> Option<usize> {
        match mode {
            DrawMode::Point | DrawMode::Stroke => {
                Some(2usize.saturating_mul(self.x_lines().saturating_add(self.z_lines())))
            }
            DrawMode::Fill => Some(6),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.corners())
    }

    fn emit(&self, mode: DrawMode, _resolution: u32, out: &mut Emitter<'_>) {
        if mode == DrawMode::Fill {
            let [a, b, c, d] = self.corners();
            out.quad_fill(a, b, c, d);
            return;
        }
        let (x0, z0, x1, z1) = (self.min[0], self.min[1], self.max[0], self.max[1]);
        for i in 0..self.x_lines() {
            let x = x0 + self.step * i as f32;
            out.line(Vec3::new(x, 0.0, z0), Vec3::new(x, 0.0, z1));
        }
        for i in 0..self.z_lines() {
            let z = z0 + self.step * i as f32;
            out.line(Vec3::new(x0, 0.0, z), Vec3::new(x1, 0.0, z));
        }
    }
}
