use core::f32::consts::{FRAC_PI_2, TAU};

use crate::command::DrawMode;
use crate::math::{Mat4, Vec3};
use crate::tessellate::{Bounds, Emitter, Ring, Shape};

/// Torus around the local Z axis.
pub(crate) struct Torus {
    pub center: Vec3,
    /// Distance from the center to the middle of the tube.
    pub radius: f32,
    pub tube_radius: f32,
}

impl Torus {
    const BIG_RINGS: usize = 4;

    fn big_rings(&self, template: &Ring) -> [Ring; 4] {
        let (c, big, small) = (self.center, self.radius, self.tube_radius);
        let at = |z: f32, r: f32| {
            Mat4::from_translation(c + Vec3::new(0.0, 0.0, z)) * Mat4::from_scale(Vec3::new(r, r, 1.0))
        };
        [
            template.transformed(&at(0.0, big + small)),
            template.transformed(&at(0.0, big - small)),
            template.transformed(&at(small, big)),
            template.transformed(&at(-small, big)),
        ]
    }

    /// Tube cross-section at azimuth `phi`.
    fn small_ring(&self, template: &Ring, phi: f32) -> Ring {
        let m = Mat4::from_translation(self.center)
            * Mat4::from_rotation_z(phi)
            * Mat4::from_translation(Vec3::new(self.radius, 0.0, 0.0))
            * Mat4::from_rotation_x(FRAC_PI_2)
            * Mat4::from_scale(Vec3::splat(self.tube_radius));
        template.transformed(&m)
    }

    #[inline]
    fn surface(&self, phi: f32, theta: f32) -> Vec3 {
        let (sp, cp) = phi.sin_cos();
        let (st, ct) = theta.sin_cos();
        let ring = self.radius + self.tube_radius * ct;
        self.center + Vec3::new(ring * cp, ring * sp, self.tube_radius * st)
    }
}

impl Shape for Torus {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        let r = resolution as usize;
        let rings = Self::BIG_RINGS + r / 2;
        match mode {
            DrawMode::Point => Some(rings * r),
            DrawMode::Stroke => Some(rings * 2 * r),
            DrawMode::Fill => Some(r * (r / 2) * 6),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::Sphere { center: self.center, radius: self.radius + self.tube_radius }
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        let template = Ring::circle(resolution);
        let small_count = resolution / 2;
        let emit_ring = |ring: &Ring, out: &mut Emitter<'_>| match mode {
            DrawMode::Point => ring.emit_points(out),
            _ => ring.emit_outline(out),
        };

        if mode == DrawMode::Fill {
            let d_phi = TAU / resolution as f32;
            let d_theta = TAU / small_count as f32;
            for i in 0..resolution {
                let (f0, f1) = (d_phi * i as f32, d_phi * (i + 1) as f32);
                for j in 0..small_count {
                    let (t0, t1) = (d_theta * j as f32, d_theta * (j + 1) as f32);
                    let p00 = self.surface(f0, t0);
                    let p10 = self.surface(f1, t0);
                    let p11 = self.surface(f1, t1);
                    let p01 = self.surface(f0, t1);
                    out.triangle(p00, p10, p11);
                    out.triangle(p00, p11, p01);
                }
            }
            return;
        }

        for ring in &self.big_rings(&template) {
            emit_ring(ring, out);
        }
        let step = TAU / small_count as f32;
        for k in 0..small_count {
            emit_ring(&self.small_ring(&template, step * k as f32), out);
        }
    }
}
