use core::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::command::DrawMode;
use crate::math::{Mat4, Vec3};
use crate::tessellate::{Bounds, Emitter, Ring, Shape};

pub(crate) struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Great circles in the XY, XZ and YZ planes.
    fn rings(&self, resolution: u32) -> [Ring; 3] {
        let template = Ring::circle(resolution);
        let place = Mat4::from_translation(self.center) * Mat4::from_scale(Vec3::splat(self.radius));
        [
            template.transformed(&place),
            template.transformed(&(place * Mat4::from_rotation_x(FRAC_PI_2))),
            template.transformed(&(place * Mat4::from_rotation_y(FRAC_PI_2))),
        ]
    }

    /// Surface point at polar angle `theta` (from +z) and azimuth `phi`.
    #[inline]
    fn surface(&self, theta: f32, phi: f32) -> Vec3 {
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();
        self.center + Vec3::new(st * cp, st * sp, ct) * self.radius
    }
}

impl Shape for Sphere {
    fn vertex_count(&self, mode: DrawMode, resolution: u32) -> Option<usize> {
        let r = resolution as usize;
        match mode {
            DrawMode::Point => Some(3 * r),
            DrawMode::Stroke => Some(6 * r),
            DrawMode::Fill => Some((r / 2) * r * 6),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::Sphere { center: self.center, radius: self.radius }
    }

    fn emit(&self, mode: DrawMode, resolution: u32, out: &mut Emitter<'_>) {
        match mode {
            DrawMode::Point => self.rings(resolution).iter().for_each(|r| r.emit_points(out)),
            DrawMode::Stroke => self.rings(resolution).iter().for_each(|r| r.emit_outline(out)),
            _ => {
                let bands = resolution / 2;
                let d_theta = PI / bands as f32;
                let d_phi = TAU / resolution as f32;
                for i in 0..bands {
                    let (t0, t1) = (d_theta * i as f32, d_theta * (i + 1) as f32);
                    for j in 0..resolution {
                        let (f0, f1) = (d_phi * j as f32, d_phi * (j + 1) as f32);
                        let p00 = self.surface(t0, f0);
                        let p10 = self.surface(t1, f0);
                        let p11 = self.surface(t1, f1);
                        let p01 = self.surface(t0, f1);
                        out.triangle(p00, p10, p11);
                        out.triangle(p00, p11, p01);
                    }
                }
            }
        }
    }
}
