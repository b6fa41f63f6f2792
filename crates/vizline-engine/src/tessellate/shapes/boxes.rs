use crate::command::DrawMode;
use crate::error::{Error, Result};
use crate::math::{self, Mat3, Mat4, Vec3, Vec4};
use crate::tessellate::{Bounds, Emitter, Shape};

// Corners 0..4 lie on the low-z face (counter-clockwise seen from +z), 4..8
// repeat them on the high-z face.
#[rustfmt::skip]
const EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

// Two triangles per face, counter-clockwise seen from outside.
#[rustfmt::skip]
const FACES: [[usize; 3]; 12] = [
    [0, 3, 2], [0, 2, 1], // -z
    [4, 5, 6], [4, 6, 7], // +z
    [0, 1, 5], [0, 5, 4], // -y
    [3, 7, 6], [3, 6, 2], // +y
    [0, 4, 7], [0, 7, 3], // -x
    [1, 2, 6], [1, 6, 5], // +x
];

const SIGNS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Hexahedron given by eight corners; covers AABBs, OBBs and camera frusta.
pub(crate) struct BoxShape {
    corners: [Vec3; 8],
    bounds: Bounds,
}

impl BoxShape {
    pub(crate) fn aabb(min: Vec3, max: Vec3) -> Self {
        let corners = SIGNS.map(|[sx, sy, sz]| {
            Vec3::new(
                if sx < 0.0 { min.x } else { max.x },
                if sy < 0.0 { min.y } else { max.y },
                if sz < 0.0 { min.z } else { max.z },
            )
        });
        Self { corners, bounds: Bounds::Aabb { min, max } }
    }

    /// `axes` holds the three half-extent vectors as columns.
    pub(crate) fn obb(center: Vec3, axes: Mat3) -> Self {
        let corners = SIGNS.map(|[sx, sy, sz]| {
            center + axes.x_axis * sx + axes.y_axis * sy + axes.z_axis * sz
        });
        Self { corners, bounds: Bounds::Obb { center, axes } }
    }

    /// The view volume of a camera: the clip cube mapped back through `(proj * view)⁻¹`.
    pub(crate) fn camera_frustum(view: &Mat4, proj: &Mat4) -> Result<Self> {
        let inv = math::try_inverse(&(*proj * *view)).ok_or(Error::SingularMatrix)?;
        let corners = SIGNS.map(|[x, y, z]| {
            let h = inv.mul_vec4(Vec4::new(x, y, z, 1.0));
            h.truncate() / h.w
        });
        Ok(Self { bounds: Bounds::from_points(&corners), corners })
    }

    #[cfg(test)]
    pub(crate) fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }
}

impl Shape for BoxShape {
    fn vertex_count(&self, mode: DrawMode, _resolution: u32) -> Option<usize> {
        match mode {
            DrawMode::Point => Some(8),
            DrawMode::Stroke => Some(EDGES.len() * 2),
            DrawMode::Fill => Some(FACES.len() * 3),
            DrawMode::Text => None,
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn emit(&self, mode: DrawMode, _resolution: u32, out: &mut Emitter<'_>) {
        let c = &self.corners;
        match mode {
            DrawMode::Point => c.iter().for_each(|&p| out.vertex(p)),
            DrawMode::Stroke => {
                for [a, b] in EDGES {
                    out.line(c[a], c[b]);
                }
            }
            _ => {
                for [a, b, d] in FACES {
                    out.triangle(c[a], c[b], c[d]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellate::shapes::testing::{emit_all, MODES};

    #[test]
    fn counts_per_mode() {
        let b = BoxShape::aabb(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(b.vertex_count(DrawMode::Point, 4), Some(8));
        assert_eq!(b.vertex_count(DrawMode::Stroke, 4), Some(24));
        assert_eq!(b.vertex_count(DrawMode::Fill, 4), Some(36));
        for mode in MODES {
            emit_all(&b, mode, 4);
        }
    }

    #[test]
    fn fill_normals_point_outward() {
        let b = BoxShape::aabb(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        let center = Vec3::new(1.5, 3.0, 4.5);
        let v = emit_all(&b, DrawMode::Fill, 4);
        for tri in v.chunks(3) {
            let (a, b, c) = (tri[0].position(), tri[1].position(), tri[2].position());
            let n = (b - a).cross(c - a);
            let face_center = (a + b + c) / 3.0;
            assert!(n.dot(face_center - center) > 0.0, "inward triangle {a:?} {b:?} {c:?}");
        }
    }

    #[test]
    fn obb_corners_follow_axes() {
        let axes = Mat3::from_axis_angle(Vec3::Z, core::f32::consts::FRAC_PI_2);
        let b = BoxShape::obb(Vec3::ZERO, axes);
        // (-1,-1,-1) rotated a quarter turn about z
        let c0 = b.corners()[0];
        assert!((c0 - Vec3::new(1.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn identity_camera_frustum_is_clip_cube() {
        let b = BoxShape::camera_frustum(&Mat4::IDENTITY, &Mat4::IDENTITY).unwrap();
        assert_eq!(b.corners()[0], Vec3::splat(-1.0));
        assert_eq!(b.corners()[6], Vec3::splat(1.0));
    }

    #[test]
    fn perspective_frustum_near_face_is_smaller() {
        let proj = Mat4::perspective_rh_gl(1.0, 1.0, 1.0, 10.0);
        let b = BoxShape::camera_frustum(&Mat4::IDENTITY, &proj).unwrap();
        let near = b.corners()[1].x - b.corners()[0].x;
        let far = b.corners()[5].x - b.corners()[4].x;
        assert!(far > near);
        assert!((b.corners()[0].z + 1.0).abs() < 1e-4);
        assert!((b.corners()[4].z + 10.0).abs() < 1e-3);
    }

    #[test]
    fn singular_camera_is_rejected() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            BoxShape::camera_frustum(&Mat4::IDENTITY, &flat),
            Err(Error::SingularMatrix)
        ));
    }
}
