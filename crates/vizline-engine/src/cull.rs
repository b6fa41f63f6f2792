//! View-frustum planes and bounding-volume tests.
//!
//! Planes live in world space. Tests take the bounding volume in a command's
//! local space together with that command's transform and map whichever side
//! is cheaper: centers and axes go to world space, AABB tests pull the planes
//! back into local space so the box stays axis-aligned.

use crate::math::{self, Mat3, Mat4, Vec3, Vec4};

/// Plane `dot(normal, p) + offset = 0`. Points with positive distance are inside.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    #[inline]
    pub const fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Builds a plane from `(a, b, c, d)`, normalized by the length of `(a, b, c)`.
    #[inline]
    pub fn from_vec4_normalized(v: Vec4) -> Self {
        let len = v.truncate().length();
        Self::new(v.truncate() / len, v.w / len)
    }

    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.offset
    }

    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        self.normal.extend(self.offset)
    }
}

/// The six clip planes of a view volume: left, right, bottom, top, near, far.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes of `view_proj` (Gribb/Hartmann).
    ///
    /// With `P = transpose(view_proj)` the planes are `P.col3 ± P.colX`;
    /// the columns of `P` are the rows of `view_proj`.
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);
        Self {
            planes: [
                Plane::from_vec4_normalized(r3 + r0),
                Plane::from_vec4_normalized(r3 - r0),
                Plane::from_vec4_normalized(r3 + r1),
                Plane::from_vec4_normalized(r3 - r1),
                Plane::from_vec4_normalized(r3 + r2),
                Plane::from_vec4_normalized(r3 - r2),
            ],
        }
    }

    /// Sphere in world space. Passes iff it is not fully behind any plane.
    pub fn test_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|p| p.distance(center) > -radius)
    }

    /// Sphere in the local space of `transform`. The radius grows with the
    /// transform's largest axis scale.
    pub fn test_sphere_in(&self, transform: &Mat4, center: Vec3, radius: f32) -> bool {
        let c = transform.transform_point3(center);
        let r = radius * math::max_scale(&Mat3::from_mat4(*transform));
        self.test_sphere(c, r)
    }

    /// Axis-aligned box in world space.
    pub fn test_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|p| positive_vertex_inside(p.to_vec4(), min, max))
    }

    /// Box axis-aligned in the local space of `transform`.
    pub fn test_aabb_in(&self, transform: &Mat4, min: Vec3, max: Vec3) -> bool {
        // dot(plane, M * p) == dot(transpose(M) * plane, p)
        let mt = transform.transpose();
        self.planes
            .iter()
            .all(|p| positive_vertex_inside(mt.mul_vec4(p.to_vec4()), min, max))
    }

    /// Oriented box in world space: `center` plus three half-extent axes.
    pub fn test_obb(&self, center: Vec3, axes: &Mat3) -> bool {
        self.planes.iter().all(|p| {
            let radius = p.normal.dot(axes.x_axis).abs()
                + p.normal.dot(axes.y_axis).abs()
                + p.normal.dot(axes.z_axis).abs();
            p.distance(center) > -radius
        })
    }

    /// Oriented box in the local space of `transform`.
    pub fn test_obb_in(&self, transform: &Mat4, center: Vec3, axes: &Mat3) -> bool {
        let c = transform.transform_point3(center);
        let a = Mat3::from_mat4(*transform) * *axes;
        self.test_obb(c, &a)
    }
}

/// Tests the box corner furthest along the plane normal.
#[inline]
fn positive_vertex_inside(plane: Vec4, min: Vec3, max: Vec3) -> bool {
    let p = Vec3::new(
        if plane.x >= 0.0 { max.x } else { min.x },
        if plane.y >= 0.0 { max.y } else { min.y },
        if plane.z >= 0.0 { max.z } else { min.z },
    );
    plane.truncate().dot(p) + plane.w >= 0.0
}
