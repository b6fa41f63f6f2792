//! Vector and matrix types.
//!
//! `glam` column-major types, plus the few helpers it has no direct
//! counterpart for. Clip conventions follow OpenGL (`*_rh_gl` projections):
//! right-handed view space looking down -Z, normalized device depth in
//! `[-1, 1]`. Backends targeting a `[0, 1]` depth range remap in their
//! vertex stage.

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// General inverse. `None` for singular matrices.
pub fn try_inverse(m: &Mat4) -> Option<Mat4> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some(m.inverse())
}

/// Inverse of a rotation + translation matrix: `[Rᵀ | -Rᵀt]`.
///
/// Only valid when the upper 3x3 block is orthonormal.
pub fn rigid_inverse(m: &Mat4) -> Mat4 {
    let rt = Mat3::from_mat4(*m).transpose();
    let t = rt * m.w_axis.truncate();
    affine(rt, -t)
}

/// Affine matrix with `linear` as the upper 3x3 block and `translation` in the last column.
#[inline]
pub fn affine(linear: Mat3, translation: Vec3) -> Mat4 {
    Mat4::from_cols(
        linear.x_axis.extend(0.0),
        linear.y_axis.extend(0.0),
        linear.z_axis.extend(0.0),
        translation.extend(1.0),
    )
}

/// Upper bound on how far `m` stretches any direction.
///
/// The largest absolute row sum of `MᵀM` bounds its largest eigenvalue, the
/// squared spectral norm. Exact when the columns are orthogonal; conservative
/// under shear.
pub fn max_scale(m: &Mat3) -> f32 {
    let g = m.transpose() * *m;
    let row_sum = |c: Vec3| c.abs().element_sum();
    // g is symmetric: column sums are row sums
    row_sum(g.x_axis).max(row_sum(g.y_axis)).max(row_sum(g.z_axis)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &Mat4, b: &Mat4) -> bool {
        a.abs_diff_eq(*b, 1e-5)
    }

    // ── inverses ──────────────────────────────────────────────────────────

    #[test]
    fn rigid_inverse_matches_general_inverse() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::from_axis_angle(Vec3::new(0.2, 1.0, -0.4).normalize(), 2.2);
        let general = try_inverse(&m).unwrap();
        assert!(approx(&rigid_inverse(&m), &general));
        assert!(approx(&(m * rigid_inverse(&m)), &Mat4::IDENTITY));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(try_inverse(&Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))).is_none());
        assert!(try_inverse(&Mat4::IDENTITY).is_some());
    }

    #[test]
    fn affine_places_translation_in_last_column() {
        let m = affine(Mat3::from_diagonal(Vec3::splat(2.0)), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point3(Vec3::X), Vec3::new(3.0, 2.0, 3.0));
        assert_eq!(m.transform_vector3(Vec3::X), Vec3::new(2.0, 0.0, 0.0));
    }

    // ── max_scale ─────────────────────────────────────────────────────────

    #[test]
    fn max_scale_is_exact_for_rotation_and_scale() {
        let m = Mat3::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 0.7)
            * Mat3::from_diagonal(Vec3::new(2.0, 3.0, 0.5));
        assert!((max_scale(&m) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn max_scale_bounds_sheared_stretch() {
        // x' = x + y: stretches (0.526, 0.851) by the golden ratio
        let shear = Mat3::from_cols(Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Z);
        let golden = (1.0 + 5f32.sqrt()) / 2.0;
        let worst = Vec3::new(0.5257, 0.8507, 0.0);
        assert!(((shear * worst).length() - golden).abs() < 1e-3);
        assert!(max_scale(&shear) >= golden);
    }

    // ── clip conventions ──────────────────────────────────────────────────

    #[test]
    fn gl_projection_maps_near_and_far_to_unit_depth() {
        let proj = Mat4::perspective_rh_gl(1.0, 1.0, 0.5, 50.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.5));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -50.0));
        assert!((near.z + 1.0).abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
