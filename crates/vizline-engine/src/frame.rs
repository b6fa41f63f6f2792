//! Per-frame camera state.
//!
//! A [`FrameSetup`] is consumed once by `new_frame`; everything derived from
//! it (combined matrices, view origin, projection scale, frustum planes) is
//! held in a [`Camera`] until the next frame.

use crate::cull::Frustum;
use crate::math::{self, Mat4, Vec3};

/// Render target rectangle in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport at the origin covering `width x height` pixels.
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::sized(1.0, 1.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Projection {
    Perspective,
    #[default]
    Orthographic,
}

/// Camera input for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSetup {
    pub view: Mat4,
    pub proj: Mat4,
    pub viewport: Viewport,
    /// Vertical field of view in radians. Ignored for orthographic projections.
    pub fov_y: f32,
    pub projection: Projection,
}

impl Default for FrameSetup {
    /// Identity view and projection: the clip cube seen orthographically.
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            viewport: Viewport::default(),
            fov_y: 0.0,
            projection: Projection::Orthographic,
        }
    }
}

impl FrameSetup {
    /// Perspective camera; the projection is built from the viewport aspect.
    pub fn perspective(view: Mat4, fov_y: f32, near: f32, far: f32, viewport: Viewport) -> Self {
        Self {
            view,
            proj: Mat4::perspective_rh_gl(fov_y, viewport.aspect(), near, far),
            viewport,
            fov_y,
            projection: Projection::Perspective,
        }
    }

    pub fn orthographic(view: Mat4, proj: Mat4, viewport: Viewport) -> Self {
        Self { view, proj, viewport, fov_y: 0.0, projection: Projection::Orthographic }
    }
}

/// Derived camera state for the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_proj: Mat4,
    /// Camera-to-world transform.
    pub inv_view: Mat4,
    pub view_origin: Vec3,
    pub projection: Projection,
    /// World-space height of the view volume per unit distance (perspective)
    /// or in total (orthographic).
    pub proj_scale: f32,
    pub viewport: Viewport,
    pub frustum: Frustum,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_setup(&FrameSetup::default())
    }
}

impl Camera {
    pub fn from_setup(setup: &FrameSetup) -> Self {
        let view_proj = setup.proj * setup.view;
        let inv_view = math::try_inverse(&setup.view).unwrap_or_else(|| math::rigid_inverse(&setup.view));
        let proj_scale = match setup.projection {
            Projection::Perspective => 2.0 * (setup.fov_y * 0.5).tan(),
            Projection::Orthographic => 2.0 / setup.proj.y_axis.y,
        };
        Self {
            view: setup.view,
            proj: setup.proj,
            view_proj,
            inv_view,
            view_origin: inv_view.w_axis.truncate(),
            projection: setup.projection,
            proj_scale,
            viewport: setup.viewport,
            frustum: Frustum::from_view_proj(&view_proj),
        }
    }

    #[inline]
    pub fn is_orthographic(&self) -> bool {
        self.projection == Projection::Orthographic
    }

    /// World-space length covering `pixels` on screen at `position`.
    pub fn pixels_to_world_size(&self, position: Vec3, pixels: f32) -> f32 {
        let per_pixel = self.proj_scale / self.viewport.height.max(1.0);
        match self.projection {
            Projection::Perspective => pixels * (position - self.view_origin).length() * per_pixel,
            Projection::Orthographic => pixels * per_pixel,
        }
    }

    /// Viewport pixel position (origin top-left, +Y down) of a world point,
    /// with normalized device depth in `z`. `None` behind the eye.
    pub fn world_to_viewport(&self, p: Vec3) -> Option<Vec3> {
        let clip = self.view_proj.mul_vec4(p.extend(1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let vp = &self.viewport;
        Some(Vec3::new(
            vp.x + (ndc.x * 0.5 + 0.5) * vp.width,
            vp.y + (0.5 - ndc.y * 0.5) * vp.height,
            ndc.z,
        ))
    }

    /// World-space right and up axes of a quad at `position` facing the camera.
    pub fn billboard_axes(&self, position: Vec3) -> (Vec3, Vec3) {
        let right = self.inv_view.x_axis.truncate();
        let up = self.inv_view.y_axis.truncate();
        match self.projection {
            Projection::Orthographic => (right, up),
            Projection::Perspective => {
                let to_cam = (self.view_origin - position).normalize();
                let r = up.cross(to_cam).normalize();
                (r, to_cam.cross(r))
            }
        }
    }
}
