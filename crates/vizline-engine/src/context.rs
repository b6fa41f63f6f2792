//! The recording context.
//!
//! Responsibilities:
//! - own the vertex, command and font stores for the context's lifetime
//! - hold paint state (color, transform, size, detail, cull and depth flags)
//! - run every primitive through one checked path: protocol, capacity, cull, emit
//! - hand finished frames to the backend

use std::path::Path;

use crate::buffer::{FixedBuffer, Overflow};
use crate::command::{Command, CommandList, DrawMode};
use crate::config::{Config, Validation, MAX_DETAIL_LEVEL};
use crate::cull::Plane;
use crate::error::{Error, Result};
use crate::frame::{Camera, FrameSetup};
use crate::math::{self, Mat3, Mat4, Vec2, Vec3};
use crate::paint::Color;
use crate::render::{Backend, RenderData};
use crate::tessellate::shapes::{Arc, Arrow, BoxShape, Cone, ConicalFrustum, Grid, Line, Point, Quad, Sphere, Torus};
use crate::tessellate::{resolution, Bounds, Emitter, Shape};
use crate::text::{self, BakedFont, Font, FontId, FontTable, TextLayout, TextStyle, GLYPH_COUNT, VERTICES_PER_GLYPH};
use crate::vertex::Vertex;

fn vertex_overflow(o: Overflow) -> Error {
    Error::OutOfVertexBuffer { requested: o.requested, available: o.available }
}

/// Immediate-mode recorder for one frame of debug geometry.
///
/// A frame is `new_frame`, any number of `begin_command` / primitives /
/// `end_command` sequences, an optional `sort`, then `render`. Every
/// primitive either writes all of its vertices or none.
pub struct Context<B: Backend> {
    config: Config,
    backend: B,
    vertices: FixedBuffer<Vertex>,
    commands: CommandList,
    fonts: FontTable,
    camera: Camera,

    color: Color,
    transform: Mat4,
    size: f32,
    detail_level: u32,
    frustum_cull: bool,
    depth_test: bool,
    font: Option<FontId>,

    terminated: bool,
}

impl<B: Backend> Context<B> {
    /// Allocates the fixed buffers and initializes the backend.
    pub fn new(config: Config, mut backend: B) -> Result<Self> {
        backend.init(&config).map_err(Error::Backend)?;
        log::info!(
            "context initialized: {} vertices, {} commands, {} fonts",
            config.max_vertices,
            config.max_commands,
            config.max_fonts
        );
        Ok(Self {
            vertices: FixedBuffer::new(config.max_vertices),
            commands: CommandList::new(config.max_commands),
            fonts: FontTable::new(config.max_fonts),
            camera: Camera::default(),
            color: Color::WHITE,
            transform: Mat4::IDENTITY,
            size: 1.0,
            detail_level: config.detail_level.min(MAX_DETAIL_LEVEL),
            frustum_cull: config.enable_frustum_cull,
            depth_test: config.enable_depth_test,
            font: None,
            terminated: false,
            backend,
            config,
        })
    }

    /// Releases fonts and buffers and terminates the backend. Idempotent;
    /// also runs on drop.
    pub fn term(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        for font in self.fonts.as_slice() {
            self.backend.destroy_font_texture(font.texture());
        }
        self.backend.term();
        self.fonts.release();
        self.vertices.release();
        self.commands.release();
        log::info!("context terminated");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Starts a frame: drops recorded geometry (including an open command)
    /// and replaces the camera state.
    pub fn new_frame(&mut self, setup: &FrameSetup) {
        self.vertices.clear();
        self.commands.clear();
        self.camera = Camera::from_setup(setup);
        log::trace!("new frame ({:?})", setup.projection);
    }

    /// Orders commands by draw mode, then depth key.
    pub fn sort(&mut self) -> Result<()> {
        let r = self.commands.sort();
        self.validate("sort", r)
    }

    /// Hands the frame to the backend.
    pub fn render(&mut self) -> Result<()> {
        let r = self.render_frame();
        self.validate("render", r)
    }

    fn render_frame(&mut self) -> Result<()> {
        if self.commands.is_recording() {
            return Err(Error::PrevCommandNotEnded);
        }
        log::debug!(
            "render: {} vertices in {} commands",
            self.vertices.len(),
            self.commands.len()
        );
        let frame = RenderData {
            vertices: self.vertices.as_slice(),
            commands: self.commands.as_slice(),
            camera: &self.camera,
            fonts: self.fonts.as_slice(),
            config: &self.config,
        };
        self.backend.render(&frame).map_err(Error::Backend)
    }

    // ── commands ──────────────────────────────────────────────────────────

    /// Opens a command. The current transform, depth-test flag and (for
    /// text) font are fixed for the command's lifetime.
    pub fn begin_command(&mut self, mode: DrawMode) -> Result<()> {
        let cmd = Command::open(
            mode,
            self.vertices.len() as u32,
            self.transform,
            self.depth_test,
            if mode == DrawMode::Text { self.font } else { None },
        );
        let r = self.commands.begin(cmd).map(|_| ());
        self.validate("begin_command", r)
    }

    pub fn end_command(&mut self) -> Result<()> {
        if let Some(cmd) = self.commands.open_mut() {
            if !cmd.min_depth.is_finite() {
                cmd.min_depth = 0.0;
            }
        }
        let r = self.commands.end().map(|_| ());
        self.validate("end_command", r)
    }

    /// Sets the open command's sort depth.
    pub fn set_command_depth(&mut self, depth: f32) -> Result<()> {
        let r = match self.commands.open_mut() {
            Some(cmd) => {
                cmd.min_depth = depth;
                Ok(())
            }
            None => Err(Error::NoActiveCommand),
        };
        self.validate("set_command_depth", r)
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.commands.is_recording()
    }

    // ── paint state ───────────────────────────────────────────────────────

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Replaces the local-to-world transform. Rejected while a command is open.
    pub fn set_transform(&mut self, transform: Mat4) -> Result<()> {
        let r = if self.commands.is_recording() {
            Err(Error::PrevCommandNotEnded)
        } else {
            self.transform = transform;
            Ok(())
        };
        self.validate("set_transform", r)
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Point diameter or line width in pixels.
    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Clamped to `0..=MAX_DETAIL_LEVEL`.
    pub fn set_detail_level(&mut self, level: u32) {
        self.detail_level = level.min(MAX_DETAIL_LEVEL);
    }

    pub fn detail_level(&self) -> u32 {
        self.detail_level
    }

    pub fn set_frustum_cull(&mut self, enabled: bool) {
        self.frustum_cull = enabled;
    }

    pub fn frustum_cull(&self) -> bool {
        self.frustum_cull
    }

    /// Applies to commands opened afterwards.
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Font used by text commands opened afterwards.
    pub fn set_font(&mut self, font: FontId) -> Result<()> {
        let r = self.fonts.get(font).map(|_| self.font = Some(font));
        self.validate("set_font", r)
    }

    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    // ── primitives ────────────────────────────────────────────────────────

    pub fn point(&mut self, p: Vec3) -> Result<()> {
        let r = self.draw(&Point(p));
        self.validate("point", r)
    }

    pub fn line(&mut self, a: Vec3, b: Vec3) -> Result<()> {
        let r = self.draw(&Line { a, b });
        self.validate("line", r)
    }

    /// Planar quad; corners counter-clockwise as seen from the front.
    pub fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Result<()> {
        let r = self.draw(&Quad { corners: [a, b, c, d] });
        self.validate("quad", r)
    }

    /// Axis-aligned rectangle in the local XY plane.
    pub fn rect(&mut self, min: Vec2, max: Vec2) -> Result<()> {
        let r = self.draw(&Quad::rect(min.to_array(), max.to_array(), 0.0));
        self.validate("rect", r)
    }

    /// Lines every `step` units over `[min, max]` on the local XZ plane,
    /// with `min`/`max` given as `(x, z)`.
    pub fn grid(&mut self, min: Vec2, max: Vec2, step: f32) -> Result<()> {
        let r = self.draw(&Grid { min: min.to_array(), max: max.to_array(), step });
        self.validate("grid", r)
    }

    /// Circle in the local XY plane.
    pub fn circle(&mut self, center: Vec3, radius: f32) -> Result<()> {
        let r = self.draw(&Arc::circle(center, radius));
        self.validate("circle", r)
    }

    /// Arc in the local XY plane from +X, counter-clockwise through `angle` radians.
    pub fn arc(&mut self, center: Vec3, radius: f32, angle: f32) -> Result<()> {
        let r = self.draw(&Arc::new(center, radius, angle));
        self.validate("arc", r)
    }

    pub fn aabb(&mut self, min: Vec3, max: Vec3) -> Result<()> {
        let r = self.draw(&BoxShape::aabb(min, max));
        self.validate("aabb", r)
    }

    /// Oriented box; `axes` holds the three half-extent vectors as columns.
    pub fn obb(&mut self, center: Vec3, axes: Mat3) -> Result<()> {
        let r = self.draw(&BoxShape::obb(center, axes));
        self.validate("obb", r)
    }

    pub fn sphere(&mut self, center: Vec3, radius: f32) -> Result<()> {
        let r = self.draw(&Sphere { center, radius });
        self.validate("sphere", r)
    }

    pub fn cone(&mut self, base: Vec3, apex: Vec3, radius: f32) -> Result<()> {
        let r = self.draw(&Cone { base, apex, radius });
        self.validate("cone", r)
    }

    pub fn conical_frustum(&mut self, base: Vec3, apex: Vec3, base_radius: f32, apex_radius: f32) -> Result<()> {
        let r = self.draw(&ConicalFrustum { base, apex, base_radius, apex_radius });
        self.validate("conical_frustum", r)
    }

    pub fn cylinder(&mut self, base: Vec3, apex: Vec3, radius: f32) -> Result<()> {
        let r = self.draw(&ConicalFrustum { base, apex, base_radius: radius, apex_radius: radius });
        self.validate("cylinder", r)
    }

    /// Shaft from `base` plus a cone head ending at `apex`. `head_length` is
    /// the fraction of the segment taken by the head.
    pub fn arrow(&mut self, base: Vec3, apex: Vec3, shaft_radius: f32, head_radius: f32, head_length: f32) -> Result<()> {
        let r = self.draw(&Arrow::new(base, apex, shaft_radius, head_radius, head_length));
        self.validate("arrow", r)
    }

    /// Torus around the local Z axis.
    pub fn torus(&mut self, center: Vec3, radius: f32, tube_radius: f32) -> Result<()> {
        let r = self.draw(&Torus { center, radius, tube_radius });
        self.validate("torus", r)
    }

    /// View volume of another camera.
    pub fn camera_frustum(&mut self, view: &Mat4, proj: &Mat4) -> Result<()> {
        let r = self.require_open().and_then(|_| BoxShape::camera_frustum(view, proj)).and_then(|b| self.draw(&b));
        self.validate("camera_frustum", r)
    }

    /// Rectangle centered at `center` facing the camera.
    pub fn billboard_rect(&mut self, center: Vec3, half_width: f32, half_height: f32) -> Result<()> {
        let r = self.billboard_axes(center).and_then(|(right, up)| {
            let (x, y) = (right * half_width, up * half_height);
            self.draw(&Quad { corners: [center - x - y, center + x - y, center + x + y, center - x + y] })
        });
        self.validate("billboard_rect", r)
    }

    /// Circle centered at `center` facing the camera.
    pub fn billboard_circle(&mut self, center: Vec3, radius: f32) -> Result<()> {
        let r = self.billboard_axes(center).and_then(|(right, up)| {
            let basis = Mat3::from_cols(right, up, right.cross(up));
            self.draw(&Arc::circle(center, radius).with_basis(basis))
        });
        self.validate("billboard_circle", r)
    }

    /// Lays out `text` at `position` (command-local space) in screen pixels.
    ///
    /// Requires an open [`DrawMode::Text`] command with a font.
    pub fn text(&mut self, text: &str, position: Vec3, style: &TextStyle) -> Result<TextLayout> {
        let r = self.draw_text(text, position, style);
        self.validate("text", r)
    }

    /// Width and height `text` would occupy, without recording anything.
    pub fn text_size(&self, text: &str, font: FontId, size: f32) -> Result<Vec2> {
        let r = self.fonts.get(font).map(|f| text::measure(f, text, size));
        self.validate("text_size", r)
    }

    // ── fonts ─────────────────────────────────────────────────────────────

    /// Bakes a TrueType/OpenType font and registers it.
    pub fn load_font(&mut self, name: &str, bytes: &[u8], pixel_size: f32, atlas_width: u32, atlas_height: u32) -> Result<FontId> {
        let r = self
            .fonts
            .check_room()
            .and_then(|_| text::bake_font(name, bytes, pixel_size, atlas_width, atlas_height))
            .and_then(|baked| self.add_font(baked));
        self.validate("load_font", r)
    }

    /// Reads a font file and registers it under its file stem.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>, pixel_size: f32, atlas_width: u32, atlas_height: u32) -> Result<FontId> {
        let path = path.as_ref();
        let r = std::fs::read(path).map_err(|e| {
            log::debug!("cannot read {}: {e}", path.display());
            Error::FontFileNotFound(path.to_path_buf())
        });
        let r = r.and_then(|bytes| {
            let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
            self.fonts
                .check_room()
                .and_then(|_| text::bake_font(&name, &bytes, pixel_size, atlas_width, atlas_height))
                .and_then(|baked| self.add_font(baked))
        });
        self.validate("load_font_file", r)
    }

    /// Registers a font baked elsewhere. The bitmap is uploaded to the
    /// backend and dropped.
    pub fn register_font(&mut self, baked: BakedFont) -> Result<FontId> {
        let r = self.add_font(baked);
        self.validate("register_font", r)
    }

    pub fn find_font(&self, name: &str) -> Option<FontId> {
        self.fonts.find(name)
    }

    pub fn get_font(&self, id: FontId) -> Result<&Font> {
        self.fonts.get(id)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn add_font(&mut self, baked: BakedFont) -> Result<FontId> {
        self.fonts.check_room()?;
        if baked.glyphs.len() != GLYPH_COUNT {
            return Err(Error::FontParse(format!(
                "glyph table has {} entries, expected {GLYPH_COUNT}",
                baked.glyphs.len()
            )));
        }
        if baked.bitmap.len() != baked.atlas_width as usize * baked.atlas_height as usize {
            return Err(Error::FontParse(format!(
                "atlas bitmap is {} bytes, expected {}×{}",
                baked.bitmap.len(),
                baked.atlas_width,
                baked.atlas_height
            )));
        }
        let texture = self
            .backend
            .create_font_texture(&baked.bitmap, baked.atlas_width, baked.atlas_height)
            .map_err(Error::Backend)?;
        let name = baked.name.clone();
        let id = self.fonts.add(Font::from_baked(baked, texture))?;
        if self.font.is_none() {
            self.font = Some(id);
        }
        log::info!("registered font '{name}' as #{}", id.index());
        Ok(id)
    }

    // ── camera and culling queries ────────────────────────────────────────

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn view_origin(&self) -> Vec3 {
        self.camera.view_origin
    }

    /// World-space length covering `pixels` on screen at world `position`.
    pub fn pixels_to_world_size(&self, position: Vec3, pixels: f32) -> f32 {
        self.camera.pixels_to_world_size(position, pixels)
    }

    pub fn frustum_planes(&self) -> &[Plane; 6] {
        &self.camera.frustum.planes
    }

    /// Sphere in the current transform's space. Always passes with culling off.
    pub fn frustum_test_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.visible(&self.transform, Bounds::Sphere { center, radius })
    }

    pub fn frustum_test_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.visible(&self.transform, Bounds::Aabb { min, max })
    }

    pub fn frustum_test_obb(&self, center: Vec3, axes: &Mat3) -> bool {
        self.visible(&self.transform, Bounds::Obb { center, axes: *axes })
    }

    // ── frame statistics ──────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn command_capacity(&self) -> usize {
        self.commands.capacity()
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    pub fn commands(&self) -> &[Command] {
        self.commands.as_slice()
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn require_open(&self) -> Result<&Command> {
        self.commands.open().ok_or(Error::NoActiveCommand)
    }

    fn visible(&self, transform: &Mat4, bounds: Bounds) -> bool {
        if !self.frustum_cull {
            return true;
        }
        let f = &self.camera.frustum;
        match bounds {
            Bounds::Sphere { center, radius } => f.test_sphere_in(transform, center, radius),
            Bounds::Aabb { min, max } => f.test_aabb_in(transform, min, max),
            Bounds::Obb { center, axes } => f.test_obb_in(transform, center, &axes),
        }
    }

    /// The one path from a shape into the vertex stream.
    fn draw(&mut self, shape: &dyn Shape) -> Result<()> {
        let cmd = self.require_open()?;
        let (mode, transform) = (cmd.mode, cmd.transform);
        let res = resolution(self.detail_level);
        let count = shape.vertex_count(mode, res).ok_or(Error::InvalidMode { mode })?;

        self.vertices.check(count).map_err(vertex_overflow)?;
        if !self.visible(&transform, shape.bounds()) {
            return Err(Error::Culled);
        }

        let reserved = self.vertices.reserve(count).map_err(vertex_overflow)?;
        let mut out = Emitter::new(reserved, self.color, self.size);
        shape.emit(mode, res, &mut out);
        let written = out.written();
        debug_assert_eq!(written, count);

        if let Some(cmd) = self.commands.open_mut() {
            cmd.vertex_count += written as u32;
        }
        Ok(())
    }

    /// Camera-facing axes at `center`, expressed in the open command's local space.
    fn billboard_axes(&self, center: Vec3) -> Result<(Vec3, Vec3)> {
        let transform = self.require_open()?.transform;
        let inv = math::try_inverse(&transform).ok_or(Error::SingularMatrix)?;
        let (right, up) = self.camera.billboard_axes(transform.transform_point3(center));
        Ok((inv.transform_vector3(right), inv.transform_vector3(up)))
    }

    fn draw_text(&mut self, text: &str, position: Vec3, style: &TextStyle) -> Result<TextLayout> {
        let cmd = self.require_open()?;
        if cmd.mode != DrawMode::Text {
            return Err(Error::InvalidMode { mode: cmd.mode });
        }
        let transform = cmd.transform;
        let font_id = cmd.font.ok_or(Error::OutOfBoundsAccess { index: 0, len: self.fonts.len() })?;
        let font = self.fonts.get(font_id)?;

        let count = text.chars().count() * VERTICES_PER_GLYPH;
        self.vertices.check(count).map_err(vertex_overflow)?;

        let world = transform.transform_point3(position);
        if self.frustum_cull && !self.camera.frustum.test_aabb(world, world) {
            return Err(Error::Culled);
        }
        let anchor = self.camera.world_to_viewport(world).ok_or(Error::Culled)?;

        let reserved = self.vertices.reserve(count).map_err(vertex_overflow)?;
        let mut out = Emitter::new(reserved, self.color, self.size);
        let layout = text::emit_run(font, text, anchor, style, self.color, &mut out);
        let written = out.written();

        if let Some(cmd) = self.commands.open_mut() {
            cmd.vertex_count += written as u32;
            cmd.min_depth = cmd.min_depth.min(anchor.z);
        }
        Ok(layout)
    }

    /// Applies the validation policy to an operation's outcome.
    fn validate<T>(&self, op: &str, r: Result<T>) -> Result<T> {
        match &r {
            Err(err) if !err.is_culled() => {
                log::debug!("{op} rejected: {err}");
                if self.config.validation == Validation::Abort {
                    log::error!("{op} failed: {err}");
                    panic!("vizline: {op} failed: {err}");
                }
            }
            _ => {}
        }
        r
    }
}

impl<B: Backend> Drop for Context<B> {
    fn drop(&mut self) {
        self.term();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullBackend;
    use crate::text::{TextAlign, TextBaseline};

    fn ctx(max_vertices: usize, max_commands: usize) -> Context<NullBackend> {
        let config = Config::default().with_capacity(max_vertices, max_commands);
        let mut c = Context::new(config, NullBackend::new()).unwrap();
        c.new_frame(&FrameSetup::default());
        c
    }

    fn with_mono_font(c: &mut Context<NullBackend>) -> FontId {
        let font = crate::text::mono_font();
        let glyphs = (0..GLYPH_COUNT).map(|i| font.glyph(crate::text::covered_chars().nth(i).unwrap_or(' '))).collect();
        c.register_font(BakedFont {
            name: "mono".into(),
            pixel_size: font.pixel_size(),
            ascent: font.ascent(),
            descent: font.descent(),
            line_gap: font.line_gap(),
            atlas_width: 4,
            atlas_height: 4,
            bitmap: vec![0; 16],
            glyphs,
        })
        .unwrap()
    }

    // ── protocol ──────────────────────────────────────────────────────────

    #[test]
    fn primitive_without_command_is_rejected() {
        let mut c = ctx(64, 4);
        assert!(matches!(c.point(Vec3::ZERO), Err(Error::NoActiveCommand)));
        assert!(matches!(c.end_command(), Err(Error::NoActiveCommand)));
        assert_eq!(c.vertex_count(), 0);
    }

    #[test]
    fn nested_begin_is_rejected() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Fill).unwrap();
        assert!(matches!(c.begin_command(DrawMode::Fill), Err(Error::PrevCommandNotEnded)));
        assert_eq!(c.command_count(), 1);
    }

    #[test]
    fn transform_is_frozen_while_recording() {
        let mut c = ctx(64, 4);
        let t = Mat4::from_translation(Vec3::new(0.1, 0.0, 0.0));
        c.set_transform(t).unwrap();
        c.begin_command(DrawMode::Point).unwrap();
        assert!(matches!(c.set_transform(Mat4::IDENTITY), Err(Error::PrevCommandNotEnded)));
        c.end_command().unwrap();
        assert_eq!(c.commands()[0].transform, t);
    }

    #[test]
    fn render_requires_closed_command() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Point).unwrap();
        assert!(matches!(c.render(), Err(Error::PrevCommandNotEnded)));
        c.end_command().unwrap();
        c.render().unwrap();
        assert_eq!(c.backend().render_calls, 1);
    }

    #[test]
    fn command_buffer_exhaustion() {
        let mut c = ctx(64, 1);
        c.begin_command(DrawMode::Point).unwrap();
        c.end_command().unwrap();
        assert!(matches!(
            c.begin_command(DrawMode::Point),
            Err(Error::OutOfCommandBuffer { capacity: 1 })
        ));
    }

    // ── primitives ────────────────────────────────────────────────────────

    #[test]
    fn vertex_overflow_leaves_stream_untouched() {
        let mut c = ctx(40, 4);
        c.begin_command(DrawMode::Fill).unwrap();
        c.aabb(Vec3::splat(-0.5), Vec3::splat(0.5)).unwrap();
        let err = c.aabb(Vec3::splat(-0.5), Vec3::splat(0.5)).unwrap_err();
        assert!(matches!(err, Error::OutOfVertexBuffer { requested: 36, available: 4 }));
        assert_eq!(c.vertex_count(), 36);
        c.end_command().unwrap();
        assert_eq!(c.commands()[0].vertex_count, 36);
    }

    #[test]
    fn grid_with_tiny_step_overflows_cleanly() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Stroke).unwrap();
        let err = c.grid(Vec2::new(-0.5, -0.5), Vec2::new(0.5, 0.5), 1e-30).unwrap_err();
        assert!(matches!(err, Error::OutOfVertexBuffer { available: 64, .. }));
        assert_eq!(c.vertex_count(), 0);
        c.end_command().unwrap();
        assert_eq!(c.commands()[0].vertex_count, 0);
    }

    #[test]
    fn text_overflow_writes_no_glyphs() {
        let mut c = ctx(16, 4);
        with_mono_font(&mut c);
        c.begin_command(DrawMode::Text).unwrap();
        let style = TextStyle::new(10.0);
        c.text("ab", Vec3::ZERO, &style).unwrap();
        let err = c.text("abc", Vec3::ZERO, &style).unwrap_err();
        assert!(matches!(err, Error::OutOfVertexBuffer { requested: 18, available: 4 }));
        assert_eq!(c.vertex_count(), 12);
        c.end_command().unwrap();
        assert_eq!(c.commands()[0].vertex_count, 12);
    }

    #[test]
    fn unsupported_mode_is_reported() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Fill).unwrap();
        assert!(matches!(c.point(Vec3::ZERO), Err(Error::InvalidMode { mode: DrawMode::Fill })));
        assert!(matches!(
            c.text("x", Vec3::ZERO, &TextStyle::default()),
            Err(Error::InvalidMode { mode: DrawMode::Fill })
        ));
    }

    #[test]
    fn culled_primitive_writes_nothing() {
        let mut c = ctx(256, 4);
        c.begin_command(DrawMode::Stroke).unwrap();
        let far = Vec3::new(10.0, 0.0, 0.0);
        assert!(c.sphere(far, 0.5).unwrap_err().is_culled());
        assert_eq!(c.vertex_count(), 0);
        c.set_frustum_cull(false);
        c.sphere(far, 0.5).unwrap();
        assert_eq!(c.vertex_count(), 6 * 16);
    }

    #[test]
    fn culling_respects_command_transform() {
        let mut c = ctx(64, 4);
        c.set_transform(Mat4::from_translation(Vec3::new(-10.0, 0.0, 0.0))).unwrap();
        c.begin_command(DrawMode::Point).unwrap();
        // local (10, 0, 0) lands on the origin
        c.point(Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!(c.point(Vec3::ZERO).unwrap_err().is_culled());
    }

    #[test]
    fn paint_state_is_stamped() {
        let mut c = ctx(64, 4);
        c.set_color(Color::CYAN);
        c.set_size(3.0);
        c.begin_command(DrawMode::Stroke).unwrap();
        c.line(Vec3::ZERO, Vec3::X * 0.5).unwrap();
        for v in c.vertices() {
            assert_eq!(v.color, Color::CYAN.to_array());
            assert_eq!(v.size(), 3.0);
        }
    }

    #[test]
    fn detail_level_is_clamped() {
        let mut c = ctx(4096, 4);
        c.set_detail_level(9);
        assert_eq!(c.detail_level(), MAX_DETAIL_LEVEL);
        c.begin_command(DrawMode::Point).unwrap();
        c.circle(Vec3::ZERO, 0.5).unwrap();
        assert_eq!(c.vertex_count(), 64);
    }

    #[test]
    fn billboard_faces_orthographic_camera() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Fill).unwrap();
        c.billboard_rect(Vec3::ZERO, 0.5, 0.25).unwrap();
        let v = c.vertices();
        let n = (v[1].position() - v[0].position()).cross(v[2].position() - v[0].position());
        assert!(n.z > 0.0);
        assert!((v[2].position() - Vec3::new(0.5, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn singular_camera_frustum_is_reported() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Stroke).unwrap();
        let flat = Mat4::from_scale(Vec3::ZERO);
        assert!(matches!(c.camera_frustum(&Mat4::IDENTITY, &flat), Err(Error::SingularMatrix)));
        c.camera_frustum(&Mat4::IDENTITY, &Mat4::IDENTITY).unwrap();
        assert_eq!(c.vertex_count(), 24);
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn text_lands_in_viewport_pixels() {
        let mut c = ctx(256, 4);
        with_mono_font(&mut c);
        c.new_frame(&FrameSetup { viewport: crate::frame::Viewport::sized(200.0, 100.0), ..FrameSetup::default() });
        c.begin_command(DrawMode::Text).unwrap();
        let style = TextStyle::new(10.0).with_align(TextAlign::Center).with_baseline(TextBaseline::Middle);
        let layout = c.text("ab", Vec3::new(0.0, 0.0, 0.5), &style).unwrap();
        assert_eq!(layout.width, 20.0);
        assert_eq!(layout.anchor, Vec3::new(100.0, 50.0, 0.5));
        c.end_command().unwrap();
        let cmd = c.commands()[0];
        assert_eq!(cmd.vertex_count, 12);
        assert_eq!(cmd.min_depth, 0.5);
        assert_eq!(cmd.font, Some(FontId(0)));
    }

    #[test]
    fn text_without_font_is_out_of_bounds() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Text).unwrap();
        assert!(matches!(
            c.text("x", Vec3::ZERO, &TextStyle::default()),
            Err(Error::OutOfBoundsAccess { index: 0, len: 0 })
        ));
    }

    #[test]
    fn font_table_limit() {
        let config = Config::default().with_max_fonts(1);
        let mut c = Context::new(config, NullBackend::new()).unwrap();
        let id = with_mono_font(&mut c);
        assert_eq!(c.find_font("mono"), Some(id));
        assert_eq!(c.font(), Some(id));
        assert!(matches!(
            c.load_font("other", &[], 16.0, 64, 64),
            Err(Error::FontLimitReached { max: 1 })
        ));
        assert!(matches!(c.set_font(FontId(3)), Err(Error::OutOfBoundsAccess { index: 3, len: 1 })));
    }

    #[test]
    fn missing_font_file() {
        let mut c = ctx(64, 4);
        let err = c.load_font_file("/nonexistent/vizline.ttf", 16.0, 256, 256).unwrap_err();
        assert!(matches!(err, Error::FontFileNotFound(_)));
    }

    #[test]
    fn malformed_baked_font_is_rejected() {
        let mut c = ctx(64, 4);
        let baked = BakedFont {
            name: "bad".into(),
            pixel_size: 10.0,
            ascent: 8.0,
            descent: -2.0,
            line_gap: 0.0,
            atlas_width: 2,
            atlas_height: 2,
            bitmap: vec![0; 4],
            glyphs: Vec::new(),
        };
        assert!(matches!(c.register_font(baked), Err(Error::FontParse(_))));
        assert_eq!(c.backend().live_textures, 0);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn term_is_idempotent_and_releases_textures() {
        let mut c = ctx(64, 4);
        with_mono_font(&mut c);
        assert_eq!(c.backend().live_textures, 1);
        c.term();
        c.term();
        assert_eq!(c.backend().term_calls, 1);
        assert_eq!(c.backend().live_textures, 0);
        assert_eq!(c.vertex_capacity(), 0);
        assert_eq!(c.font_count(), 0);
    }

    #[test]
    fn backend_failure_is_wrapped() {
        let mut c = Context::new(Config::default(), NullBackend::failing()).unwrap();
        c.new_frame(&FrameSetup::default());
        assert!(matches!(c.render(), Err(Error::Backend(_))));
    }

    #[test]
    fn new_frame_discards_open_command() {
        let mut c = ctx(64, 4);
        c.begin_command(DrawMode::Point).unwrap();
        c.point(Vec3::ZERO).unwrap();
        c.new_frame(&FrameSetup::default());
        assert!(!c.is_recording());
        assert_eq!(c.vertex_count(), 0);
        assert_eq!(c.command_count(), 0);
    }

    #[test]
    #[should_panic(expected = "vizline: begin_command failed")]
    fn abort_policy_panics() {
        let config = Config::default().with_validation(Validation::Abort);
        let mut c = Context::new(config, NullBackend::new()).unwrap();
        c.new_frame(&FrameSetup::default());
        c.begin_command(DrawMode::Point).unwrap();
        let _ = c.begin_command(DrawMode::Point);
    }

    #[test]
    fn abort_policy_never_escalates_culling() {
        let config = Config::default().with_validation(Validation::Abort);
        let mut c = Context::new(config, NullBackend::new()).unwrap();
        c.new_frame(&FrameSetup::default());
        c.begin_command(DrawMode::Point).unwrap();
        assert!(c.point(Vec3::splat(5.0)).unwrap_err().is_culled());
    }
}
