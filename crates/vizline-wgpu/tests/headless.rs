//! Offscreen frames drawn on a real adapter.
//!
//! Ignored by default: they need a GPU or a software adapter.
//! Run with `cargo test -p vizline-wgpu -- --ignored`.

use vizline_engine::logging::{init_logging, LoggingConfig};
use vizline_engine::math::{Mat4, Vec3};
use vizline_engine::text::{BakedFont, GlyphQuad, TextStyle, GLYPH_COUNT};
use vizline_engine::{Color, Config, Context, DrawMode, FrameSetup, Viewport};
use vizline_wgpu::{Gpu, GpuInit, WgpuBackend};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn setup() -> (Gpu, Context<WgpuBackend>) {
    init_logging(LoggingConfig::for_tests());
    let gpu = Gpu::new_blocking(GpuInit { force_fallback_adapter: true, ..GpuInit::default() })
        .or_else(|_| Gpu::new_blocking(GpuInit::default()))
        .expect("no adapter available");
    let backend = WgpuBackend::new(gpu.device().clone(), gpu.queue().clone(), FORMAT);
    let config = Config::default().with_capacity(16 * 1024, 256);
    let ctx = Context::new(config, backend).expect("backend init");
    (gpu, ctx)
}

fn frame(width: f32, height: f32) -> FrameSetup {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 3.0, 8.0), Vec3::ZERO, Vec3::Y);
    FrameSetup::perspective(view, 1.0, 0.1, 100.0, Viewport::sized(width, height))
}

fn solid_font() -> BakedFont {
    let quad = GlyphQuad { x0: 0.0, y0: -8.0, x1: 8.0, y1: 0.0, u0: 0.0, v0: 0.0, u1: 1.0, v1: 1.0, advance: 9.0 };
    BakedFont {
        name: "solid".to_owned(),
        pixel_size: 8.0,
        ascent: 8.0,
        descent: -2.0,
        line_gap: 0.0,
        atlas_width: 4,
        atlas_height: 4,
        bitmap: vec![255; 16],
        glyphs: vec![quad; GLYPH_COUNT],
    }
}

#[test]
#[ignore = "requires a wgpu adapter"]
fn draws_every_mode_offscreen() {
    let (gpu, mut ctx) = setup();
    let texture = gpu.create_target(320, 240, FORMAT);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    ctx.backend_mut().set_target(view, 320, 240);

    ctx.register_font(solid_font()).unwrap();
    ctx.new_frame(&frame(320.0, 240.0));

    ctx.begin_command(DrawMode::Stroke).unwrap();
    ctx.set_color(Color::GREEN);
    ctx.aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
    ctx.line(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)).unwrap();
    ctx.end_command().unwrap();

    ctx.begin_command(DrawMode::Fill).unwrap();
    ctx.sphere(Vec3::new(2.0, 0.0, 0.0), 0.5).unwrap();
    ctx.end_command().unwrap();

    ctx.begin_command(DrawMode::Point).unwrap();
    ctx.point(Vec3::new(-2.0, 0.0, 0.0)).unwrap();
    ctx.end_command().unwrap();

    ctx.begin_command(DrawMode::Text).unwrap();
    ctx.text("origin", Vec3::ZERO, &TextStyle::new(16.0)).unwrap();
    ctx.end_command().unwrap();

    ctx.sort().unwrap();
    ctx.render().unwrap();
    assert_eq!(ctx.backend().font_texture_count(), 1);
}

#[test]
#[ignore = "requires a wgpu adapter"]
fn render_without_target_fails() {
    let (_gpu, mut ctx) = setup();
    ctx.new_frame(&frame(64.0, 64.0));
    ctx.begin_command(DrawMode::Stroke).unwrap();
    ctx.circle(Vec3::ZERO, 1.0).unwrap();
    ctx.end_command().unwrap();
    assert!(ctx.render().is_err());
}

#[test]
#[ignore = "requires a wgpu adapter"]
fn term_releases_font_textures() {
    let (_gpu, mut ctx) = setup();
    ctx.register_font(solid_font()).unwrap();
    assert_eq!(ctx.backend().font_texture_count(), 1);
    ctx.term();
    assert_eq!(ctx.backend().font_texture_count(), 0);
}
