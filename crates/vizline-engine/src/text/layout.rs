//! Single-line text runs in viewport pixels.
//!
//! Responsibilities:
//! - measure a run against a font's glyph table
//! - emit one textured quad per character
//! - shift the finished run by its alignment offset

use crate::math::{Vec2, Vec3};
use crate::paint::Color;
use crate::tessellate::Emitter;

use super::Font;

/// Vertices emitted per character.
pub const VERTICES_PER_GLYPH: usize = 6;

/// Horizontal placement of a run relative to its anchor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of a run relative to its anchor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextBaseline {
    #[default]
    Baseline,
    Bottom,
    Middle,
    Top,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    /// Pixel height the font is scaled to.
    pub size: f32,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { size: 16.0, align: TextAlign::Left, baseline: TextBaseline::Baseline }
    }
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Extent and placement of a laid-out run.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextLayout {
    /// Run width in pixels: the span of pen positions.
    pub width: f32,
    /// `(ascent - descent)` at the requested size.
    pub height: f32,
    /// Anchor in viewport pixels; `z` holds the normalized device depth.
    pub anchor: Vec3,
    /// Pen start on the baseline after alignment, in viewport pixels.
    pub origin: Vec2,
}

/// Width and height of `text` at `size` without emitting anything.
pub fn measure(font: &Font, text: &str, size: f32) -> Vec2 {
    let scale = size / font.pixel_size();
    let (min_x, max_x) = pen_extent(font, text, scale);
    Vec2::new(max_x - min_x, (font.ascent() - font.descent()) * scale)
}

fn pen_extent(font: &Font, text: &str, scale: f32) -> (f32, f32) {
    let mut pen = 0.0f32;
    let (mut lo, mut hi) = (0.0f32, 0.0f32);
    for ch in text.chars() {
        pen += font.glyph(ch).advance * scale;
        lo = lo.min(pen);
        hi = hi.max(pen);
    }
    (lo, hi)
}

/// Translation applied to a run of `width` pixels for `style`'s alignment.
pub fn alignment_offset(font: &Font, width: f32, style: &TextStyle) -> Vec2 {
    let scale = style.size / font.pixel_size();
    let dx = match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -0.5 * width,
        TextAlign::Right => -width,
    };
    let dy = match style.baseline {
        TextBaseline::Baseline => 0.0,
        TextBaseline::Bottom => font.descent() * scale,
        TextBaseline::Middle => 0.5 * (font.ascent() + font.descent()) * scale,
        TextBaseline::Top => font.ascent() * scale,
    };
    Vec2::new(dx, dy)
}

/// Emits `text` starting at `anchor` and aligns the result.
///
/// Writes `VERTICES_PER_GLYPH` vertices per character. Vertex alpha is zero;
/// the atlas coverage supplies the opacity.
pub(crate) fn emit_run(
    font: &Font,
    text: &str,
    anchor: Vec3,
    style: &TextStyle,
    color: Color,
    out: &mut Emitter<'_>,
) -> TextLayout {
    let scale = style.size / font.pixel_size();
    let color = color.with_alpha(0);
    let z = anchor.z;

    let mut pen = anchor.x;
    let (mut lo, mut hi) = (pen, pen);
    for ch in text.chars() {
        let g = font.glyph(ch);
        let x0 = pen + g.x0 * scale;
        let x1 = pen + g.x1 * scale;
        let y0 = anchor.y + g.y0 * scale;
        let y1 = anchor.y + g.y1 * scale;

        out.textured(Vec3::new(x0, y0, z), [g.u0, g.v0], color);
        out.textured(Vec3::new(x1, y0, z), [g.u1, g.v0], color);
        out.textured(Vec3::new(x1, y1, z), [g.u1, g.v1], color);
        out.textured(Vec3::new(x0, y0, z), [g.u0, g.v0], color);
        out.textured(Vec3::new(x1, y1, z), [g.u1, g.v1], color);
        out.textured(Vec3::new(x0, y1, z), [g.u0, g.v1], color);

        pen += g.advance * scale;
        lo = lo.min(pen);
        hi = hi.max(pen);
    }

    let width = hi - lo;
    let offset = alignment_offset(font, width, style);
    if offset != Vec2::ZERO {
        for v in out.written_mut() {
            v.translate(offset.x, offset.y);
        }
    }

    TextLayout {
        width,
        height: (font.ascent() - font.descent()) * scale,
        anchor,
        origin: Vec2::new(anchor.x + offset.x, anchor.y + offset.y),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::buffer::FixedBuffer;
    use crate::render::TextureHandle;
    use crate::text::{glyph_index, BakedFont, GlyphQuad, GLYPH_COUNT};

    /// Monospaced 10px font: every glyph is an 8x10 box advancing 10px,
    /// ascent 8, descent -2.
    pub(crate) fn mono_font() -> Font {
        let mut glyphs = vec![GlyphQuad::default(); GLYPH_COUNT];
        for (i, g) in glyphs.iter_mut().enumerate() {
            *g = GlyphQuad {
                x0: 1.0,
                y0: -8.0,
                x1: 9.0,
                y1: 2.0,
                u0: i as f32 / GLYPH_COUNT as f32,
                v0: 0.0,
                u1: (i + 1) as f32 / GLYPH_COUNT as f32,
                v1: 1.0,
                advance: 10.0,
            };
        }
        let baked = BakedFont {
            name: "mono".into(),
            pixel_size: 10.0,
            ascent: 8.0,
            descent: -2.0,
            line_gap: 1.0,
            atlas_width: GLYPH_COUNT as u32,
            atlas_height: 1,
            bitmap: vec![255; GLYPH_COUNT],
            glyphs,
        };
        Font::from_baked(baked, TextureHandle(1))
    }

    fn run(text: &str, style: TextStyle) -> (TextLayout, Vec<crate::vertex::Vertex>) {
        let font = mono_font();
        let count = text.chars().count() * VERTICES_PER_GLYPH;
        let mut buf = FixedBuffer::new(count);
        let layout = {
            let reserved = buf.reserve(count).unwrap();
            let mut out = Emitter::new(reserved, Color::WHITE, 1.0);
            let layout = emit_run(&font, text, Vec3::new(100.0, 50.0, 0.25), &style, Color::RED, &mut out);
            assert_eq!(out.written(), count);
            layout
        };
        (layout, buf.as_slice().to_vec())
    }

    // ── measurement ───────────────────────────────────────────────────────

    #[test]
    fn width_is_sum_of_advances_at_scale() {
        let size = measure(&mono_font(), "abcd", 20.0);
        assert_eq!(size, Vec2::new(80.0, 20.0));
    }

    #[test]
    fn empty_run_has_zero_width() {
        let (layout, verts) = run("", TextStyle::new(10.0));
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 10.0);
        assert!(verts.is_empty());
    }

    #[test]
    fn uncovered_chars_use_fallback_glyph() {
        let font = mono_font();
        let q = font.glyph('?');
        assert_eq!(font.glyph('日'), q);
        assert_eq!(q.u0, glyph_index('?').unwrap() as f32 / GLYPH_COUNT as f32);
    }

    // ── emission ──────────────────────────────────────────────────────────

    #[test]
    fn vertices_carry_zero_alpha_and_depth() {
        let (_, verts) = run("hi", TextStyle::new(10.0));
        assert_eq!(verts.len(), 12);
        for v in &verts {
            assert_eq!(v.color, [255, 0, 0, 0]);
            assert_eq!(v.position().z, 0.25);
        }
    }

    #[test]
    fn left_baseline_starts_at_anchor() {
        let (layout, verts) = run("A", TextStyle::new(10.0));
        assert_eq!(layout.origin, Vec2::new(100.0, 50.0));
        assert_eq!(verts[0].position(), Vec3::new(101.0, 42.0, 0.25));
        assert_eq!(verts[2].position(), Vec3::new(109.0, 52.0, 0.25));
    }

    /// Every vertex of `shifted` sits exactly `offset` away from its
    /// counterpart in `base`.
    fn assert_shifted(base: &[crate::vertex::Vertex], shifted: &[crate::vertex::Vertex], offset: Vec2) {
        assert_eq!(base.len(), shifted.len());
        for (a, b) in base.iter().zip(shifted) {
            assert_eq!(b.position() - a.position(), offset.extend(0.0));
        }
    }

    #[test]
    fn horizontal_alignment_shifts_by_width() {
        let (left, base) = run("ab", TextStyle::new(10.0));
        let (center, v) = run("ab", TextStyle::new(10.0).with_align(TextAlign::Center));
        assert_eq!(center.width, 20.0);
        assert_shifted(&base, &v, Vec2::new(-10.0, 0.0));
        assert_eq!(center.origin, left.origin - Vec2::new(10.0, 0.0));
        let (_, v) = run("ab", TextStyle::new(10.0).with_align(TextAlign::Right));
        assert_shifted(&base, &v, Vec2::new(-20.0, 0.0));
    }

    #[test]
    fn vertical_alignment_uses_scaled_metrics() {
        let style = |b| TextStyle::new(20.0).with_baseline(b);
        let (baseline, base) = run("xy", style(TextBaseline::Baseline));
        assert_eq!(baseline.origin.y, 50.0);
        for (b, dy) in [(TextBaseline::Top, 16.0), (TextBaseline::Bottom, -4.0), (TextBaseline::Middle, 6.0)] {
            let (layout, v) = run("xy", style(b));
            assert_eq!(layout.origin.y, 50.0 + dy);
            assert_shifted(&base, &v, Vec2::new(0.0, dy));
        }
    }
}
