//! Font rasterization into a glyph atlas.
//!
//! Every covered code point is rasterized once through `fontdue` and packed
//! into a fixed-size R8 atlas with a shelf packer. Baking happens at load
//! time, never per frame.

use crate::error::{Error, Result};

use super::{covered_chars, BakedFont, GlyphQuad, GLYPH_COUNT};

const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Row-by-row rectangle packer.
struct ShelfPacker {
    width: u32,
    height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Top-left corner of a free `w x h` slot, or `None` once the atlas is full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.width {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.height || self.cursor_x + w + GLYPH_PADDING > self.width {
            log::warn!(
                "font atlas is full ({}×{}); some glyphs will not be rendered",
                self.width,
                self.height
            );
            self.full = true;
            return None;
        }

        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

/// Rasterizes the covered glyph range of a TrueType/OpenType font.
///
/// Glyphs that do not fit in the atlas keep their advance but draw nothing.
pub fn bake_font(name: &str, bytes: &[u8], pixel_size: f32, atlas_width: u32, atlas_height: u32) -> Result<BakedFont> {
    let settings = fontdue::FontSettings { scale: pixel_size, ..fontdue::FontSettings::default() };
    let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| Error::FontParse(e.to_string()))?;

    let (ascent, descent, line_gap) = match font.horizontal_line_metrics(pixel_size) {
        Some(m) => (m.ascent, m.descent, m.line_gap),
        None => {
            log::warn!("font '{name}' has no horizontal metrics; estimating from pixel size");
            (pixel_size * 0.8, -pixel_size * 0.2, 0.0)
        }
    };

    let mut bitmap = vec![0u8; atlas_width as usize * atlas_height as usize];
    let mut packer = ShelfPacker::new(atlas_width, atlas_height);
    let mut glyphs = Vec::with_capacity(GLYPH_COUNT);
    let (aw, ah) = (atlas_width.max(1) as f32, atlas_height.max(1) as f32);

    for ch in covered_chars() {
        let (m, coverage) = font.rasterize(ch, pixel_size);
        let (w, h) = (m.width as u32, m.height as u32);
        let mut quad = GlyphQuad { advance: m.advance_width, ..GlyphQuad::default() };

        if w > 0 && h > 0 {
            if let Some((x, y)) = packer.place(w, h) {
                for row in 0..h as usize {
                    let src = &coverage[row * w as usize..(row + 1) * w as usize];
                    let dst = (y as usize + row) * atlas_width as usize + x as usize;
                    bitmap[dst..dst + w as usize].copy_from_slice(src);
                }
                quad.x0 = m.xmin as f32;
                quad.y0 = -(m.ymin as f32 + h as f32);
                quad.x1 = m.xmin as f32 + w as f32;
                quad.y1 = -(m.ymin as f32);
                quad.u0 = x as f32 / aw;
                quad.v0 = y as f32 / ah;
                quad.u1 = (x + w) as f32 / aw;
                quad.v1 = (y + h) as f32 / ah;
            }
        }
        glyphs.push(quad);
    }

    log::debug!("baked font '{name}' at {pixel_size}px into {atlas_width}×{atlas_height} atlas");

    Ok(BakedFont {
        name: name.to_owned(),
        pixel_size,
        ascent,
        descent,
        line_gap,
        atlas_width,
        atlas_height,
        bitmap,
        glyphs,
    })
}
