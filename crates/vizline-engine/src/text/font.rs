use crate::render::TextureHandle;

/// Index of a font in a context's font table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

const LATIN: core::ops::RangeInclusive<u32> = 0x20..=0x7E;
const GREEK: core::ops::RangeInclusive<u32> = 0x391..=0x3C9;

/// Number of glyphs in every font's table: printable Latin, then Greek.
pub const GLYPH_COUNT: usize = (0x7E - 0x20 + 1) + (0x3C9 - 0x391 + 1);

/// Code point drawn for characters outside the table.
pub const FALLBACK_CHAR: char = '?';

/// Table slot of `ch`, or `None` if the font does not cover it.
pub fn glyph_index(ch: char) -> Option<usize> {
    let c = ch as u32;
    if LATIN.contains(&c) {
        Some((c - LATIN.start()) as usize)
    } else if GREEK.contains(&c) {
        Some(LATIN.clone().count() + (c - GREEK.start()) as usize)
    } else {
        None
    }
}

/// Every covered code point in table order.
pub fn covered_chars() -> impl Iterator<Item = char> {
    LATIN.chain(GREEK).filter_map(char::from_u32)
}

/// A packed glyph: quad offsets from the pen position in pixels (+Y down,
/// baseline at 0), atlas coordinates normalized to `[0, 1]`, and the pen
/// advance. All values are at the font's baked pixel size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GlyphQuad {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    pub advance: f32,
}

/// A rasterized font: an 8-bit coverage atlas plus the glyph table.
///
/// Produced by [`bake_font`](crate::text::bake_font), or assembled by hand
/// for fonts baked elsewhere.
#[derive(Debug, Clone)]
pub struct BakedFont {
    pub name: String,
    /// Pixel size the glyphs and line metrics were baked at.
    pub pixel_size: f32,
    /// Distance from the baseline to the top of the tallest glyphs. Positive.
    pub ascent: f32,
    /// Distance from the baseline to the lowest descender. Negative.
    pub descent: f32,
    pub line_gap: f32,
    pub atlas_width: u32,
    pub atlas_height: u32,
    /// Row-major coverage, `atlas_width * atlas_height` bytes.
    pub bitmap: Vec<u8>,
    /// `GLYPH_COUNT` entries indexed by [`glyph_index`].
    pub glyphs: Vec<GlyphQuad>,
}

/// A font registered with a context. The atlas lives in the backend.
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    pixel_size: f32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
    atlas_size: (u32, u32),
    glyphs: Vec<GlyphQuad>,
    texture: TextureHandle,
}

impl Font {
    /// Keeps the metrics of `baked` and drops its bitmap.
    pub(crate) fn from_baked(baked: BakedFont, texture: TextureHandle) -> Self {
        Self {
            name: baked.name,
            pixel_size: baked.pixel_size,
            ascent: baked.ascent,
            descent: baked.descent,
            line_gap: baked.line_gap,
            atlas_size: (baked.atlas_width, baked.atlas_height),
            glyphs: baked.glyphs,
            texture,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn line_gap(&self) -> f32 {
        self.line_gap
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        self.atlas_size
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Glyph for `ch`, falling back to [`FALLBACK_CHAR`].
    pub fn glyph(&self, ch: char) -> GlyphQuad {
        glyph_index(ch)
            .or_else(|| glyph_index(FALLBACK_CHAR))
            .and_then(|i| self.glyphs.get(i))
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_latin_then_greek() {
        assert_eq!(GLYPH_COUNT, 152);
        assert_eq!(glyph_index(' '), Some(0));
        assert_eq!(glyph_index('~'), Some(94));
        assert_eq!(glyph_index('Α'), Some(95));
        assert_eq!(glyph_index('ω'), Some(GLYPH_COUNT - 1));
    }

    #[test]
    fn uncovered_chars_have_no_slot() {
        assert_eq!(glyph_index('\n'), None);
        assert_eq!(glyph_index('é'), None);
        assert_eq!(glyph_index('日'), None);
    }

    #[test]
    fn covered_chars_enumerates_table_in_order() {
        let chars: Vec<char> = covered_chars().collect();
        assert_eq!(chars.len(), GLYPH_COUNT);
        for (i, ch) in chars.iter().enumerate() {
            assert_eq!(glyph_index(*ch), Some(i));
        }
    }
}
