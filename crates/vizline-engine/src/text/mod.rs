//! Fonts and text layout.

mod bake;
mod font;
mod layout;
mod table;

pub use bake::bake_font;
pub use font::{covered_chars, glyph_index, BakedFont, Font, FontId, GlyphQuad, FALLBACK_CHAR, GLYPH_COUNT};
pub use layout::{alignment_offset, measure, TextAlign, TextBaseline, TextLayout, TextStyle, VERTICES_PER_GLYPH};

pub(crate) use layout::emit_run;
pub(crate) use table::FontTable;

#[cfg(test)]
pub(crate) use layout::tests::mono_font;
