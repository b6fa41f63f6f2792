use crate::error::{Error, Result};

use super::{Font, FontId};

/// Fixed-capacity store of registered fonts.
#[derive(Debug)]
pub(crate) struct FontTable {
    fonts: Vec<Font>,
    max: usize,
}

impl FontTable {
    pub(crate) fn new(max: usize) -> Self {
        Self { fonts: Vec::with_capacity(max), max }
    }

    /// Fails with `FontLimitReached` before any work when the table is full.
    pub(crate) fn check_room(&self) -> Result<()> {
        if self.fonts.len() >= self.max {
            Err(Error::FontLimitReached { max: self.max })
        } else {
            Ok(())
        }
    }

    pub(crate) fn add(&mut self, font: Font) -> Result<FontId> {
        self.check_room()?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Result<&Font> {
        self.fonts
            .get(id.0)
            .ok_or(Error::OutOfBoundsAccess { index: id.0, len: self.fonts.len() })
    }

    pub(crate) fn find(&self, name: &str) -> Option<FontId> {
        self.fonts.iter().position(|f| f.name() == name).map(FontId)
    }

    pub(crate) fn as_slice(&self) -> &[Font] {
        &self.fonts
    }

    pub(crate) fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Drops every font and the table's storage.
    pub(crate) fn release(&mut self) {
        self.fonts = Vec::new();
        self.max = 0;
    }
}
