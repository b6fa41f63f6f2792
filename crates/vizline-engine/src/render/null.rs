use anyhow::bail;

use crate::command::Command;
use crate::config::Config;

use super::{Backend, RenderData, TextureHandle};

/// Totals of the last frame handed to a [`NullBackend`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub vertex_count: usize,
    pub commands: Vec<Command>,
}

/// Backend that draws nothing.
///
/// Records how often each callback ran and what the last frame contained.
/// Used by tests and by tools that only need the vertex stream.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub init_calls: usize,
    pub render_calls: usize,
    pub term_calls: usize,
    pub live_textures: usize,
    pub last_frame: Option<FrameSummary>,
    next_texture: u64,
    fail_render: bool,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `render` always fails.
    pub fn failing() -> Self {
        Self { fail_render: true, ..Self::default() }
    }
}

impl Backend for NullBackend {
    fn init(&mut self, config: &Config) -> anyhow::Result<()> {
        self.init_calls += 1;
        log::trace!("null backend init ({} vertices)", config.max_vertices);
        Ok(())
    }

    fn render(&mut self, frame: &RenderData<'_>) -> anyhow::Result<()> {
        self.render_calls += 1;
        if self.fail_render {
            bail!("null backend configured to fail");
        }
        self.last_frame = Some(FrameSummary {
            vertex_count: frame.vertices.len(),
            commands: frame.commands.to_vec(),
        });
        Ok(())
    }

    fn term(&mut self) {
        self.term_calls += 1;
    }

    fn create_font_texture(&mut self, bitmap: &[u8], width: u32, height: u32) -> anyhow::Result<TextureHandle> {
        if bitmap.len() != width as usize * height as usize {
            bail!("atlas is {} bytes, expected {width}×{height}", bitmap.len());
        }
        self.next_texture += 1;
        self.live_textures += 1;
        Ok(TextureHandle(self.next_texture))
    }

    fn destroy_font_texture(&mut self, _texture: TextureHandle) {
        self.live_textures = self.live_textures.saturating_sub(1);
    }
}
