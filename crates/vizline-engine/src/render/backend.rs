use crate::command::Command;
use crate::config::Config;
use crate::frame::Camera;
use crate::text::Font;
use crate::vertex::Vertex;

/// Backend-assigned identifier of a font atlas texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u64);

/// Everything a backend needs to draw one frame. Borrowed from the context
/// for the duration of [`Backend::render`].
#[derive(Debug, Copy, Clone)]
pub struct RenderData<'a> {
    /// Vertex stream; each command addresses its own range.
    pub vertices: &'a [Vertex],
    /// Commands in submission order.
    pub commands: &'a [Command],
    pub camera: &'a Camera,
    /// Indexed by [`FontId`](crate::text::FontId).
    pub fonts: &'a [Font],
    pub config: &'a Config,
}

/// Graphics backend driven by a [`Context`](crate::Context).
///
/// Callbacks run on the caller's thread, synchronously, in the order
/// `init`, (`create_font_texture` | `render`)*, `destroy_font_texture`*, `term`.
pub trait Backend {
    fn init(&mut self, config: &Config) -> anyhow::Result<()>;

    fn render(&mut self, frame: &RenderData<'_>) -> anyhow::Result<()>;

    /// Releases every backend resource. Called once.
    fn term(&mut self);

    /// Uploads an 8-bit coverage atlas of `width * height` bytes.
    fn create_font_texture(&mut self, bitmap: &[u8], width: u32, height: u32) -> anyhow::Result<TextureHandle>;

    fn destroy_font_texture(&mut self, _texture: TextureHandle) {}
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn init(&mut self, config: &Config) -> anyhow::Result<()> {
        (**self).init(config)
    }

    fn render(&mut self, frame: &RenderData<'_>) -> anyhow::Result<()> {
        (**self).render(frame)
    }

    fn term(&mut self) {
        (**self).term()
    }

    fn create_font_texture(&mut self, bitmap: &[u8], width: u32, height: u32) -> anyhow::Result<TextureHandle> {
        (**self).create_font_texture(bitmap, width, height)
    }

    fn destroy_font_texture(&mut self, texture: TextureHandle) {
        (**self).destroy_font_texture(texture)
    }
}
