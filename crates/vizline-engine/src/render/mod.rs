//! Backend contract.
//!
//! The context never touches a graphics API. At `render` it hands the
//! finished vertex and command streams to a [`Backend`], which uploads and
//! draws them however it likes.

mod backend;
mod null;

pub use backend::{Backend, RenderData, TextureHandle};
pub use null::{FrameSummary, NullBackend};
