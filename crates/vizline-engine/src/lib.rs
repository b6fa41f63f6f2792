//! vizline engine crate.
//!
//! Immediate-mode debug drawing: a [`Context`] records points, lines and
//! solids into fixed-capacity vertex and command streams every frame, culls
//! against the camera frustum, lays out text, and hands the result to a
//! [`Backend`](render::Backend).

pub mod buffer;
pub mod command;
pub mod config;
pub mod cull;
pub mod error;
pub mod frame;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
pub mod text;
pub mod vertex;

mod context;
mod tessellate;

pub use command::{Command, DrawMode};
pub use config::{Config, Validation};
pub use context::Context;
pub use error::{Error, Result};
pub use frame::{Camera, FrameSetup, Projection, Viewport};
pub use paint::Color;
pub use tessellate::resolution;
pub use vertex::Vertex;
