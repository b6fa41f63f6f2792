//! Paint state shared between the recorder and the vertex stream.

mod color;

pub use color::Color;
