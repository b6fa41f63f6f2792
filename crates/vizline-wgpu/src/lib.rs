//! wgpu backend for `vizline-engine`.
//!
//! [`WgpuBackend`] uploads a recorded frame's vertex stream once and issues
//! one draw per command, with a per-command uniform bound at a dynamic
//! offset. [`Gpu`] acquires a device without a window for offscreen use.

mod backend;
mod device;
mod pipeline;
mod uniforms;

pub use backend::WgpuBackend;
pub use device::{Gpu, GpuInit};
