//! Command stream types.
//!
//! Responsibilities:
//! - record contiguous vertex ranges that share a draw mode and transform
//! - enforce the begin/end protocol (at most one open command)
//! - provide deterministic submission order (draw mode, then depth key)

mod cmd;
mod key;
mod list;

pub use cmd::{Command, DrawMode};
pub use key::SortKey;
pub use list::{CommandHandle, CommandList};
