//! Logger setup.
//!
//! The library itself only speaks the `log` facade. Binaries and tests that
//! want output call [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
