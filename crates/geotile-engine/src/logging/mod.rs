//! Logger setup for binaries embedding the engine.
//!
//! The engine itself only speaks the `log` facade; this module wires `env_logger`
//! behind it.

mod init;

pub use init::{LoggingConfig, init_logging};
