//! Progress reporting with cooperative cancellation.
//!
//! The render loop calls `ProgressReporter::update` once per tile; a `true` return
//! asks it to stop. Nothing here blocks.

mod cancellation;
mod reporter;

pub use cancellation::CancelFlag;
pub use reporter::{LoggingProgress, LoggingProgressFactory, ProgressFactory, ProgressReporter, ProgressTotal};
