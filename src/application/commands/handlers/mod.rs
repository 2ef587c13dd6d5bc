//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod analyze_handlers;
mod recording_handlers;

pub use analyze_handlers::*;
pub use recording_handlers::*;
