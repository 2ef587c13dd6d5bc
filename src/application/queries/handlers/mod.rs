//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod audio_handlers;
mod metadata_handlers;

pub use audio_handlers::*;
pub use metadata_handlers::*;
