//! HTTP Handlers

mod analyze;
mod audio;
mod metadata;
mod ping;
mod recording;

pub use analyze::*;
pub use audio::*;
pub use metadata::*;
pub use ping::*;
pub use recording::*;
