//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod classifier;
pub mod codec;
pub mod metadata;

pub use classifier::*;
pub use codec::*;
pub use metadata::*;
