//! Worker Layer - Background Task Processing
//!
//! 实现 ExpirySweeper，定期清理内存中的过期状态

mod expiry_sweeper;

pub use expiry_sweeper::{ExpirySweeper, SweepResult, SweeperConfig};
