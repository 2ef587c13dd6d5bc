//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_codec;
mod classifier;
mod clip_store;
mod metadata_source;
mod recording_manager;

pub use audio_codec::{AudioCodecPort, CodecError};
pub use classifier::{ClassifierError, ClassifierPort};
pub use clip_store::ClipStorePort;
pub use metadata_source::{MetadataError, MetadataSourcePort};
pub use recording_manager::{RecordingManagerPort, RecordingStatus};
