//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（AudioCodec、Classifier、MetadataSource、RecordingManager 等）
//! - resampler: 任意格式音频 → 16-bit PCM WAV
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod resampler;

// Re-exports
pub use commands::{
    // Analyze commands
    AnalyzeAudio,
    ResampleAudio,
    // Recording commands
    AppendFrames,
    PauseRecording,
    ResumeRecording,
    StartRecording,
    StopRecording,
    // Handlers
    handlers::{
        AnalysisReport, AnalysisResult, AnalyzeAudioHandler, AnalyzeSettings,
        AppendFramesHandler, AppendFramesResponse, ClipInfo, PauseRecordingHandler,
        ResampleAudioHandler, ResumeRecordingHandler, StartRecordingHandler,
        StopRecordingHandler, StopRecordingResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Audio codec
    AudioCodecPort,
    CodecError,
    // Classifier
    ClassifierError,
    ClassifierPort,
    // Clip store
    ClipStorePort,
    // Metadata
    MetadataError,
    MetadataSourcePort,
    // Recording manager
    RecordingManagerPort,
    RecordingStatus,
};

pub use queries::{
    GetClip,
    GetMetadata,
    GetRecording,
    // Handlers
    handlers::{GetClipHandler, GetMetadataHandler, GetRecordingHandler},
};

pub use resampler::{AudioResampler, ResampleError, ResampleRequest, DEFAULT_TARGET_RATE};
