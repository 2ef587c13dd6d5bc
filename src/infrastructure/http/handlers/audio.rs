//! Audio Handlers - 下载已上传的音频

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::GetClip;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn download_clip(
    State(state): State<Arc<AppState>>,
    Path(clip_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let clip = state.get_clip_handler.handle(GetClip { clip_id }).await?;

    let fallback = format!("{}.wav", clip_id);
    let disposition = attachment_disposition(clip.file_name(), &fallback);

    Ok((
        [
            (header::CONTENT_TYPE, clip.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        clip.bytes().to_vec(),
    )
        .into_response())
}

/// 构造 `Content-Disposition: attachment`
///
/// 文件名来自客户端上传，只保留可见 ASCII，引号、反斜杠和其他字符替换为 `_`；
/// 清理后为空时使用 `fallback`
pub(super) fn attachment_disposition(file_name: Option<&str>, fallback: &str) -> String {
    let cleaned: String = file_name
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let name = if cleaned.trim_matches('_').trim().is_empty() {
        fallback
    } else {
        cleaned.as_str()
    };
    format!("attachment; filename=\"{}\"", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_plain_name_kept() {
        assert_eq!(
            attachment_disposition(Some("clip one.wav"), "x.wav"),
            "attachment; filename=\"clip one.wav\""
        );
    }

    #[test]
    fn test_unsafe_characters_replaced() {
        let value = attachment_disposition(Some("a\"b\\c\r\n录音.wav"), "x.wav");
        assert_eq!(value, "attachment; filename=\"a_b_c____.wav\"");
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_missing_or_empty_name_uses_fallback() {
        assert_eq!(
            attachment_disposition(None, "resampled.wav"),
            "attachment; filename=\"resampled.wav\""
        );
        assert_eq!(
            attachment_disposition(Some("\u{1}\u{2}"), "resampled.wav"),
            "attachment; filename=\"resampled.wav\""
        );
    }
}
