//! Metadata Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::GetMetadata;
use crate::domain::metadata::MetadataRecord;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取完整元数据表
pub async fn list_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MetadataRecord>>>, ApiError> {
    let records = state.get_metadata_handler.handle(GetMetadata).await?;
    Ok(Json(ApiResponse::success(records)))
}
