use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use userdeck_application::DEFAULT_PAGE_SIZE;
use userdeck_core::AppError;
use userdeck_domain::LogEntryId;

use crate::dto::{LogListResponse, UserLogResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub q: Option<String>,
}

pub async fn list_logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> ApiResult<Json<LogListResponse>> {
    let page = state
        .audit_log
        .get_page(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            query.q.as_deref(),
        )
        .await?;

    Ok(Json(LogListResponse {
        items: page.items.into_iter().map(UserLogResponse::from).collect(),
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        query: query.q,
    }))
}

pub async fn get_log_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserLogResponse>> {
    let entry = state
        .audit_log
        .get_by_id(LogEntryId::from_i64(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("log entry {id} not found")))?;

    Ok(Json(UserLogResponse::from(entry)))
}
