use axum::Json;
use axum::extract::State;

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state
        .auth_service
        .login(payload.email.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(LoginResponse::from(session)))
}
