use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use userdeck_core::{AppError, UserIdentity};

use crate::error::ApiError;
use crate::state::AppState;

/// Requires a valid bearer token and attaches the verified identity to the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

    let claims = state.auth_service.verify_token(token)?;

    let identity = UserIdentity::new(
        claims.user_id.as_i64().to_string(),
        claims.display_name,
        Some(claims.email),
    );

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
