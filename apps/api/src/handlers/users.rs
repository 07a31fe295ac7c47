use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{StatusCode, header};
use serde::Deserialize;

use userdeck_application::{CreateUserParams, UpdateUserParams};
use userdeck_core::{AppError, UserIdentity};
use userdeck_domain::{UserAction, UserId};

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserLogResponse, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_directory
        .get_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn list_users_by_active_handler(
    State(state): State<AppState>,
    Path(is_active): Path<bool>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_directory
        .filter_by_active(is_active)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let record = state
        .user_directory
        .get_by_id(UserId::from_i64(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

    state
        .audit_log
        .record(
            record.id,
            UserAction::Viewed,
            Some(format!("API viewed {}", record.display_name())),
            Some(user.display_name().to_owned()),
        )
        .await?;

    Ok(Json(UserResponse::from(record)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<UserResponse>)> {
    let record = state
        .user_directory
        .create(CreateUserParams {
            forename: payload.forename,
            surname: payload.surname,
            email: payload.email,
            password: payload.password,
            is_active: payload.is_active,
            date_of_birth: payload.date_of_birth,
        })
        .await?;

    state
        .audit_log
        .record(
            record.id,
            UserAction::Created,
            Some(format!("API created {}", record.display_name())),
            Some(user.display_name().to_owned()),
        )
        .await?;

    let location = format!("/api/users/{}", record.id.as_i64());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(record)),
    ))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<StatusCode> {
    if payload.id != id {
        return Err(AppError::Validation("body id does not match path id".to_owned()).into());
    }

    let updated = state
        .user_directory
        .update(UpdateUserParams {
            id: UserId::from_i64(id),
            forename: payload.forename.clone(),
            surname: payload.surname.clone(),
            email: payload.email,
            is_active: payload.is_active,
            date_of_birth: payload.date_of_birth,
            password: payload.password,
        })
        .await?;

    if !updated {
        return Err(AppError::NotFound(format!("user {id} not found")).into());
    }

    state
        .audit_log
        .record(
            UserId::from_i64(id),
            UserAction::Updated,
            Some(format!("API updated {} {}", payload.forename, payload.surname)),
            Some(user.display_name().to_owned()),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let record = state
        .user_directory
        .get_by_id(UserId::from_i64(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

    // Written before the row disappears so the entry can still name the user.
    state
        .audit_log
        .record(
            record.id,
            UserAction::Deleted,
            Some(format!("API deleted {}", record.display_name())),
            Some(user.display_name().to_owned()),
        )
        .await?;

    state.user_directory.delete(record.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UserLogsQuery {
    pub take: Option<i64>,
}

pub async fn user_logs_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<UserLogsQuery>,
) -> ApiResult<Json<Vec<UserLogResponse>>> {
    let take = query.take.unwrap_or(10);
    let entries = state
        .audit_log
        .get_for_user(UserId::from_i64(id), take)
        .await?
        .into_iter()
        .map(UserLogResponse::from)
        .collect();

    Ok(Json(entries))
}
