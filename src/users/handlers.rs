use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    state::AppState,
    users::{
        dto::{
            DeleteUserRequest, DeleteUserResponse, GetByIdUserRequest, GetByIdUserResponse,
            LoginUserRequest, LoginUserResponse, RegisterUserRequest, RegisterUserResponse,
            UpdateUserBody, UpdateUserResponse,
        },
        error::UserError,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route(
            "/users/:id",
            get(get_by_id).patch(update).delete(delete),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), (StatusCode, String)> {
    let res = state.users.register_user(payload).await.map_err(reject)?;
    info!(user_id = %res.id, "user registered");
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginUserRequest>,
) -> Result<Json<LoginUserResponse>, (StatusCode, String)> {
    let res = state.users.login_user(payload).await.map_err(reject)?;
    info!(user_id = %res.id, "login lookup");
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetByIdUserResponse>, (StatusCode, String)> {
    let res = state
        .users
        .get_by_id_user(GetByIdUserRequest { id })
        .await
        .map_err(reject)?;
    Ok(Json(res))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserBody>,
) -> Result<Json<UpdateUserResponse>, (StatusCode, String)> {
    let res = state
        .users
        .update_user(payload.into_request(id))
        .await
        .map_err(reject)?;
    info!(user_id = %id, "user updated");
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteUserResponse>, (StatusCode, String)> {
    let res = state
        .users
        .delete_user(DeleteUserRequest { id })
        .await
        .map_err(reject)?;
    info!(user_id = %id, "user deleted");
    Ok(Json(res))
}

fn reject(e: UserError) -> (StatusCode, String) {
    let status = e.status();
    if status.is_server_error() {
        error!(error = %e, "user storage failed");
    } else {
        warn!(error = %e, "user request rejected");
    }
    (status, e.to_string())
}
