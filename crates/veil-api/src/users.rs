use axum::{Json, extract::State, response::IntoResponse};
use uuid::Uuid;

use veil_db::models::UserRow;
use veil_types::api::CreateUserRequest;
use veil_types::models::User;

use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{parse_db_timestamp, parse_db_uuid};

fn user_from_row(row: UserRow) -> User {
    User {
        id: parse_db_uuid(&row.id),
        address: row.address,
        created_at: parse_db_timestamp(&row.created_at),
    }
}

/// POST /api/user. Explicit upsert; repeat calls with one address return
/// the same row.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = Uuid::new_v4();

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.ensure_user(&user_id.to_string(), &req.address)
    })
    .await
    .map_err(ApiError::join("Failed to create user"))?
    .map_err(ApiError::internal("Failed to create user"))?;

    Ok(Json(user_from_row(row)))
}
