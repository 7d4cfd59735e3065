use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use veil_db::models::MessageRow;
use veil_types::api::SendMessageRequest;
use veil_types::models::Message;

use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{parse_db_timestamp, parse_db_uuid};

fn message_from_row(row: MessageRow) -> Message {
    Message {
        id: parse_db_uuid(&row.id),
        message_id: row.message_id,
        recipient_id: parse_db_uuid(&row.recipient_id),
        sender_hash: row.sender_hash,
        encrypted_content: row.encrypted_content,
        tx_id: row.tx_id,
        created_at: parse_db_timestamp(&row.created_at),
    }
}

/// POST /api/message/send. Records a message the client claims to have
/// settled on chain. The recipient User is created on first reference;
/// ensure-user and the insert are two statements, not a transaction, so a
/// crash in between leaves an orphan User, which the idempotent upsert
/// makes harmless.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message_pk = Uuid::new_v4();
    let recipient_pk = Uuid::new_v4();

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let recipient = db.db.ensure_user(&recipient_pk.to_string(), &req.recipient_address)?;
        db.db.insert_message(
            &message_pk.to_string(),
            &req.message_id,
            &recipient.id,
            &req.sender_hash,
            req.encrypted_content.as_deref().unwrap_or(""),
            &req.tx_id,
        )
    })
    .await
    .map_err(ApiError::join("Failed to record message"))?
    .map_err(|e| {
        if veil_db::is_unique_violation(&e) {
            ApiError::Conflict("Message already recorded".to_string())
        } else {
            ApiError::internal("Failed to record message")(e)
        }
    })?;

    Ok(Json(message_from_row(row)))
}

/// GET /api/message/inbox/{address}. Every message for the address, in
/// storage order. Unknown addresses get an empty list, not a 404.
pub async fn get_inbox(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.inbox_for_address(&address))
        .await
        .map_err(ApiError::join("Failed to get messages"))?
        .map_err(ApiError::internal("Failed to get messages"))?;

    let messages: Vec<Message> = rows.into_iter().map(message_from_row).collect();
    Ok(Json(messages))
}
