use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use veil_db::models::NoteRow;
use veil_types::api::{CreateNoteRequest, UpdateNoteRequest};
use veil_types::models::Note;

use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{parse_db_timestamp, parse_db_uuid};

fn note_from_row(row: NoteRow) -> Note {
    Note {
        id: parse_db_uuid(&row.id),
        note_id: row.note_id,
        owner_id: parse_db_uuid(&row.owner_id),
        is_pinned: row.is_pinned,
        tx_id: row.tx_id,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}

/// POST /api/notes/create. New notes start unpinned.
pub async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note_pk = Uuid::new_v4();
    let owner_pk = Uuid::new_v4();

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let owner = db.db.ensure_user(&owner_pk.to_string(), &req.owner_address)?;
        db.db.insert_note(&note_pk.to_string(), &req.note_id, &owner.id, &req.tx_id)
    })
    .await
    .map_err(ApiError::join("Failed to create note"))?
    .map_err(|e| {
        if veil_db::is_unique_violation(&e) {
            ApiError::Conflict("Note already recorded".to_string())
        } else {
            ApiError::internal("Failed to create note")(e)
        }
    })?;

    Ok(Json(note_from_row(row)))
}

/// GET /api/notes/{address}. Newest first; empty list for unknown owners.
pub async fn list_notes(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.notes_for_address(&address))
        .await
        .map_err(ApiError::join("Failed to get notes"))?
        .map_err(ApiError::internal("Failed to get notes"))?;

    let notes: Vec<Note> = rows.into_iter().map(note_from_row).collect();
    Ok(Json(notes))
}

/// GET /api/notes/get/{note_id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_note_by_note_id(&note_id))
        .await
        .map_err(ApiError::join("Failed to get note"))?
        .map_err(ApiError::internal("Failed to get note"))?
        .ok_or(ApiError::NotFound("Note not found"))?;

    Ok(Json(note_from_row(row)))
}

/// PUT /api/notes/{note_id}. Partial update: a false pin state is applied,
/// while an empty txId counts as absent, matching what clients send while a
/// transaction is still pending.
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tx_id = req.tx_id.filter(|t| !t.is_empty());

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.update_note(&note_id, req.is_pinned, tx_id.as_deref())
    })
    .await
    .map_err(ApiError::join("Failed to update note"))?
    .map_err(ApiError::internal("Failed to update note"))?
    .ok_or(ApiError::NotFound("Note not found"))?;

    Ok(Json(note_from_row(row)))
}

/// DELETE /api/notes/{note_id}. Hard delete.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_note(&note_id))
        .await
        .map_err(ApiError::join("Failed to delete note"))?
        .map_err(ApiError::internal("Failed to delete note"))?;

    if !deleted {
        return Err(ApiError::NotFound("Note not found"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
