use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wallet identity. Created lazily the first time any other record
/// references its address; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// An anonymous message mirror. `sender_hash` is an opaque commitment, not a
/// user reference; the recipient is the only linkable party.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub message_id: String,
    pub recipient_id: Uuid,
    pub sender_hash: String,
    pub encrypted_content: String,
    pub tx_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: Uuid,
    pub poll_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub creator_id: Uuid,
    pub end_block: i64,
    pub tx_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub poll_db_id: Uuid,
    pub voter_id: Uuid,
    pub option_index: i64,
    pub nullifier: String,
    pub tx_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub note_id: String,
    pub owner_id: Uuid,
    pub is_pinned: bool,
    pub tx_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
