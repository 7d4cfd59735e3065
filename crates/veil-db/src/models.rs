/// Database row types that map directly to SQLite rows.
/// Distinct from the veil-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub address: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct MessageRow {
    pub id: String,
    pub message_id: String,
    pub recipient_id: String,
    pub sender_hash: String,
    pub encrypted_content: String,
    pub tx_id: String,
    pub created_at: String,
}

pub struct PollRow {
    pub id: String,
    pub poll_id: String,
    pub question: String,
    /// JSON-serialized ordered list of option labels.
    pub options: String,
    pub creator_id: String,
    pub end_block: i64,
    pub tx_id: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct VoteRow {
    pub id: String,
    pub poll_db_id: String,
    pub voter_id: String,
    pub option_index: i64,
    pub nullifier: String,
    pub tx_id: String,
    pub created_at: String,
}

pub struct NoteRow {
    pub id: String,
    pub note_id: String,
    pub owner_id: String,
    pub is_pinned: bool,
    pub tx_id: String,
    pub created_at: String,
    pub updated_at: String,
}
