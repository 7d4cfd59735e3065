use crate::Database;
use crate::models::{MessageRow, NoteRow, PollRow, UserRow, VoteRow};
use anyhow::Result;
use rusqlite::{OptionalExtension, Row, params};

impl Database {
    // -- Users --

    /// Atomic get-or-create keyed by address. The DO UPDATE arm is a no-op
    /// write that makes RETURNING yield the existing row, so two concurrent
    /// first references to one address cannot produce duplicates.
    pub fn ensure_user(&self, id: &str, address: &str) -> Result<UserRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO users (id, address) VALUES (?1, ?2)
                 ON CONFLICT(address) DO UPDATE SET address = excluded.address
                 RETURNING id, address, created_at",
                params![id, address],
                map_user,
            )?;
            Ok(row)
        })
    }

    pub fn get_user_by_address(&self, address: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, address, created_at FROM users WHERE address = ?1",
                    [address],
                    map_user,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        message_id: &str,
        recipient_id: &str,
        sender_hash: &str,
        encrypted_content: &str,
        tx_id: &str,
    ) -> Result<MessageRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO messages (id, message_id, recipient_id, sender_hash, encrypted_content, tx_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, message_id, recipient_id, sender_hash, encrypted_content, tx_id, created_at",
                params![id, message_id, recipient_id, sender_hash, encrypted_content, tx_id],
                map_message,
            )?;
            Ok(row)
        })
    }

    /// All messages addressed to `address`, in storage order. An unknown
    /// address yields nothing; the join filters everything out.
    pub fn inbox_for_address(&self, address: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.message_id, m.recipient_id, m.sender_hash, m.encrypted_content, m.tx_id, m.created_at
                 FROM messages m
                 JOIN users u ON m.recipient_id = u.id
                 WHERE u.address = ?1",
            )?;
            let rows = stmt
                .query_map([address], map_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Polls --

    pub fn insert_poll(
        &self,
        id: &str,
        poll_id: &str,
        question: &str,
        options_json: &str,
        creator_id: &str,
        end_block: i64,
        tx_id: &str,
    ) -> Result<PollRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO polls (id, poll_id, question, options, creator_id, end_block, tx_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, poll_id, question, options, creator_id, end_block, tx_id, created_at",
                params![id, poll_id, question, options_json, creator_id, end_block, tx_id],
                map_poll,
            )?;
            Ok(row)
        })
    }

    pub fn get_poll_by_poll_id(&self, poll_id: &str) -> Result<Option<PollRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, poll_id, question, options, creator_id, end_block, tx_id, created_at
                     FROM polls WHERE poll_id = ?1",
                    [poll_id],
                    map_poll,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Newest first; rowid breaks ties within the same second.
    pub fn list_polls(&self) -> Result<Vec<PollRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, poll_id, question, options, creator_id, end_block, tx_id, created_at
                 FROM polls
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([], map_poll)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Votes --

    pub fn find_vote_by_nullifier(&self, nullifier: &str) -> Result<Option<VoteRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, poll_db_id, voter_id, option_index, nullifier, tx_id, created_at
                     FROM votes WHERE nullifier = ?1",
                    [nullifier],
                    map_vote,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn insert_vote(
        &self,
        id: &str,
        poll_db_id: &str,
        voter_id: &str,
        option_index: i64,
        nullifier: &str,
        tx_id: &str,
    ) -> Result<VoteRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO votes (id, poll_db_id, voter_id, option_index, nullifier, tx_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, poll_db_id, voter_id, option_index, nullifier, tx_id, created_at",
                params![id, poll_db_id, voter_id, option_index, nullifier, tx_id],
                map_vote,
            )?;
            Ok(row)
        })
    }

    pub fn votes_for_poll(&self, poll_db_id: &str) -> Result<Vec<VoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, poll_db_id, voter_id, option_index, nullifier, tx_id, created_at
                 FROM votes WHERE poll_db_id = ?1",
            )?;
            let rows = stmt
                .query_map([poll_db_id], map_vote)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Notes --

    pub fn insert_note(&self, id: &str, note_id: &str, owner_id: &str, tx_id: &str) -> Result<NoteRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO notes (id, note_id, owner_id, tx_id)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, note_id, owner_id, is_pinned, tx_id, created_at, updated_at",
                params![id, note_id, owner_id, tx_id],
                map_note,
            )?;
            Ok(row)
        })
    }

    /// Newest first; rowid breaks ties within the same second.
    pub fn notes_for_address(&self, address: &str) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT n.id, n.note_id, n.owner_id, n.is_pinned, n.tx_id, n.created_at, n.updated_at
                 FROM notes n
                 JOIN users u ON n.owner_id = u.id
                 WHERE u.address = ?1
                 ORDER BY n.created_at DESC, n.rowid DESC",
            )?;
            let rows = stmt
                .query_map([address], map_note)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_note_by_note_id(&self, note_id: &str) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, note_id, owner_id, is_pinned, tx_id, created_at, updated_at
                     FROM notes WHERE note_id = ?1",
                    [note_id],
                    map_note,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Partial update: a None leaves the stored value untouched.
    /// Returns None when no note has this note_id.
    pub fn update_note(
        &self,
        note_id: &str,
        is_pinned: Option<bool>,
        tx_id: Option<&str>,
    ) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "UPDATE notes
                     SET is_pinned  = COALESCE(?1, is_pinned),
                         tx_id      = COALESCE(?2, tx_id),
                         updated_at = datetime('now')
                     WHERE note_id = ?3
                     RETURNING id, note_id, owner_id, is_pinned, tx_id, created_at, updated_at",
                    params![is_pinned, tx_id, note_id],
                    map_note,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Returns false when no note had this note_id.
    pub fn delete_note(&self, note_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM notes WHERE note_id = ?1", [note_id])?;
            Ok(deleted > 0)
        })
    }
}

fn map_user(row: &Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        address: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn map_message(row: &Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        message_id: row.get(1)?,
        recipient_id: row.get(2)?,
        sender_hash: row.get(3)?,
        encrypted_content: row.get(4)?,
        tx_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_poll(row: &Row) -> rusqlite::Result<PollRow> {
    Ok(PollRow {
        id: row.get(0)?,
        poll_id: row.get(1)?,
        question: row.get(2)?,
        options: row.get(3)?,
        creator_id: row.get(4)?,
        end_block: row.get(5)?,
        tx_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_vote(row: &Row) -> rusqlite::Result<VoteRow> {
    Ok(VoteRow {
        id: row.get(0)?,
        poll_db_id: row.get(1)?,
        voter_id: row.get(2)?,
        option_index: row.get(3)?,
        nullifier: row.get(4)?,
        tx_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_note(row: &Row) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        note_id: row.get(1)?,
        owner_id: row.get(2)?,
        is_pinned: row.get(3)?,
        tx_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
