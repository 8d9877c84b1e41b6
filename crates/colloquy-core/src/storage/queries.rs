//! Database query implementations

use crate::error::{Error, Result, StoreError};
use crate::types::*;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONVERSATION_COLUMNS: &str = "id, title, category, summary, model_name, total_messages, \
     is_archived, created_at, updated_at";

// ===== Conversation Queries =====

/// Count visible conversations
pub fn count_conversations(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM conversations WHERE category != ?1 AND is_archived = 0",
        params![SUBAGENT_CATEGORY],
        |row| row.get(0),
    )?;

    Ok(count.max(0) as usize)
}

/// List visible conversations with pagination, most recently updated first
pub fn list_conversations(
    conn: &Connection,
    limit: usize,
    offset: usize,
) -> Result<Vec<Conversation>> {
    let sql = format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE category != ?1 AND is_archived = 0
        ORDER BY updated_at DESC, id DESC
        LIMIT ?2 OFFSET ?3
        "#
    );
    let mut stmt = conn.prepare(&sql)?;

    let conversations = stmt
        .query_map(
            params![SUBAGENT_CATEGORY, limit as i64, offset as i64],
            conversation_from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(conversations)
}

/// List every visible conversation, most recently updated first
pub fn list_all_conversations(conn: &Connection) -> Result<Vec<Conversation>> {
    let sql = format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE category != ?1 AND is_archived = 0
        ORDER BY updated_at DESC, id DESC
        "#
    );
    let mut stmt = conn.prepare(&sql)?;

    let conversations = stmt
        .query_map(params![SUBAGENT_CATEGORY], conversation_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(conversations)
}

/// Get a conversation by ID, including hidden ones
pub fn get_conversation(conn: &Connection, id: &ConversationId) -> Result<Option<Conversation>> {
    let sql = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1");
    let result = conn
        .query_row(&sql, params![id.as_str()], conversation_from_row)
        .optional()?;

    Ok(result)
}

/// Insert a new conversation
pub fn insert_conversation(conn: &Connection, conversation: &Conversation) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO conversations (id, title, category, summary, model_name, total_messages,
                                   is_archived, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            conversation.id.as_str(),
            conversation.title,
            conversation.category,
            conversation.summary,
            conversation.model_name,
            conversation.total_messages,
            conversation.is_archived,
            format_timestamp(&conversation.created_at),
            format_timestamp(&conversation.updated_at),
        ],
    )?;

    Ok(())
}

/// Change a conversation's title and bump its update time
pub fn update_conversation_title(conn: &Connection, id: &ConversationId, title: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE conversations SET title = ?, updated_at = ? WHERE id = ?",
        params![title, format_timestamp(&Utc::now()), id.as_str()],
    )?;

    if changed == 0 {
        return Err(Error::Store(StoreError::NotFound(id.to_string())));
    }
    Ok(())
}

/// Delete a conversation
pub fn delete_conversation(conn: &Connection, id: &ConversationId) -> Result<()> {
    let changed = conn.execute("DELETE FROM conversations WHERE id = ?", params![id.as_str()])?;

    if changed == 0 {
        return Err(Error::Store(StoreError::NotFound(id.to_string())));
    }
    Ok(())
}

// ===== Settings Queries =====

/// Get a setting value
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let result = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    Ok(result)
}

/// Set a setting value
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
        params![key, value],
    )?;

    Ok(())
}

// ===== Helper Functions =====

// Fixed-width UTC timestamps so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: ConversationId(row.get(0)?),
        title: row.get(1)?,
        category: row.get(2)?,
        summary: row.get(3)?,
        model_name: row.get(4)?,
        total_messages: row.get(5)?,
        is_archived: row.get(6)?,
        created_at: parse_timestamp(row, 7)?,
        updated_at: parse_timestamp(row, 8)?,
    })
}
