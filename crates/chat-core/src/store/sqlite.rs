//! SQLite-backed session and conversation store

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::str::FromStr;

use crate::store::{Role, Session, Turn};
use crate::{Error, Result};

/// SQLite-based chat store
///
/// Owns a single connection. Callers share the store behind a mutex; all
/// operations are simple read-then-write sequences with default commit
/// semantics.
pub struct ChatStore {
    conn: Connection,
}

impl ChatStore {
    /// Open (or create) the store at the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL UNIQUE,
                system_prompt TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES sessions(id),
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
            [],
        )?;

        // Index for history queries
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_conversations_session_id
             ON conversations(session_id)",
            [],
        )?;

        Ok(())
    }

    /// Create a new session with the given system prompt
    ///
    /// Generates a fresh opaque external identifier; the internal row id is
    /// assigned by SQLite.
    pub fn create_session(&self, system_prompt: &str) -> Result<Session> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.conn.execute(
            "INSERT INTO sessions (session_id, system_prompt, created_at)
             VALUES (?1, ?2, ?3)",
            params![session_id, system_prompt, created_at.to_rfc3339()],
        )?;

        Ok(Session {
            id: self.conn.last_insert_rowid(),
            session_id,
            system_prompt: system_prompt.to_string(),
            created_at,
        })
    }

    /// Look up a session by its external identifier
    pub fn find_session(&self, session_id: &str) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, system_prompt, created_at FROM sessions
             WHERE session_id = ?1",
        )?;

        let result = stmt.query_row(params![session_id], session_from_row);

        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// List all sessions, most recently created first
    pub fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, system_prompt, created_at FROM sessions
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], session_from_row)?;

        let mut sessions = Vec::new();
        for session in rows {
            sessions.push(session?);
        }
        Ok(sessions)
    }

    /// Append one turn to a session's conversation
    ///
    /// The timestamp is assigned here, at insertion time.
    pub fn append_turn(&self, session_id: i64, role: Role, content: &str) -> Result<Turn> {
        let timestamp = Utc::now();

        self.conn.execute(
            "INSERT INTO conversations (session_id, role, content, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, role.as_str(), content, timestamp.to_rfc3339()],
        )?;

        Ok(Turn {
            id: self.conn.last_insert_rowid(),
            session_id,
            role,
            content: content.to_string(),
            timestamp,
        })
    }

    /// Full conversation history for a session, in ascending timestamp
    /// order (row id breaks same-instant ties)
    pub fn list_turns(&self, session_id: i64) -> Result<Vec<Turn>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, role, content, timestamp FROM conversations
             WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![session_id], turn_from_row)?;

        let mut turns = Vec::new();
        for turn in rows {
            turns.push(turn?);
        }
        Ok(turns)
    }
}

fn parse_timestamp(value: String) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}

fn session_from_row(row: &Row<'_>) -> std::result::Result<Session, rusqlite::Error> {
    Ok(Session {
        id: row.get(0)?,
        session_id: row.get(1)?,
        system_prompt: row.get(2)?,
        created_at: parse_timestamp(row.get(3)?)?,
    })
}

fn turn_from_row(row: &Row<'_>) -> std::result::Result<Turn, rusqlite::Error> {
    let role: String = row.get(2)?;
    Ok(Turn {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role: Role::from_str(&role).map_err(|_| rusqlite::Error::InvalidQuery)?,
        content: row.get(3)?,
        timestamp: parse_timestamp(row.get(4)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = ChatStore::in_memory().unwrap();
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_create_and_find_session() {
        let store = ChatStore::in_memory().unwrap();
        let session = store.create_session("You are terse.").unwrap();

        assert!(!session.session_id.is_empty());
        assert!(session.id > 0);

        let found = store.find_session(&session.session_id).unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.system_prompt, "You are terse.");
    }

    #[test]
    fn test_find_unknown_session() {
        let store = ChatStore::in_memory().unwrap();
        assert!(store.find_session("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let store = ChatStore::in_memory().unwrap();
        let a = store.create_session("").unwrap();
        let b = store.create_session("").unwrap();
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_list_sessions_newest_first() {
        let store = ChatStore::in_memory().unwrap();
        store.create_session("first").unwrap();
        store.create_session("second").unwrap();
        store.create_session("third").unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].system_prompt, "third");
        assert_eq!(sessions[2].system_prompt, "first");
    }

    #[test]
    fn test_append_and_list_turns() {
        let store = ChatStore::in_memory().unwrap();
        let session = store.create_session("").unwrap();

        store.append_turn(session.id, Role::User, "Hello").unwrap();
        store
            .append_turn(session.id, Role::Assistant, "Hi there")
            .unwrap();

        let turns = store.list_turns(session.id).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "Hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert!(turns[0].timestamp <= turns[1].timestamp);
    }

    #[test]
    fn test_list_turns_insertion_order() {
        let store = ChatStore::in_memory().unwrap();
        let session = store.create_session("").unwrap();

        // Same-instant inserts must still come back in insertion order
        for i in 0..10 {
            store
                .append_turn(session.id, Role::User, &format!("msg {}", i))
                .unwrap();
        }

        let turns = store.list_turns(session.id).unwrap();
        let contents: Vec<_> = turns.iter().map(|t| t.content.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("msg {}", i)).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_empty_history_is_empty_list() {
        let store = ChatStore::in_memory().unwrap();
        let session = store.create_session("").unwrap();
        assert!(store.list_turns(session.id).unwrap().is_empty());
    }

    #[test]
    fn test_turns_are_scoped_to_session() {
        let store = ChatStore::in_memory().unwrap();
        let a = store.create_session("").unwrap();
        let b = store.create_session("").unwrap();

        store.append_turn(a.id, Role::User, "for a").unwrap();
        store.append_turn(b.id, Role::User, "for b").unwrap();

        let turns = store.list_turns(a.id).unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "for a");
    }

    #[test]
    fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("chat.db");
        let db_path = db_path.to_str().unwrap();

        let external_id = {
            let store = ChatStore::new(db_path).unwrap();
            store.create_session("persisted").unwrap().session_id
        };

        let store = ChatStore::new(db_path).unwrap();
        let session = store.find_session(&external_id).unwrap().unwrap();
        assert_eq!(session.system_prompt, "persisted");
    }
}
