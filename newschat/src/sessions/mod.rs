use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::llm::Role;

/// One message exchange unit in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub is_news: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            is_news: false,
            keyword: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_news: false,
            keyword: None,
        }
    }

    /// Assistant turn carrying a news analysis, tagged with the search
    /// keyword for later display reconstruction
    pub fn news(content: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_news: true,
            keyword: Some(keyword.into()),
        }
    }
}

/// An ordered sequence of turns, addressable by id, transient unless saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// First user turn clipped to `max_chars`, used as the listing preview
    pub fn preview(&self, max_chars: usize) -> String {
        self.turns
            .iter()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.chars().take(max_chars).collect::<String>())
            .unwrap_or_else(|| "대화".to_string())
    }
}

/// Listing entry for a saved session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub preview: String,
    pub started: String,
    pub turn_count: usize,
}

/// In-memory session state: exactly one active session plus a map of saved
/// past sessions keyed by creation timestamp. Nothing survives a restart.
pub struct SessionStore {
    active: Session,
    saved: BTreeMap<String, Session>,
    last_id_base: String,
    seq: u32,
}

impl SessionStore {
    pub fn new() -> Self {
        let mut store = Self {
            active: Session {
                id: String::new(),
                created_at: Utc::now(),
                turns: Vec::new(),
            },
            saved: BTreeMap::new(),
            last_id_base: String::new(),
            seq: 0,
        };
        store.active = store.fresh_session();
        store
    }

    /// Timestamp-derived id; same-second creations get a monotonic suffix
    /// so ids never collide.
    fn mint_id(&mut self) -> String {
        let base = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        if base != self.last_id_base {
            self.last_id_base = base.clone();
            self.seq = 0;
        } else {
            self.seq += 1;
        }

        let mut id = if self.seq == 0 {
            base.clone()
        } else {
            format!("{}_{}", base, self.seq)
        };
        // Guards against a clock stepping backwards onto a saved id
        while self.saved.contains_key(&id) || id == self.active.id {
            self.seq += 1;
            id = format!("{}_{}", base, self.seq);
        }
        id
    }

    fn fresh_session(&mut self) -> Session {
        Session {
            id: self.mint_id(),
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Start a new conversation. The current session is saved only if it
    /// has turns; an empty session leaves no trace. Returns the id the
    /// previous session was saved under.
    pub fn new_conversation(&mut self) -> Option<String> {
        let fresh = self.fresh_session();
        let previous = std::mem::replace(&mut self.active, fresh);
        if previous.is_empty() {
            None
        } else {
            let id = previous.id.clone();
            self.saved.insert(id.clone(), previous);
            Some(id)
        }
    }

    /// Re-activate a saved session by id. A non-empty current session is
    /// saved first so its turns are not dropped.
    pub fn activate(&mut self, id: &str) -> Option<&Session> {
        let session = self.saved.remove(id)?;
        if self.active.is_empty() {
            self.active = session;
        } else {
            let previous = std::mem::replace(&mut self.active, session);
            self.saved.insert(previous.id.clone(), previous);
        }
        Some(&self.active)
    }

    /// Delete a saved session. Returns false when the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        self.saved.remove(id).is_some()
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.active.turns.push(turn);
    }

    pub fn active(&self) -> &Session {
        &self.active
    }

    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    /// Saved sessions, newest first (ids sort chronologically)
    pub fn list(&self) -> Vec<SessionSummary> {
        self.saved
            .values()
            .rev()
            .map(|s| SessionSummary {
                id: s.id.clone(),
                preview: s.preview(20),
                started: s.created_at.format("%Y-%m-%d %H:%M").to_string(),
                turn_count: s.turns.len(),
            })
            .collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

pub mod websocket;
