// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store with a bounded turn window.
//!
//! Sessions exist so follow-up questions can be resolved against recent
//! turns. The window is small and idle sessions expire; this is working
//! memory, not chat history.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use glucora_core::{ConversationTurn, SessionId};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Turns retained per session; older turns fall off.
    pub max_turns: usize,
    /// Idle time after which a session is discarded.
    pub idle_ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_turns: 10,
            idle_ttl: Duration::from_secs(1800),
        }
    }
}

struct SessionState {
    turns: VecDeque<ConversationTurn>,
    last_active: Instant,
}

/// Concurrent session store keyed by session id.
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
    options: SessionOptions,
}

impl SessionStore {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            sessions: DashMap::new(),
            options,
        }
    }

    /// Look up a session's turn window, minting a fresh id when none was
    /// given. An unknown or expired id also gets a fresh session; clients
    /// holding a stale id just lose the window, never an answer.
    pub fn resume(&self, session_id: Option<&SessionId>) -> (SessionId, Vec<ConversationTurn>) {
        self.prune();

        if let Some(id) = session_id
            && let Some(state) = self.sessions.get(&id.0)
            && state.last_active.elapsed() < self.options.idle_ttl
        {
            return (id.clone(), state.turns.iter().cloned().collect());
        }

        (SessionId(Uuid::new_v4().to_string()), Vec::new())
    }

    /// Append a completed turn, trimming the window to its bound.
    pub fn record_turn(&self, session_id: &SessionId, question: String, answer: String) {
        let mut state = self
            .sessions
            .entry(session_id.0.clone())
            .or_insert_with(|| SessionState {
                turns: VecDeque::new(),
                last_active: Instant::now(),
            });
        state.turns.push_back(ConversationTurn { question, answer });
        while state.turns.len() > self.options.max_turns {
            state.turns.pop_front();
        }
        state.last_active = Instant::now();
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn prune(&self) {
        let ttl = self.options.idle_ttl;
        self.sessions
            .retain(|_, state| state.last_active.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_gets_fresh_session() {
        let store = SessionStore::new(SessionOptions::default());
        let stale = SessionId("missing".to_string());
        let (id, turns) = store.resume(Some(&stale));
        assert_ne!(id, stale);
        assert!(turns.is_empty());
    }

    #[test]
    fn recorded_turns_come_back_in_order() {
        let store = SessionStore::new(SessionOptions::default());
        let (id, _) = store.resume(None);
        store.record_turn(&id, "q1".to_string(), "a1".to_string());
        store.record_turn(&id, "q2".to_string(), "a2".to_string());

        let (resumed, turns) = store.resume(Some(&id));
        assert_eq!(resumed, id);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].question, "q1");
        assert_eq!(turns[1].question, "q2");
    }

    #[test]
    fn window_is_bounded() {
        let store = SessionStore::new(SessionOptions {
            max_turns: 2,
            ..SessionOptions::default()
        });
        let (id, _) = store.resume(None);
        for i in 0..5 {
            store.record_turn(&id, format!("q{i}"), format!("a{i}"));
        }

        let (_, turns) = store.resume(Some(&id));
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].question, "q3");
        assert_eq!(turns[1].question, "q4");
    }

    #[test]
    fn idle_sessions_expire() {
        let store = SessionStore::new(SessionOptions {
            idle_ttl: Duration::ZERO,
            ..SessionOptions::default()
        });
        let (id, _) = store.resume(None);
        store.record_turn(&id, "q".to_string(), "a".to_string());

        let (resumed, turns) = store.resume(Some(&id));
        assert_ne!(resumed, id);
        assert!(turns.is_empty());
        assert_eq!(store.session_count(), 0);
    }
}
