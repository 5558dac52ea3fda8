//! Per-session hover state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::constants::DEFAULT_MAX_SESSIONS;

/// Last position the user hovered over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub lat: f64,
    pub lon: f64,
    pub observed_at: DateTime<Utc>,
}

/// Hover state of one session. Unset until the first hover event and never
/// cleared afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub last: Option<HoverPoint>,
}

impl HoverState {
    /// Record a hover event. The newest point replaces the previous one.
    pub fn record(self, lat: f64, lon: f64) -> Self {
        Self::record_at(self, lat, lon, Utc::now())
    }

    pub fn record_at(self, lat: f64, lon: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            last: Some(HoverPoint { lat, lon, observed_at }),
        }
    }
}

/// Hover states keyed by the session id the browser generates.
///
/// Holds at most `max_sessions` entries. Recording a new session into a full
/// store evicts the session whose last hover is oldest.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, HoverState>>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Current state of a session; unknown sessions start unset.
    pub fn hover(&self, session: &str) -> HoverState {
        self.lock().get(session).copied().unwrap_or_default()
    }

    /// Feed a hover event into a session and return the new state.
    pub fn record_hover(&self, session: &str, lat: f64, lon: f64) -> HoverState {
        self.record_hover_at(session, lat, lon, Utc::now())
    }

    pub fn record_hover_at(
        &self,
        session: &str,
        lat: f64,
        lon: f64,
        observed_at: DateTime<Utc>,
    ) -> HoverState {
        let mut sessions = self.lock();
        let previous = match sessions.get(session) {
            Some(state) => *state,
            None => {
                if sessions.len() >= self.max_sessions {
                    evict_oldest(&mut sessions);
                }
                HoverState::default()
            }
        };
        let state = previous.record_at(lat, lon, observed_at);
        sessions.insert(session.to_string(), state);
        state
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written HoverState
    fn lock(&self) -> MutexGuard<'_, HashMap<String, HoverState>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn evict_oldest(sessions: &mut HashMap<String, HoverState>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, state)| state.last.map(|point| point.observed_at))
        .map(|(session, _)| session.clone());
    if let Some(session) = oldest {
        sessions.remove(&session);
        debug!(session = %session, "Evicted least recently active hover session");
    }
}
