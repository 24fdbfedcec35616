//! Server-side sessions: login opens one, logout closes it, coach sessions expire when idle.

use crate::models::{Role, User, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Opaque session handle stored in the client cookie.
pub type SessionId = Uuid;

/// Idle time after which a coach session is logged out.
pub const DEFAULT_COACH_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 3600);

#[derive(Clone, Debug)]
pub struct SessionEntry {
    pub user: User,
    pub last_activity: DateTime<Utc>,
}

impl SessionEntry {
    fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_activity).to_std().unwrap_or_default()
    }
}

/// All live sessions. Admin sessions never expire; coach sessions expire after
/// `coach_idle_timeout` without activity.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, SessionEntry>,
    coach_idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_COACH_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new(coach_idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            coach_idle_timeout,
        }
    }

    /// Start a session for a freshly logged-in user.
    pub fn open(&mut self, user: User, now: DateTime<Utc>) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            SessionEntry {
                user,
                last_activity: now,
            },
        );
        id
    }

    /// Record activity on a session and return its user. An expired session is removed and `None`
    /// is returned, as for an unknown id.
    pub fn touch(&mut self, id: SessionId, now: DateTime<Utc>) -> Option<User> {
        let expired = self.is_expired(self.sessions.get(&id)?, now);
        if expired {
            if let Some(entry) = self.sessions.remove(&id) {
                log::info!("Session of coach '{}' expired after inactivity", entry.user.username);
            }
            return None;
        }
        let entry = self.sessions.get_mut(&id)?;
        entry.last_activity = now;
        Some(entry.user.clone())
    }

    /// Logout.
    pub fn close(&mut self, id: SessionId) -> Option<User> {
        self.sessions.remove(&id).map(|e| e.user)
    }

    /// Drop every session of `user_id` (e.g. after deactivation). Returns how many were dropped.
    pub fn revoke_user(&mut self, user_id: UserId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, e| e.user.id != user_id);
        before - self.sessions.len()
    }

    /// Remove coach sessions idle past the timeout. Returns the users logged out.
    pub fn expire_idle(&mut self, now: DateTime<Utc>) -> Vec<User> {
        let expired: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|(_, e)| self.is_expired(e, now))
            .map(|(id, _)| *id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.sessions.remove(&id))
            .map(|e| e.user)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        entry.user.role == Role::Coach && entry.idle_for(now) > self.coach_idle_timeout
    }
}
