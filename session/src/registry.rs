use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use sweeper_core::EngineConfig;

use crate::*;

/// Live session: its game service plus when it was last touched.
pub struct Session {
    service: GameService,
    last_activity: DateTime<Utc>,
}

impl Session {
    pub fn service(&self) -> &GameService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut GameService {
        self.last_activity = Utc::now();
        &mut self.service
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// Every live session, keyed by session id. Each session has its own lock,
/// so players never wait on each other.
pub struct SessionRegistry {
    config: EngineConfig,
    store: Arc<dyn GameStore>,
    auth: Arc<dyn Authenticator>,
    sessions: DashMap<String, SharedSession>,
}

impl SessionRegistry {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn GameStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            config,
            store,
            auth,
            sessions: DashMap::new(),
        }
    }

    /// The session for `id`, created with a fresh service on first use.
    pub fn session(&self, id: &str) -> SharedSession {
        self.sessions
            .entry(id.to_owned())
            .or_insert_with(|| {
                log::debug!("Opening session {:?}", id);
                Arc::new(Mutex::new(Session {
                    service: GameService::new(
                        self.config,
                        self.store.clone(),
                        self.auth.clone(),
                    ),
                    last_activity: Utc::now(),
                }))
            })
            .clone()
    }

    /// Runs `f` against the session's service while holding its lock.
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameService) -> Result<T>,
    ) -> Result<T> {
        let session = self.session(id);
        let mut guard = session
            .lock()
            .map_err(|_| SessionError::SessionPoisoned(id.to_owned()))?;
        f(guard.service_mut())
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops sessions idle for longer than `max_idle`, returning how many went.
    /// Sessions locked by a caller right now are left alone.
    pub fn prune_idle(&self, max_idle: TimeDelta) -> usize {
        let cutoff = Utc::now() - max_idle;
        let before = self.sessions.len();
        self.sessions.retain(|id, session| match session.try_lock() {
            Ok(session) if session.last_activity < cutoff => {
                log::debug!("Dropping idle session {:?}", id);
                false
            }
            _ => true,
        });
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            log::info!("Pruned {} idle sessions", removed);
        }
        removed
    }
}
