use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::dispatch::{dispatch, Action, IncomingMessage};
use super::state::UserSession;

/// In-memory sessions keyed by Telegram user id.
///
/// A session idle for longer than `ttl` counts as absent: reads ignore it,
/// the next write starts over with a fresh session, and the sweeper drops it.
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, UserSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, session: &UserSession) -> bool {
        session.last_seen.elapsed() > self.ttl
    }

    /// Run `f` against the user's session under the write lock, creating it if needed.
    pub async fn with_session<R>(&self, user_id: i64, f: impl FnOnce(&mut UserSession) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id).or_default();
        if self.is_expired(session) {
            debug!("Session for user {} expired, starting fresh", user_id);
            *session = UserSession::new();
        }
        session.touch();
        f(session)
    }

    /// Feed one incoming message through the state machine
    pub async fn dispatch(&self, user_id: i64, message: IncomingMessage, quick_buy_cro: f64) -> Action {
        self.with_session(user_id, |session| dispatch(session, message, quick_buy_cro))
            .await
    }

    pub async fn get(&self, user_id: i64) -> Option<UserSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .filter(|s| !self.is_expired(s))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop idle sessions, returning how many were removed
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= self.ttl);
        before - sessions.len()
    }

    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let evicted = self.evict_expired().await;
                if evicted > 0 {
                    info!("Evicted {} idle sessions, {} active", evicted, self.len().await);
                }
            }
        })
    }
}
