use crate::{
    browser::{cache::CollectionCache, controller::QueryStateController, ResourceSource},
    config::{ApplyMode, CacheMode},
    services::{
        auth_service::Session,
        token_service::{TokenService, TokenServiceError},
    },
};
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};

/// What a console login owns: the backend session and its list view.
pub struct ConsoleSession {
    pub session: Session,
    pub opened_at: DateTime<Utc>,
    pub controller: Mutex<QueryStateController>,
    pub cache: CollectionCache,
}

#[derive(Debug, Clone, Copy)]
pub struct BrowserSettings {
    pub apply_mode: ApplyMode,
    pub cache_mode: CacheMode,
    pub default_limit: u32,
}

struct StoredSession {
    console: Arc<ConsoleSession>,
    last_used: Instant,
}

/// In-memory store of console sessions. A session unused for `idle_ttl` is
/// gone: lookups miss it and the next login sweeps it out.
pub struct SessionService {
    token_service: TokenService,
    source: Arc<dyn ResourceSource>,
    settings: BrowserSettings,
    idle_ttl: Duration,
    sessions: RwLock<HashMap<String, StoredSession>>,
}

impl SessionService {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        settings: BrowserSettings,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            token_service: TokenService::new(),
            source,
            settings,
            idle_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    pub async fn open(
        &self,
        session: Session,
    ) -> Result<(String, Arc<ConsoleSession>), TokenServiceError> {
        let token = self.token_service.generate_token()?;
        let console = Arc::new(ConsoleSession {
            session,
            opened_at: Utc::now(),
            controller: Mutex::new(QueryStateController::new(
                self.settings.apply_mode,
                self.settings.default_limit,
            )),
            cache: CollectionCache::new(self.source.clone(), self.settings.cache_mode),
        });

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_used.elapsed() < self.idle_ttl);
        if sessions.len() < before {
            log::info!(
                "dropped {} idle console session(s)",
                before - sessions.len()
            );
        }

        sessions.insert(
            token.clone(),
            StoredSession {
                console: console.clone(),
                last_used: Instant::now(),
            },
        );
        drop(sessions);

        log::info!(
            "opened console session for user `{}`",
            console.session.user.username
        );

        Ok((token, console))
    }

    /// Looks up a live session and marks it as used.
    pub async fn find(&self, token: &str) -> Option<Arc<ConsoleSession>> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(token)?;

        if stored.last_used.elapsed() >= self.idle_ttl {
            if let Some(expired) = sessions.remove(token) {
                log::info!(
                    "console session for user `{}` expired",
                    expired.console.session.user.username
                );
            }
            return None;
        }

        stored.last_used = Instant::now();
        Some(stored.console.clone())
    }

    pub async fn close(&self, token: &str) -> Option<Arc<ConsoleSession>> {
        let closed = self
            .sessions
            .write()
            .await
            .remove(token)
            .map(|stored| stored.console);

        if let Some(console) = &closed {
            log::info!(
                "closed console session for user `{}`",
                console.session.user.username
            );
        }

        closed
    }
}
