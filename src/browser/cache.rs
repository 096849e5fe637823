use super::{query::QueryState, FetchError, ResourcePage, ResourceSource};
use crate::{config::CacheMode, services::auth_service::Session};
use lru::LruCache;
use std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};
use tokio::sync::Mutex;

/// A fetch that has been issued but not yet resolved. Only the most recently
/// issued ticket of a cache may produce a visible result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub state: QueryState,
}

struct CachedPage {
    page: ResourcePage,
    stored_at: Instant,
}

pub struct CollectionCache {
    source: Arc<dyn ResourceSource>,
    mode: CacheMode,
    latest: AtomicU64,
    pages: Mutex<LruCache<QueryState, CachedPage>>,
}

impl CollectionCache {
    pub fn new(source: Arc<dyn ResourceSource>, mode: CacheMode) -> Self {
        let capacity = match mode {
            CacheMode::Disabled => NonZeroUsize::MIN,
            CacheMode::Enabled { capacity, .. } => capacity,
        };

        Self {
            source,
            mode,
            latest: AtomicU64::new(0),
            pages: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Issues and resolves a fetch in one step.
    #[cfg(test)]
    pub async fn fetch_page(
        &self,
        session: &Session,
        state: &QueryState,
    ) -> Result<ResourcePage, FetchError> {
        let ticket = self.issue(state.clone());
        self.resolve(session, &ticket, true).await
    }

    /// Takes the next sequence number for `state`, superseding every ticket
    /// issued before it.
    pub fn issue(&self, state: QueryState) -> Ticket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { seq, state }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.seq
    }

    /// Produces the page for `ticket`, from the cache when allowed. Fails with
    /// [`FetchError::StaleResultDiscarded`] once a newer ticket exists.
    pub async fn resolve(
        &self,
        session: &Session,
        ticket: &Ticket,
        use_cache: bool,
    ) -> Result<ResourcePage, FetchError> {
        if use_cache {
            if let Some(page) = self.lookup(&ticket.state).await {
                return self.settle(ticket, Ok(page));
            }
        }

        let params = ticket.state.to_list_params(session.user.id);
        let result = self
            .source
            .list_resources(session, &params)
            .await
            .map(ResourcePage::from)
            .map_err(FetchError::from);

        if let (Ok(page), CacheMode::Enabled { .. }) = (&result, self.mode) {
            self.pages.lock().await.put(
                ticket.state.clone(),
                CachedPage {
                    page: page.clone(),
                    stored_at: Instant::now(),
                },
            );
        }

        self.settle(ticket, result)
    }

    /// Drops every cached page, e.g. after the collection was mutated.
    pub async fn invalidate(&self) {
        self.pages.lock().await.clear();
    }

    async fn lookup(&self, state: &QueryState) -> Option<ResourcePage> {
        let CacheMode::Enabled { ttl, .. } = self.mode else {
            return None;
        };

        let mut pages = self.pages.lock().await;
        let expired = match pages.get(state) {
            Some(cached) if cached.stored_at.elapsed() < ttl => return Some(cached.page.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            pages.pop(state);
        }

        None
    }

    fn settle(
        &self,
        ticket: &Ticket,
        result: Result<ResourcePage, FetchError>,
    ) -> Result<ResourcePage, FetchError> {
        if !self.is_latest(ticket) {
            log::debug!(
                "discarding result of fetch #{} for {:?}: superseded",
                ticket.seq,
                ticket.state
            );
            return Err(FetchError::StaleResultDiscarded);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        browser::testing::{resources, session, FakeSource},
        remote::repositories::RepositoryError,
    };
    use std::time::Duration;

    fn enabled(ttl: Duration) -> CacheMode {
        CacheMode::Enabled {
            ttl,
            capacity: NonZeroUsize::new(8).unwrap(),
        }
    }

    fn searching(search: &str) -> QueryState {
        let mut state = QueryState::new(10);
        state.filters.search = search.to_owned();
        state
    }

    #[tokio::test]
    async fn no_cache_mode_always_queries() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let source = Arc::new(source);
        let cache = CollectionCache::new(source.clone(), CacheMode::Disabled);
        let state = QueryState::new(10);

        cache.fetch_page(&session(), &state).await.unwrap();
        cache.fetch_page(&session(), &state).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn equal_states_hit_the_cache() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let source = Arc::new(source);
        let cache = CollectionCache::new(source.clone(), enabled(Duration::from_secs(60)));

        let first = cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();
        let second = cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);

        cache.fetch_page(&session(), &searching("002")).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let source = Arc::new(source);
        let cache = CollectionCache::new(source.clone(), enabled(Duration::ZERO));

        cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();
        cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forgets_pages() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let source = Arc::new(source);
        let cache = CollectionCache::new(source.clone(), enabled(Duration::from_secs(60)));

        cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();
        cache.invalidate().await;
        cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn last_issued_wins_regardless_of_completion_order() {
        let (source, mut arrivals) = FakeSource::new(resources(12));
        let source = Arc::new(source);
        let cache = Arc::new(CollectionCache::new(source.clone(), CacheMode::Disabled));
        source.hold("001");
        source.hold("002");

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.fetch_page(&session(), &searching("001")).await }
        });
        assert_eq!(arrivals.recv().await.as_deref(), Some("001"));

        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.fetch_page(&session(), &searching("002")).await }
        });
        assert_eq!(arrivals.recv().await.as_deref(), Some("002"));

        source.release("002");
        let second = second.await.unwrap().unwrap();
        assert_eq!(second.items[0].name, "resource-002");

        source.release("001");
        assert_eq!(
            first.await.unwrap(),
            Err(FetchError::StaleResultDiscarded)
        );
    }

    #[tokio::test]
    async fn failures_are_reported_not_cached() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let source = Arc::new(source);
        let cache = CollectionCache::new(source.clone(), enabled(Duration::from_secs(60)));
        source.fail_next(RepositoryError::Remote {
            status: 503,
            message: "maintenance".to_owned(),
        });

        let err = cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());

        let page = cache
            .fetch_page(&session(), &QueryState::new(10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn out_of_range_page_is_an_empty_result() {
        let (source, _arrivals) = FakeSource::new(resources(3));
        let cache = CollectionCache::new(Arc::new(source), CacheMode::Disabled);
        let mut state = QueryState::new(10);
        state.skip = 40;

        let page = cache.fetch_page(&session(), &state).await.unwrap();

        assert!(page.items.is_empty());
    }
}
