use crate::{
    browser::{
        cache::{CollectionCache, Ticket},
        controller::QueryStateController,
        query::{Filters, QueryState, Sort},
        FetchError, ResourcePage,
    },
    forms::ValidationError,
    interfaces::browser::BrowserView,
    services::session_service::ConsoleSession,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserServiceError {
    #[error("backend rejected the session")]
    SessionInvalid,
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Drives a session's list view: applies the change under the controller
/// lock, fetches without holding it, and commits only the latest result.
///
/// Fetch failures are not errors here; they end up in the view's error state.
pub struct BrowserService;

impl BrowserService {
    pub const fn new() -> Self {
        Self
    }

    /// Current view, loading the first page if nothing was requested yet.
    pub async fn view(&self, console: &ConsoleSession) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, QueryStateController::initial).await
    }

    pub async fn set_filters(
        &self,
        console: &ConsoleSession,
        filters: Filters,
    ) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| controller.set_filters(filters))
            .await
    }

    pub async fn set_sort(
        &self,
        console: &ConsoleSession,
        sort: Sort,
    ) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| controller.set_sort(sort))
            .await
    }

    pub async fn apply(&self, console: &ConsoleSession) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| Some(controller.apply_pending()))
            .await
    }

    pub async fn reset_filters(
        &self,
        console: &ConsoleSession,
    ) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| Some(controller.reset_filters()))
            .await
    }

    pub async fn set_page(
        &self,
        console: &ConsoleSession,
        page: u32,
    ) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| Some(controller.set_page(page)))
            .await
    }

    pub async fn set_limit(
        &self,
        console: &ConsoleSession,
        limit: u32,
    ) -> Result<BrowserView, BrowserServiceError> {
        let ticket = {
            let mut controller = console.controller.lock().await;
            let state = controller.set_limit(limit)?;
            console.cache.issue(state)
        };

        self.complete(console, ticket, true).await
    }

    pub async fn retry(&self, console: &ConsoleSession) -> Result<BrowserView, BrowserServiceError> {
        self.run(console, true, |controller| Some(controller.retry()))
            .await
    }

    /// Reloads the active page from the backend, skipping the cache. Used
    /// after the collection was changed through this console.
    pub async fn refresh(
        &self,
        console: &ConsoleSession,
    ) -> Result<BrowserView, BrowserServiceError> {
        console.cache.invalidate().await;
        self.run(console, false, |controller| Some(controller.retry()))
            .await
    }

    async fn run(
        &self,
        console: &ConsoleSession,
        use_cache: bool,
        change: impl FnOnce(&mut QueryStateController) -> Option<QueryState>,
    ) -> Result<BrowserView, BrowserServiceError> {
        // Issue under the controller lock so sequence order matches the order
        // in which the active state changed.
        let ticket = {
            let mut controller = console.controller.lock().await;
            match change(&mut controller) {
                Some(state) => console.cache.issue(state),
                None => return Ok(controller.view()),
            }
        };

        self.complete(console, ticket, use_cache).await
    }

    async fn complete(
        &self,
        console: &ConsoleSession,
        ticket: Ticket,
        use_cache: bool,
    ) -> Result<BrowserView, BrowserServiceError> {
        let result = console
            .cache
            .resolve(&console.session, &ticket, use_cache)
            .await;

        let mut controller = console.controller.lock().await;
        self.record(&console.cache, &mut controller, &ticket, result)?;

        Ok(controller.view())
    }

    /// Applies a resolved fetch to the controller. Anything but the latest
    /// ticket is dropped, success or failure alike.
    fn record(
        &self,
        cache: &CollectionCache,
        controller: &mut QueryStateController,
        ticket: &Ticket,
        result: Result<ResourcePage, FetchError>,
    ) -> Result<(), BrowserServiceError> {
        let latest = cache.is_latest(ticket);

        match result {
            Err(FetchError::SessionInvalid) => {
                return Err(BrowserServiceError::SessionInvalid);
            }
            Ok(page) if latest => {
                controller.commit(&ticket.state, page);
            }
            Err(err) if latest && err != FetchError::StaleResultDiscarded => {
                log::error!(
                    "failed to fetch page {} of resources for {:?}: {err:#?}",
                    ticket.state.page(),
                    ticket.state.filters
                );
                controller.fail(&ticket.state, err);
            }
            Ok(_) | Err(_) => {}
        }

        Ok(())
    }
}
