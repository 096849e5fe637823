use super::{
    query::{Filters, QueryState, Sort},
    window::{PageWindow, PAGE_SIZE_CHOICES},
    FetchError, ResourcePage,
};
use crate::{
    config::ApplyMode,
    forms::ValidationError,
    interfaces::browser::{BrowserError, BrowserView},
};

struct Rendered {
    state: QueryState,
    page: ResourcePage,
}

/// Owns the paging, filter and sort state of one list view.
///
/// Every method that changes the active [`QueryState`] returns the state that
/// must now be fetched; the caller issues it and reports back through
/// [`Self::commit`] or [`Self::fail`]. Filter and sort edits stay pending until
/// applied, unless the controller runs in [`ApplyMode::Immediate`].
pub struct QueryStateController {
    apply_mode: ApplyMode,
    active: QueryState,
    pending_filters: Filters,
    pending_sort: Sort,
    issued: Option<QueryState>,
    rendered: Option<Rendered>,
    error: Option<FetchError>,
}

impl QueryStateController {
    pub fn new(apply_mode: ApplyMode, limit: u32) -> Self {
        let active = QueryState::new(limit);

        Self {
            apply_mode,
            pending_filters: active.filters.clone(),
            pending_sort: active.sort,
            active,
            issued: None,
            rendered: None,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> &QueryState {
        &self.active
    }

    pub fn set_filters(&mut self, next: Filters) -> Option<QueryState> {
        self.pending_filters = next;
        self.apply_if_immediate()
    }

    pub fn set_sort(&mut self, next: Sort) -> Option<QueryState> {
        self.pending_sort = next;
        self.apply_if_immediate()
    }

    /// Commits pending filters and sort and returns to the first page.
    pub fn apply_pending(&mut self) -> QueryState {
        self.active.filters = self.pending_filters.clone();
        self.active.sort = self.pending_sort;
        self.active.skip = 0;
        self.issue()
    }

    /// Moves to `page`, clamped into the range of the last rendered window.
    pub fn set_page(&mut self, page: u32) -> QueryState {
        let last = self.total_pages().unwrap_or(u32::MAX);
        let page = page.clamp(1, last.max(1));

        self.active.skip = u64::from(page - 1) * u64::from(self.active.limit);
        self.issue()
    }

    pub fn set_limit(&mut self, limit: u32) -> Result<QueryState, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::new("limit", "must be greater than zero"));
        }

        self.active.limit = limit;
        self.active.skip = 0;
        Ok(self.issue())
    }

    /// Clears every filter and applies right away. Pending sort edits are
    /// left alone.
    pub fn reset_filters(&mut self) -> QueryState {
        self.pending_filters = Filters::default();
        self.active.filters = Filters::default();
        self.active.skip = 0;
        self.issue()
    }

    /// Re-issues the active state unchanged.
    pub fn retry(&mut self) -> QueryState {
        self.issue()
    }

    /// The first fetch of a freshly opened view.
    pub fn initial(&mut self) -> Option<QueryState> {
        match self.issued {
            Some(_) => None,
            None => Some(self.issue()),
        }
    }

    /// Records the result for `state`. Ignored unless `state` is still active.
    pub fn commit(&mut self, state: &QueryState, page: ResourcePage) -> bool {
        if *state != self.active {
            return false;
        }

        self.rendered = Some(Rendered {
            state: state.clone(),
            page,
        });
        self.error = None;
        true
    }

    pub fn fail(&mut self, state: &QueryState, err: FetchError) -> bool {
        if *state != self.active {
            return false;
        }

        self.error = Some(err);
        true
    }

    /// Whether the rendered page was produced for the active state.
    pub fn is_current(&self) -> bool {
        self.rendered
            .as_ref()
            .is_some_and(|rendered| rendered.state == self.active)
    }

    pub fn is_loading(&self) -> bool {
        !self.is_current() && self.error.is_none()
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.rendered
            .as_ref()
            .map(|rendered| rendered.page.window.pages)
    }

    /// Rendered data is kept on screen while the next page loads.
    pub fn view(&self) -> BrowserView {
        let (items, window) = match &self.rendered {
            Some(rendered) => (rendered.page.items.clone(), rendered.page.window),
            None => (Vec::new(), PageWindow::default()),
        };

        BrowserView {
            items,
            buttons: window.buttons(),
            summary: window.item_range().to_string(),
            page_info: window,
            page_sizes: PAGE_SIZE_CHOICES.to_vec(),
            limit: self.active.limit,
            filters: self.active.filters.clone(),
            sort: self.active.sort,
            pending_filters: self.pending_filters.clone(),
            pending_sort: self.pending_sort,
            apply_mode: self.apply_mode,
            loading: self.is_loading(),
            error: self.error.as_ref().map(BrowserError::from),
        }
    }

    fn apply_if_immediate(&mut self) -> Option<QueryState> {
        match self.apply_mode {
            ApplyMode::Immediate => Some(self.apply_pending()),
            ApplyMode::Explicit => None,
        }
    }

    fn issue(&mut self) -> QueryState {
        self.error = None;
        self.issued = Some(self.active.clone());
        self.active.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{
        query::{OwnerScope, SortField, SortOrder},
        testing::resources,
    };

    fn page(total: u64, page: u32, pages: u32) -> ResourcePage {
        ResourcePage {
            items: resources(2),
            window: PageWindow::new(total, page, pages),
        }
    }

    fn busy_filters() -> Filters {
        Filters {
            owner: Some(OwnerScope::Owner(9)),
            is_public: Some(false),
            search: "quarterly".to_owned(),
        }
    }

    #[test]
    fn explicit_mode_keeps_edits_pending() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);

        assert_eq!(controller.set_filters(busy_filters()), None);
        assert_eq!(controller.view().pending_filters, busy_filters());
        assert_eq!(controller.active().filters, Filters::default());

        let sort = Sort {
            field: SortField::UpdatedAt,
            order: SortOrder::Desc,
        };
        assert_eq!(controller.set_sort(sort), None);
        assert_eq!(controller.active().sort, Sort::default());
    }

    #[test]
    fn immediate_mode_fetches_on_edit() {
        let mut controller = QueryStateController::new(ApplyMode::Immediate, 10);
        controller.set_page(3);

        let state = controller.set_filters(busy_filters()).unwrap();

        assert_eq!(state.filters, busy_filters());
        assert_eq!(state.skip, 0);
    }

    #[test]
    fn applied_filters_read_back_unchanged() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);

        controller.set_filters(busy_filters());
        let state = controller.apply_pending();

        assert_eq!(state.filters, busy_filters());
        assert_eq!(controller.active().filters, busy_filters());
    }

    #[test]
    fn apply_returns_to_first_page_and_is_idempotent() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        controller.commit(&QueryState::new(10), page(100, 1, 10));
        controller.set_page(4);

        let first = controller.apply_pending();
        let second = controller.apply_pending();

        assert_eq!(first.skip, 0);
        assert_eq!(first, second);
        assert_eq!(controller.active(), &first);
    }

    #[test]
    fn reset_clears_filters_and_page() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        controller.set_filters(busy_filters());
        controller.apply_pending();
        controller.set_filters(Filters {
            search: "draft".to_owned(),
            ..Filters::default()
        });
        controller.set_page(2);

        let state = controller.reset_filters();

        assert_eq!(state.filters.owner, None);
        assert_eq!(state.filters.is_public, None);
        assert_eq!(state.filters.search, "");
        assert_eq!(state.page(), 1);
        assert_eq!(controller.view().pending_filters, Filters::default());
    }

    #[test]
    fn set_limit_resets_to_first_page() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        controller.commit(&QueryState::new(10), page(100, 1, 10));
        controller.set_page(5);

        let state = controller.set_limit(25).unwrap();

        assert_eq!(state.limit, 25);
        assert_eq!(state.skip, 0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn zero_limit_is_rejected_without_side_effects() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        let before = controller.active().clone();

        let err = controller.set_limit(0).unwrap_err();

        assert_eq!(err.field, "limit");
        assert_eq!(controller.active(), &before);
    }

    #[test]
    fn set_page_computes_skip_and_clamps() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        controller.initial();
        controller.commit(&QueryState::new(10), page(45, 1, 5));

        assert_eq!(controller.set_page(3).skip, 20);
        assert_eq!(controller.set_page(0).skip, 0);
        assert_eq!(controller.set_page(42).skip, 40);
    }

    #[test]
    fn loading_until_active_state_is_rendered() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        let first = controller.initial().unwrap();
        assert!(controller.is_loading());
        assert_eq!(controller.initial(), None);

        assert!(controller.commit(&first, page(20, 1, 2)));
        assert!(controller.is_current());

        let second = controller.set_page(2);
        assert!(!controller.is_current());
        assert!(controller.is_loading());
        assert_eq!(controller.view().items.len(), 2);

        assert!(!controller.commit(&first, page(20, 1, 2)));
        assert!(controller.commit(&second, page(20, 2, 2)));
        assert_eq!(controller.view().page_info.page, 2);
    }

    #[test]
    fn failure_is_retryable_with_same_state() {
        let mut controller = QueryStateController::new(ApplyMode::Explicit, 10);
        let state = controller.initial().unwrap();
        controller.fail(
            &state,
            FetchError::Transport {
                message: "timed out".to_owned(),
            },
        );

        let view = controller.view();
        assert!(!view.loading);
        assert!(view.error.as_ref().unwrap().retryable);

        let retried = controller.retry();
        assert_eq!(retried, state);
        assert!(controller.view().error.is_none());
        assert!(controller.is_loading());
    }

    #[test]
    fn empty_view_before_first_result() {
        let controller = QueryStateController::new(ApplyMode::Explicit, 10);
        let view = controller.view();

        assert!(view.items.is_empty());
        assert_eq!(view.page_info, PageWindow::default());
        assert_eq!(view.summary, "No items to display");
        assert_eq!(view.page_sizes, vec![10, 25, 50, 100]);
    }
}
