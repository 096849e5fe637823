use crate::interfaces::pages::PageInfo;
use serde::Serialize;
use std::fmt::{self, Display};

pub const DEFAULT_MAX_BUTTONS: u32 = 5;

/// Page sizes offered next to the page buttons.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [10, 25, 50, 100];

/// Pagination metadata that always satisfies `1 <= page <= pages`,
/// `has_prev == (page > 1)` and `has_next == (page < pages)`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn new(total: u64, page: u32, pages: u32) -> Self {
        let pages = pages.max(1);
        let page = page.clamp(1, pages);

        Self {
            total,
            page,
            pages,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }

    /// Repairs whatever the backend reported into a consistent window.
    pub fn from_page_info(info: &PageInfo) -> Self {
        let clamp = |value: i64| u32::try_from(value.max(0)).unwrap_or(u32::MAX);
        let window = Self::new(
            u64::try_from(info.total).unwrap_or(0),
            clamp(info.page),
            clamp(info.pages),
        );

        // An empty collection is reported as zero pages; that is expected.
        let empty = info.total == 0 && info.pages == 0;
        if !empty && window.to_page_info() != *info {
            log::warn!("backend reported an inconsistent page window {info:?}; using {window:?}");
        }

        window
    }

    pub fn to_page_info(self) -> PageInfo {
        PageInfo {
            total: i64::try_from(self.total).unwrap_or(i64::MAX),
            page: i64::from(self.page),
            pages: i64::from(self.pages),
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        compute_window(self.page, self.pages, DEFAULT_MAX_BUTTONS)
    }

    pub fn item_range(&self) -> ItemRange {
        ItemRange::compute(self.total, self.page, self.pages)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PageButton {
    Page { number: u32 },
    /// Placeholder for skipped pages; never selectable.
    Ellipsis,
}

impl PageButton {
    pub fn page(number: u32) -> Self {
        Self::Page { number }
    }
}

/// Lays out the page buttons around `current`.
///
/// With more pages than `max_buttons`, a run of `max_buttons` consecutive
/// pages is centred on `current` and kept inside `1..=total_pages`; the first
/// and last page are always reachable, separated from the run by an ellipsis
/// when pages are skipped in between.
pub fn compute_window(current: u32, total_pages: u32, max_buttons: u32) -> Vec<PageButton> {
    let total_pages = total_pages.max(1);
    let max_buttons = max_buttons.max(1);
    let current = current.clamp(1, total_pages);

    if total_pages <= max_buttons {
        return (1..=total_pages).map(PageButton::page).collect();
    }

    let mut start = current.saturating_sub(max_buttons / 2).max(1);
    let end = (start + max_buttons - 1).min(total_pages);
    if end - start + 1 < max_buttons {
        start = end + 1 - max_buttons;
    }

    let mut buttons = Vec::with_capacity(max_buttons as usize + 4);

    if start > 1 {
        buttons.push(PageButton::page(1));
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }

    buttons.extend((start..=end).map(PageButton::page));

    if end < total_pages {
        if end < total_pages - 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::page(total_pages));
    }

    buttons
}

/// The "Showing x to y of z items" caption.
///
/// Items per page is approximated as `ceil(total / pages)`, so the bounds are
/// off when the backend's pages are unevenly sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRange {
    Empty,
    Span { start: u64, end: u64, total: u64 },
}

impl ItemRange {
    pub fn compute(total: u64, page: u32, pages: u32) -> Self {
        if total == 0 {
            return Self::Empty;
        }

        let pages = u64::from(pages.max(1));
        let page = u64::from(page.max(1)).min(pages);
        let items_per_page = total.div_ceil(pages);
        let end = (page * items_per_page).min(total);
        let start = ((page - 1) * items_per_page + 1).min(end);

        Self::Span { start, end, total }
    }
}

impl Display for ItemRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRange::Empty => write!(f, "No items to display"),
            ItemRange::Span { start, end, total } => {
                write!(f, "Showing {start} to {end} of {total} items")
            }
        }
    }
}
