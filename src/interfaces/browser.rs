use crate::{
    browser::{
        query::{Filters, Sort},
        window::{PageButton, PageWindow},
        FetchError,
    },
    config::ApplyMode,
    interfaces::resources::Resource,
};
use serde::Serialize;

/// Everything the list screen needs to draw itself.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BrowserView {
    pub items: Vec<Resource>,
    pub page_info: PageWindow,
    pub buttons: Vec<PageButton>,
    pub summary: String,
    pub page_sizes: Vec<u32>,
    pub limit: u32,
    pub filters: Filters,
    pub sort: Sort,
    pub pending_filters: Filters,
    pub pending_sort: Sort,
    pub apply_mode: ApplyMode,
    pub loading: bool,
    pub error: Option<BrowserError>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserError {
    pub status: Option<u16>,
    pub message: String,
    pub retryable: bool,
}

impl From<&FetchError> for BrowserError {
    fn from(err: &FetchError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResource {
    pub resource: Resource,
    pub view: BrowserView,
}
