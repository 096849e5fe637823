//! Paginated, filterable, sortable view over the remote resource collection.
//!
//! [`controller::QueryStateController`] owns what the user asked for,
//! [`cache::CollectionCache`] turns a [`query::QueryState`] into a page while
//! making sure only the latest issued request ever becomes visible, and
//! [`window`] lays the result out as page buttons.

use crate::{
    interfaces::{
        pages::Page,
        resources::{ListParams, Resource},
    },
    remote::repositories::RepositoryError,
    services::auth_service::Session,
};
use rocket::async_trait;
use thiserror::Error;
use window::PageWindow;

pub mod cache;
pub mod controller;
pub mod query;
pub mod window;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("session is no longer valid")]
    SessionInvalid,

    /// A newer request was issued before this one resolved. Dropped silently.
    #[error("request superseded by newer request")]
    StaleResultDiscarded,
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { .. } | FetchError::StaleResultDiscarded => None,
            FetchError::Server { status, .. } => Some(*status),
            FetchError::SessionInvalid => Some(401),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Server { .. })
    }
}

impl From<RepositoryError> for FetchError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Transport(err) => FetchError::Transport {
                message: err.to_string(),
            },
            RepositoryError::Unauthorized => FetchError::SessionInvalid,
            RepositoryError::Remote { status, message } => FetchError::Server { status, message },
        }
    }
}

/// Anything that can serve a page of resources for a session.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn list_resources(
        &self,
        session: &Session,
        params: &ListParams,
    ) -> Result<Page<Resource>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePage {
    pub items: Vec<Resource>,
    pub window: PageWindow,
}

impl From<Page<Resource>> for ResourcePage {
    fn from(page: Page<Resource>) -> Self {
        Self {
            window: PageWindow::from_page_info(&page.page_info),
            items: page.items,
        }
    }
}
