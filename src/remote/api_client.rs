use crate::config::ConsoleConfig;
use reqwest::{Client, Method, RequestBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("`RESOURCE_API_URL` is not an absolute http(s) url: `{0}`")]
    InvalidBaseUrl(String),

    #[error("http client construction failure: {0:#?}")]
    ClientConstructionFailure(#[from] reqwest::Error),
}

/// Connection to the resource backend. Cheap to clone.
///
/// Redirects are followed by reqwest, which keeps the `Authorization` header
/// as long as the redirect stays on the same host.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn init(config: &ConsoleConfig) -> Result<Self, ApiClientError> {
        let base_url = config.api_url.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiClientError::InvalidBaseUrl(config.api_url.clone()));
        }

        let http = Client::builder()
            .timeout(config.api_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Starts a request to `path` (relative to the base url), carrying
    /// `bearer` as the credential when given.
    pub fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = self.http.request(method, url);

        match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
