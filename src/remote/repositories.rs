use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod resources;
pub mod users;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("transport error: {0:#?}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected the session credential")]
    Unauthorized,

    #[error("backend responded with {status}: {message}")]
    Remote { status: u16, message: String },
}

impl RepositoryError {
    /// Builds the error for a non-success response, preferring the backend's
    /// `detail` message over the bare status reason.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Self::Unauthorized;
        }

        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").cloned());
        let message = match detail {
            Some(Value::String(detail)) => detail,
            Some(detail) => detail.to_string(),
            None => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };

        Self::Remote {
            status: status.as_u16(),
            message,
        }
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
    if !response.status().is_success() {
        return Err(RepositoryError::from_response(response).await);
    }

    Ok(response.json().await?)
}

/// Like [`read_json`], with `404 Not Found` mapped to `None`.
pub(crate) async fn read_optional_json<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, RepositoryError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    read_json(response).await.map(Some)
}
