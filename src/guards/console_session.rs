use crate::services::session_service::{ConsoleSession, SessionService};
use rocket::{
    async_trait,
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};
use std::sync::Arc;

/// The console session named by the request's bearer token.
pub struct Authenticated {
    pub token: String,
    pub console: Arc<ConsoleSession>,
}

#[derive(Debug)]
pub enum AuthenticatedError {
    MissingToken,
    UnknownToken,
    Unmanaged,
}

#[async_trait]
impl<'r> FromRequest<'r> for Authenticated {
    type Error = AuthenticatedError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(sessions) = req.rocket().state::<SessionService>() else {
            log::error!("session service is not managed by this rocket instance");
            return Outcome::Error((Status::InternalServerError, AuthenticatedError::Unmanaged));
        };

        let token = match req
            .headers()
            .get_one("Authorization")
            .and_then(|header| sessions.token_service().parse_bearer(header))
        {
            Some(token) => token,
            None => {
                return Outcome::Error((Status::Unauthorized, AuthenticatedError::MissingToken));
            }
        };

        match sessions.find(token).await {
            Some(console) => Outcome::Success(Self {
                token: token.to_owned(),
                console,
            }),
            None => Outcome::Error((Status::Unauthorized, AuthenticatedError::UnknownToken)),
        }
    }
}
