use super::{expire, remote_status};
use crate::{
    guards::console_session::Authenticated,
    interfaces::{
        users::{CreatingUser, Credentials, OpenedSession, User},
        Message,
    },
    remote::repositories::RepositoryError,
    services::{
        auth_service::{AuthService, AuthServiceError, Session},
        session_service::SessionService,
    },
};
use rocket::{delete, get, http::Status, post, routes, serde::json::Json, Route, State};

pub fn routes() -> Vec<Route> {
    routes![session_open, session_register, session_get, session_close]
}

#[post("/", data = "<body>")]
async fn session_open(
    auth_service: &State<AuthService>,
    session_service: &State<SessionService>,
    body: Json<Credentials>,
) -> Result<Json<OpenedSession>, Status> {
    let session = match auth_service.login(&body).await {
        Ok(session) => session,
        Err(AuthServiceError::InvalidCredentials) => {
            return Err(Status::Unauthorized);
        }
        Err(AuthServiceError::RepositoryError(err)) => {
            log::error!("failed to log in: {err:#?}");
            return Err(remote_status(&err));
        }
    };

    open(session_service, session).await
}

#[post("/register", data = "<body>")]
async fn session_register(
    auth_service: &State<AuthService>,
    session_service: &State<SessionService>,
    body: Json<CreatingUser>,
) -> Result<Json<OpenedSession>, Status> {
    let session = match auth_service.register(body.into_inner()).await {
        Ok(session) => session,
        Err(AuthServiceError::InvalidCredentials) => {
            log::error!("failed to log in with freshly registered credentials");
            return Err(Status::InternalServerError);
        }
        Err(AuthServiceError::RepositoryError(err)) => {
            log::error!("failed to register user: {err:#?}");
            return Err(remote_status(&err));
        }
    };

    open(session_service, session).await
}

#[get("/")]
async fn session_get(
    auth_service: &State<AuthService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<User>, Status> {
    let access_token = &authenticated.console.session.access_token;

    match auth_service.current_user(access_token).await {
        Ok(user) => Ok(Json(user)),
        Err(AuthServiceError::RepositoryError(RepositoryError::Unauthorized))
        | Err(AuthServiceError::InvalidCredentials) => {
            Err(expire(session_service, &authenticated).await)
        }
        Err(AuthServiceError::RepositoryError(err)) => {
            log::error!("failed to get current user: {err:#?}");
            Err(remote_status(&err))
        }
    }
}

#[delete("/")]
async fn session_close(
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Json<Message> {
    session_service.close(&authenticated.token).await;

    Json(Message {
        message: "Logged out".to_owned(),
    })
}

async fn open(
    session_service: &SessionService,
    session: Session,
) -> Result<Json<OpenedSession>, Status> {
    let (token, console) = match session_service.open(session).await {
        Ok(opened) => opened,
        Err(err) => {
            log::error!("failed to open console session: {err:#?}");
            return Err(Status::InternalServerError);
        }
    };

    Ok(Json(OpenedSession {
        token,
        user: console.session.user.clone(),
        opened_at: console.opened_at,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{backend, client, login};
    use rocket::http::{ContentType, Header, Status};
    use serde_json::Value;
    use wiremock::{
        matchers::{method, path},
        Mock, ResponseTemplate,
    };

    #[rocket::async_test]
    async fn login_opens_a_session() {
        let server = backend().await;
        let client = client(&server).await;
        let authorization = login(&client).await;

        let response = client.get("/session").header(authorization).dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let user: Value = response.into_json().await.unwrap();
        assert_eq!(user["username"], "ada");
    }

    #[rocket::async_test]
    async fn rejected_credentials_are_unauthorized() {
        let server = wiremock::MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "detail": "Incorrect username or password" })),
            )
            .mount(&server)
            .await;
        let client = client(&server).await;

        let response = client
            .post("/session")
            .header(ContentType::JSON)
            .body(r#"{"username":"ada","password":"wrong"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["status"], 401);
    }

    #[rocket::async_test]
    async fn logout_forgets_the_token() {
        let server = backend().await;
        let client = client(&server).await;
        let authorization = login(&client).await;

        let response = client
            .delete("/session")
            .header(authorization.clone())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/session").header(authorization).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn requests_without_a_token_are_unauthorized() {
        let server = backend().await;
        let client = client(&server).await;

        let response = client
            .get("/session")
            .header(Header::new("Authorization", "Bearer unknown"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client.get("/browser").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }
}
