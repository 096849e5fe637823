mod browser;
mod resources;
mod session;

use crate::{
    guards::console_session::Authenticated, remote::repositories::RepositoryError,
    services::session_service::SessionService,
};
use rocket::{catch, catchers, http::Status, serde::json::Json, Build, Request, Rocket};
use serde::Serialize;

pub fn register_root(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .register("/", catchers![default])
        .mount("/session", session::routes())
        .mount("/browser", browser::routes())
        .mount("/resources", resources::routes())
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    pub status: u16,
    pub message: Option<&'a str>,
}

#[catch(default)]
fn default(status: Status, _req: &Request) -> Json<ErrorBody<'static>> {
    Json(ErrorBody {
        status: status.code,
        message: status.reason(),
    })
}

/// Status answered to the browser when a backend call fails.
fn remote_status(err: &RepositoryError) -> Status {
    match err {
        RepositoryError::Transport(_) => Status::BadGateway,
        RepositoryError::Unauthorized => Status::Unauthorized,
        RepositoryError::Remote { status, .. } if (400..500).contains(status) => {
            Status::from_code(*status).unwrap_or(Status::BadRequest)
        }
        RepositoryError::Remote { .. } => Status::BadGateway,
    }
}

/// Drops a console session whose backend credential was rejected.
async fn expire(session_service: &SessionService, authenticated: &Authenticated) -> Status {
    session_service.close(&authenticated.token).await;
    Status::Unauthorized
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::{ApplyMode, CacheMode, ConsoleConfig};
    use rocket::{
        http::{ContentType, Header, Status},
        local::asynchronous::Client,
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    pub const BACKEND_TOKEN: &str = "backend-token";

    pub fn user() -> Value {
        json!({
            "id": 1,
            "email": "ada@example.com",
            "username": "ada",
            "is_active": true,
            "is_admin": false,
        })
    }

    pub fn resource(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "content": null,
            "meta_data": null,
            "is_public": false,
            "owner_id": 1,
        })
    }

    pub fn page(items: Vec<Value>, total: i64, page: i64, pages: i64) -> Value {
        json!({
            "items": items,
            "page_info": {
                "total": total,
                "page": page,
                "pages": pages,
                "has_next": page < pages,
                "has_prev": page > 1,
            },
        })
    }

    /// A backend that accepts `ada`/`secret` and knows who `ada` is.
    pub async fn backend() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": BACKEND_TOKEN,
                "token_type": "bearer",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer backend-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user()))
            .mount(&server)
            .await;

        server
    }

    pub async fn client(server: &MockServer) -> Client {
        let config = ConsoleConfig {
            api_url: server.uri(),
            api_timeout: Duration::from_secs(5),
            apply_mode: ApplyMode::Explicit,
            cache_mode: CacheMode::Disabled,
            default_limit: 10,
            session_ttl: Duration::from_secs(3600),
            port: 0,
        };
        let rocket = crate::stage(&config).expect("valid test configuration");

        Client::untracked(rocket).await.expect("valid rocket instance")
    }

    /// Logs in and returns the `Authorization` header for the new session.
    pub async fn login(client: &Client) -> Header<'static> {
        let response = client
            .post("/session")
            .header(ContentType::JSON)
            .body(r#"{"username":"ada","password":"secret"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().await.expect("session body");
        let token = body["token"].as_str().expect("session token").to_owned();

        Header::new("Authorization", format!("Bearer {token}"))
    }
}
