use super::{read_json, RepositoryError};
use crate::{
    interfaces::users::{AuthToken, CreatingUser, Credentials, User},
    remote::api_client::ApiClient,
};
use reqwest::Method;

#[derive(Clone)]
pub struct UserRepository {
    api_client: ApiClient,
}

impl UserRepository {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Exchanges credentials for a backend access token. The backend expects
    /// the OAuth2 password form, not JSON.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, RepositoryError> {
        let response = self
            .api_client
            .request(Method::POST, "auth/login", None)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn register(&self, user: &CreatingUser) -> Result<User, RepositoryError> {
        let response = self
            .api_client
            .request(Method::POST, "auth/register", None)
            .json(user)
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn find_current(&self, access_token: &str) -> Result<User, RepositoryError> {
        let response = self
            .api_client
            .request(Method::GET, "users/me", Some(access_token))
            .send()
            .await?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApplyMode, CacheMode, ConsoleConfig};
    use std::time::Duration;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn repository(server: &MockServer) -> UserRepository {
        let config = ConsoleConfig {
            api_url: server.uri(),
            api_timeout: Duration::from_secs(5),
            apply_mode: ApplyMode::Explicit,
            cache_mode: CacheMode::Disabled,
            default_limit: 10,
            session_ttl: Duration::from_secs(3600),
            port: 0,
        };

        UserRepository::new(ApiClient::init(&config).unwrap())
    }

    #[tokio::test]
    async fn login_posts_the_password_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("username=ada"))
            .and(body_string_contains("password=hunter2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "jwt",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = repository(&server)
            .login(&Credentials {
                username: "ada".to_owned(),
                password: "hunter2".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(token.access_token, "jwt");
    }

    #[tokio::test]
    async fn rejected_login_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "detail": "Incorrect username or password" })),
            )
            .mount(&server)
            .await;

        let err = repository(&server)
            .login(&Credentials {
                username: "ada".to_owned(),
                password: "wrong".to_owned(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Unauthorized));
    }

    #[tokio::test]
    async fn current_user_uses_the_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 4,
                "email": "ada@example.com",
                "username": "ada",
                "is_active": true,
                "is_admin": false
            })))
            .mount(&server)
            .await;

        let user = repository(&server).find_current("jwt").await.unwrap();

        assert_eq!(user.id, 4);
        assert!(!user.is_admin);
        assert_eq!(user.first_name, None);
    }
}
