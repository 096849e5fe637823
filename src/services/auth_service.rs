use crate::{
    interfaces::users::{CreatingUser, Credentials, User},
    remote::repositories::{users::UserRepository, RepositoryError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthServiceError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("repository error: {0:#?}")]
    RepositoryError(#[from] RepositoryError),
}

/// A signed-in user together with the backend credential. Passed explicitly
/// to every backend call made on the user's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
}

impl AuthService {
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthServiceError> {
        let token = match self.user_repository.login(credentials).await {
            Ok(token) => token,
            Err(RepositoryError::Unauthorized) => return Err(AuthServiceError::InvalidCredentials),
            Err(err) => return Err(err.into()),
        };

        if !token.token_type.eq_ignore_ascii_case("bearer") {
            log::warn!("backend issued a `{}` token; treating it as bearer", token.token_type);
        }

        let user = self.current_user(&token.access_token).await?;

        Ok(Session {
            access_token: token.access_token,
            user,
        })
    }

    pub async fn current_user(&self, access_token: &str) -> Result<User, AuthServiceError> {
        Ok(self.user_repository.find_current(access_token).await?)
    }

    /// Registers an account and signs it in, like the registration screen does.
    pub async fn register(&self, user: CreatingUser) -> Result<Session, AuthServiceError> {
        self.user_repository.register(&user).await?;

        self.login(&Credentials {
            username: user.username,
            password: user.password,
        })
        .await
    }
}
