use base64::Engine;
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("system random number generator is unavailable")]
pub struct TokenServiceError;

/// Issues the opaque tokens the browser uses to address its console session.
pub struct TokenService {
    rng: ring::rand::SystemRandom,
}

impl TokenService {
    pub fn new() -> Self {
        Self {
            rng: ring::rand::SystemRandom::new(),
        }
    }

    /// Generates a random url-safe session token.
    /// The output length is always `43` characters.
    pub fn generate_token(&self) -> Result<String, TokenServiceError> {
        const ENCODER: base64::engine::GeneralPurpose = base64::engine::GeneralPurpose::new(
            &base64::alphabet::URL_SAFE,
            base64::engine::GeneralPurposeConfig::new().with_encode_padding(false),
        );

        let mut buf = [0u8; 32];
        self.rng.fill(&mut buf).map_err(|_| TokenServiceError)?;

        Ok(ENCODER.encode(buf))
    }

    /// Extracts the token from an `Authorization: Bearer <token>` header value.
    pub fn parse_bearer<'a>(&self, header: &'a str) -> Option<&'a str> {
        let (scheme, token) = header.trim().split_once(' ')?;
        let token = token.trim();

        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}
