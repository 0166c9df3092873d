//! Session issuer - mints and verifies signed, time-limited session tokens.
//!
//! Tokens are HS256 JWTs whose claims bind a participant's phone number and an
//! expiry. No server-side session state is kept; the signing secret is the only
//! shared value.

use crate::errors::{Error, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Phone number of the authenticated participant
    pub phone: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer {
    /// Creates an issuer from the configured secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Lifetime of tokens minted by this issuer.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mints a token for `phone`, valid for the configured lifetime.
    pub fn issue(&self, phone: &str) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let ttl_secs = i64::try_from(self.ttl.as_secs()).map_err(|e| Error::Token {
            message: e.to_string(),
        })?;
        let claims = SessionClaims {
            phone: phone.to_string(),
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |error| Error::Token {
                message: error.to_string(),
            },
        )
    }

    /// Verifies signature and expiry and returns the embedded claims.
    ///
    /// Every failure is reported as [`Error::SessionExpired`].
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| Error::SessionExpired)
    }
}
