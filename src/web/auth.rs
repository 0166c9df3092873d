//! Session gatekeeper and session cookie helpers.

use crate::{errors::Error, web::AppState};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use cookie::{Cookie, SameSite, time};
use std::{sync::Arc, time::Duration};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Identity of the caller, inserted into request extensions by [`require_session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedParticipant {
    /// Phone number bound to the verified session
    pub phone: String,
}

/// Rejects requests without a valid, unexpired session before any handler runs.
///
/// A missing cookie is [`Error::Unauthenticated`]; a cookie that fails
/// verification is [`Error::SessionExpired`]. Neither path touches storage.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = session_token(request.headers()).ok_or(Error::Unauthenticated)?;
    let claims = state.sessions.verify(&token)?;

    request
        .extensions_mut()
        .insert(AuthenticatedParticipant {
            phone: claims.phone,
        });
    Ok(next.run(request).await)
}

/// Extracts the session token from the request's `Cookie` headers.
///
/// An empty token (as left behind by logout) counts as absent.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(std::result::Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Builds the `Set-Cookie` value that stores a freshly issued token.
#[must_use]
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> String {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
        .to_string()
}

/// Builds the `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
        .to_string()
}
