//! Web layer - axum router, session gatekeeper and JSON handlers.
//!
//! `/activate` and `/logout` are public. `/balance`, `/booths` and `/transfer` sit
//! behind [`auth::require_session`], which rejects unauthenticated requests before
//! any handler or storage call runs.

/// Session gatekeeper middleware and cookie helpers
pub mod auth;
/// Route handlers
pub mod handlers;
/// Error to HTTP response mapping
pub mod response;

use crate::core::session::SessionIssuer;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state available to all handlers.
pub struct AppState {
    /// Record store connection
    pub db: DatabaseConnection,
    /// Session token issuer and verifier
    pub sessions: SessionIssuer,
    /// Whether session cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}

impl AppState {
    /// Creates the shared state handed to [`router`].
    #[must_use]
    pub fn new(db: DatabaseConnection, sessions: SessionIssuer, cookie_secure: bool) -> Arc<Self> {
        Arc::new(Self {
            db,
            sessions,
            cookie_secure,
        })
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/balance", get(handlers::balance))
        .route("/booths", get(handlers::booths))
        .route("/transfer", post(handlers::transfer))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_session,
        ));

    Router::new()
        .route("/activate", post(handlers::activate))
        .route("/logout", post(handlers::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Result, test_utils::*};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_state(balance: i64) -> Result<Arc<AppState>> {
        let db = setup_with_participant_and_booth(balance).await?;
        Ok(AppState::new(db, test_issuer(), false))
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn cookie_token(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap();
        pair.strip_prefix("token=").unwrap().to_string()
    }

    async fn login(state: &Arc<AppState>, password: &str) -> String {
        let response = router(Arc::clone(state))
            .oneshot(json_request(
                "POST",
                "/activate",
                None,
                &json!({ "phone": TEST_PHONE, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_token(&response)
    }

    #[tokio::test]
    async fn test_activate_sets_cookie_and_never_echoes_password() -> Result<()> {
        let state = test_state(100).await?;

        let response = router(Arc::clone(&state))
            .oneshot(json_request(
                "POST",
                "/activate",
                None,
                &json!({ "phone": TEST_PHONE, "password": "pa55word" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["balance"], 100);
        assert_eq!(body["message"], "激活成功");
        assert!(!body.to_string().contains("pa55word"));
        Ok(())
    }

    #[tokio::test]
    async fn test_activate_failures() -> Result<()> {
        let state = test_state(100).await?;
        login(&state, "right").await;

        let cases = [
            (
                json!({ "phone": TEST_PHONE, "password": "wrong" }),
                StatusCode::UNAUTHORIZED,
                "密码错误",
            ),
            (
                json!({ "phone": "13900000000", "password": "x" }),
                StatusCode::NOT_FOUND,
                "用户不存在",
            ),
            (
                json!({ "phone": "12", "password": "x" }),
                StatusCode::BAD_REQUEST,
                "手机号格式不正确",
            ),
        ];

        for (body, status, message) in cases {
            let response = router(Arc::clone(&state))
                .oneshot(json_request("POST", "/activate", None, &body))
                .await
                .unwrap();
            assert_eq!(response.status(), status);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
            assert_eq!(body_json(response).await["message"], message);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() -> Result<()> {
        let state = test_state(100).await?;
        let request = Request::builder()
            .method("POST")
            .uri("/activate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(Arc::clone(&state)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "请求格式错误");

        // Deserializer details stay out of the user-facing message
        let response = router(state)
            .oneshot(json_request(
                "POST",
                "/activate",
                None,
                &json!({ "phone": TEST_PHONE }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "请求格式错误");
        assert!(!body.to_string().contains("missing field"));
        Ok(())
    }

    #[tokio::test]
    async fn test_balance_requires_session() -> Result<()> {
        let state = test_state(100).await?;

        let response = router(Arc::clone(&state))
            .oneshot(get_request("/balance", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "未登录");

        let response = router(Arc::clone(&state))
            .oneshot(get_request("/balance", Some("forged.token.value")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "登录已过期");
        Ok(())
    }

    #[tokio::test]
    async fn test_gate_rejects_before_touching_storage() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let state = AppState::new(db, test_issuer(), false);

        for request in [
            get_request("/balance", None),
            get_request("/booths", Some("garbage")),
            json_request(
                "POST",
                "/transfer",
                None,
                &json!({ "boothId": TEST_BOOTH, "amount": 1 }),
            ),
        ] {
            let response = router(Arc::clone(&state)).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let state = Arc::into_inner(state).unwrap();
        assert!(state.db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_balance_and_booths_with_session() -> Result<()> {
        let state = test_state(100).await?;
        create_test_booth(&state.db, "B1", "Bakery").await?;
        let token = login(&state, "pw").await;

        let response = router(Arc::clone(&state))
            .oneshot(get_request("/balance", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["balance"], 100);

        let response = router(Arc::clone(&state))
            .oneshot(get_request("/booths", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["booths"],
            json!([
                { "id": "A1", "name": "Coffee Corner" },
                { "id": "B1", "name": "Bakery" }
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_balance_for_removed_participant() -> Result<()> {
        let state = test_state(100).await?;
        let token = state.sessions.issue("13900000000")?;

        let response = router(state)
            .oneshot(get_request("/balance", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_end_to_end() -> Result<()> {
        let state = test_state(100).await?;
        let token = login(&state, "pw").await;

        let response = router(Arc::clone(&state))
            .oneshot(json_request(
                "POST",
                "/transfer",
                Some(&token),
                &json!({ "boothId": TEST_BOOTH, "amount": 30, "note": "lunch" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["newBalance"], 70);
        assert_eq!(body["boothBalance"], 30);
        assert_eq!(body["boothName"], "Coffee Corner");

        assert_eq!(participant_balance(&state.db, TEST_PHONE).await?, 70);
        assert_eq!(booth_balance(&state.db, TEST_BOOTH).await?, 30);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_failures() -> Result<()> {
        let state = test_state(50).await?;
        let token = login(&state, "pw").await;

        let cases = [
            (
                json!({ "boothId": TEST_BOOTH, "amount": 51 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "boothId": "Z9", "amount": 5 }),
                StatusCode::NOT_FOUND,
            ),
            (
                json!({ "boothId": TEST_BOOTH, "amount": 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "boothId": TEST_BOOTH, "amount": 2.5 }),
                StatusCode::BAD_REQUEST,
            ),
            (json!({ "boothId": "", "amount": 5 }), StatusCode::BAD_REQUEST),
        ];

        for (body, status) in cases {
            let response = router(Arc::clone(&state))
                .oneshot(json_request("POST", "/transfer", Some(&token), &body))
                .await
                .unwrap();
            assert_eq!(response.status(), status, "{body}");
        }

        assert_eq!(participant_balance(&state.db, TEST_PHONE).await?, 50);
        assert_eq!(booth_balance(&state.db, TEST_BOOTH).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() -> Result<()> {
        let state = test_state(100).await?;

        let response = router(state)
            .oneshot(json_request("POST", "/logout", None, &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert_eq!(body_json(response).await["message"], "登出成功");
        Ok(())
    }
}
