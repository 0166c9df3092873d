//! Request handlers for the ledger's JSON API.
//!
//! Handlers only translate between HTTP and [`crate::core`]; every rule lives in
//! the core operations.

use crate::{
    core::{booth, participant, transfer},
    errors::{Error, Result},
    web::{
        AppState,
        auth::{AuthenticatedParticipant, clear_session_cookie, session_cookie},
    },
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /activate`
#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    /// Participant phone number
    pub phone: String,
    /// Password to set (first activation) or check
    pub password: String,
}

/// Body of `POST /transfer`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Receiving booth
    pub booth_id: String,
    /// Points to move
    pub amount: i64,
    /// Optional annotation
    #[serde(default)]
    pub note: Option<String>,
}

/// Body returned by `POST /activate`
#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    /// Always `true`
    pub success: bool,
    /// Activation or login confirmation
    pub message: &'static str,
    /// Current balance
    pub balance: i64,
}

/// Body returned by `GET /balance`
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Always `true`
    pub success: bool,
    /// Current balance
    pub balance: i64,
}

/// Body returned by `GET /booths`
#[derive(Debug, Serialize)]
pub struct BoothsResponse {
    /// Always `true`
    pub success: bool,
    /// Booths ordered by id
    pub booths: Vec<booth::BoothSummary>,
}

/// Body returned by `POST /transfer`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Always `true`
    pub success: bool,
    /// Confirmation
    pub message: &'static str,
    /// Participant balance after the transfer
    pub new_balance: i64,
    /// Booth balance after the transfer
    pub booth_balance: i64,
    /// Booth name at transfer time
    pub booth_name: String,
}

/// Body returned by `POST /logout`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always `true`
    pub success: bool,
    /// Confirmation
    pub message: &'static str,
}

/// `POST /activate` - activates or logs in and sets the session cookie.
pub async fn activate(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    let activation =
        participant::activate(&state.db, &state.sessions, &request.phone, &request.password)
            .await?;

    let message = if activation.first_activation {
        "激活成功"
    } else {
        "登录成功"
    };
    let cookie = session_cookie(
        activation.token,
        state.sessions.ttl(),
        state.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ActivateResponse {
            success: true,
            message,
            balance: activation.balance,
        }),
    )
        .into_response())
}

/// `GET /balance` - current balance of the session's participant.
pub async fn balance(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedParticipant>,
) -> Result<Json<BalanceResponse>> {
    let balance = participant::get_balance(&state.db, &caller.phone).await?;
    Ok(Json(BalanceResponse {
        success: true,
        balance,
    }))
}

/// `GET /booths` - every booth's id and name.
pub async fn booths(State(state): State<Arc<AppState>>) -> Result<Json<BoothsResponse>> {
    let booths = booth::list_booths(&state.db).await?;
    Ok(Json(BoothsResponse {
        success: true,
        booths,
    }))
}

/// `POST /transfer` - moves points from the session's participant to a booth.
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedParticipant>,
    payload: std::result::Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>> {
    let Json(request) = payload?;
    let booth_id = request.booth_id.trim();
    if booth_id.is_empty() {
        return Err(Error::Validation {
            message: "请选择摊位".to_string(),
        });
    }

    let receipt = transfer::transfer(
        &state.db,
        &caller.phone,
        booth_id,
        request.amount,
        request.note,
    )
    .await?;

    Ok(Json(TransferResponse {
        success: true,
        message: "转账成功",
        new_balance: receipt.new_balance,
        booth_balance: receipt.booth_balance,
        booth_name: receipt.booth_name,
    }))
}

/// `POST /logout` - clears the session cookie.
pub async fn logout(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.cookie_secure))],
        Json(MessageResponse {
            success: true,
            message: "登出成功",
        }),
    )
        .into_response()
}
