//! Participant business logic - activation, balance lookup and provisioning.
//!
//! Activation is the only operation that writes participant credentials. It sets a
//! password hash and flips `is_activated` in one conditional update, so the
//! false→true transition happens at most once even under concurrent requests.

use crate::{
    core::{password, session::SessionIssuer},
    entities::{Participant, participant},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// Result of a successful activation or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Participant's current balance
    pub balance: i64,
    /// Freshly minted session token
    pub token: String,
    /// `true` if this call performed the first activation
    pub first_activation: bool,
}

/// Checks that `phone` looks like a mainland mobile number (11 ASCII digits).
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() == 11 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::Validation {
            message: "手机号格式不正确".to_string(),
        })
    }
}

/// Finds a participant by phone number.
pub async fn get_participant_by_phone<C>(db: &C, phone: &str) -> Result<Option<participant::Model>>
where
    C: ConnectionTrait,
{
    Participant::find_by_id(phone.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Activates an account on first use, or logs in an already activated one.
///
/// - Unknown phone: [`Error::ParticipantNotFound`].
/// - Activated account: the password is verified; a mismatch is
///   [`Error::InvalidCredentials`] and nothing is written.
/// - Not yet activated: the password is hashed and stored and the account is
///   marked activated.
///
/// A session token is issued on every success.
#[instrument(skip(db, issuer, password))]
pub async fn activate(
    db: &DatabaseConnection,
    issuer: &SessionIssuer,
    phone: &str,
    password: &str,
) -> Result<Activation> {
    validate_phone(phone)?;
    if password.is_empty() {
        return Err(Error::Validation {
            message: "密码不能为空".to_string(),
        });
    }

    let participant = get_participant_by_phone(db, phone)
        .await?
        .ok_or_else(|| Error::ParticipantNotFound {
            phone: phone.to_string(),
        })?;

    let first_activation = if participant.is_activated {
        check_password(&participant, password).await?;
        false
    } else {
        let hash = password::hash_password(password).await?;
        let claimed = Participant::update_many()
            .col_expr(participant::Column::PasswordHash, Expr::value(Some(hash)))
            .col_expr(participant::Column::IsActivated, Expr::value(true))
            .filter(participant::Column::Phone.eq(phone))
            .filter(participant::Column::IsActivated.eq(false))
            .exec(db)
            .await?;

        if claimed.rows_affected == 0 {
            // Another request activated the account first; its password wins.
            let current = get_participant_by_phone(db, phone).await?.ok_or_else(|| {
                Error::ParticipantNotFound {
                    phone: phone.to_string(),
                }
            })?;
            check_password(&current, password).await?;
            false
        } else {
            info!("Participant activated");
            true
        }
    };

    let token = issuer.issue(phone)?;
    Ok(Activation {
        balance: participant.balance,
        token,
        first_activation,
    })
}

async fn check_password(participant: &participant::Model, password: &str) -> Result<()> {
    let Some(stored) = participant.password_hash.as_deref() else {
        warn!(phone = %participant.phone, "Activated participant has no stored password");
        return Err(Error::InvalidCredentials);
    };
    if password::verify_password(password, stored).await? {
        Ok(())
    } else {
        warn!(phone = %participant.phone, "Password mismatch");
        Err(Error::InvalidCredentials)
    }
}

/// Returns the balance of the participant bound to a verified session.
pub async fn get_balance(db: &DatabaseConnection, phone: &str) -> Result<i64> {
    get_participant_by_phone(db, phone)
        .await?
        .map(|p| p.balance)
        .ok_or_else(|| Error::ParticipantNotFound {
            phone: phone.to_string(),
        })
}

/// Inserts an un-activated participant unless one already exists for `phone`.
///
/// Returns `true` if a row was created. Existing rows keep their balance and
/// activation state.
pub async fn provision_participant(
    db: &DatabaseConnection,
    phone: &str,
    balance: i64,
) -> Result<bool> {
    validate_phone(phone)?;
    if balance < 0 {
        return Err(Error::Validation {
            message: format!("Starting balance for {phone} cannot be negative"),
        });
    }
    if get_participant_by_phone(db, phone).await?.is_some() {
        return Ok(false);
    }

    participant::ActiveModel {
        phone: Set(phone.to_string()),
        password_hash: Set(None),
        is_activated: Set(false),
        balance: Set(balance),
    }
    .insert(db)
    .await?;
    Ok(true)
}
