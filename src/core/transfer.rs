//! Transfer business logic - moves points from a participant to a booth.
//!
//! The debit, the credit and the transaction row are written inside a single
//! database transaction. Both balance changes are conditional `UPDATE ... SET
//! balance = balance ± amount` statements, so concurrent transfers from the same
//! participant can neither lose a debit nor overdraw the account. If any step fails
//! the transaction is dropped uncommitted and no state changes are visible.

use crate::{
    core::{booth::get_booth_by_id, participant::get_participant_by_phone},
    entities::{Booth, Participant, booth, participant, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Outcome of a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Participant balance after the debit
    pub new_balance: i64,
    /// Booth balance after the credit
    pub booth_balance: i64,
    /// Booth name at transfer time
    pub booth_name: String,
    /// The appended transaction row
    pub transaction: transaction::Model,
}

/// Transfers `amount` points from the participant `phone` to booth `booth_id`.
///
/// # Errors
/// - [`Error::Validation`] if `amount` is not positive (checked before any storage access)
/// - [`Error::ParticipantNotFound`] if no participant has this phone
/// - [`Error::InsufficientFunds`] if the balance is below `amount`
/// - [`Error::BoothNotFound`] if no booth has this id
/// - [`Error::Database`] on storage failure; nothing is committed in that case
#[instrument(skip(db, note))]
pub async fn transfer(
    db: &DatabaseConnection,
    phone: &str,
    booth_id: &str,
    amount: i64,
    note: Option<String>,
) -> Result<TransferReceipt> {
    if amount <= 0 {
        return Err(Error::Validation {
            message: "转账积分必须为正整数".to_string(),
        });
    }

    let txn = db.begin().await?;

    let debited = Participant::update_many()
        .col_expr(
            participant::Column::Balance,
            Expr::col(participant::Column::Balance).sub(amount),
        )
        .filter(participant::Column::Phone.eq(phone))
        .filter(participant::Column::Balance.gte(amount))
        .exec(&txn)
        .await?;

    if debited.rows_affected == 0 {
        return Err(match get_participant_by_phone(&txn, phone).await? {
            None => Error::ParticipantNotFound {
                phone: phone.to_string(),
            },
            Some(participant) => Error::InsufficientFunds {
                current: participant.balance,
                required: amount,
            },
        });
    }

    let credited = Booth::update_many()
        .col_expr(
            booth::Column::Balance,
            Expr::col(booth::Column::Balance).add(amount),
        )
        .filter(booth::Column::Id.eq(booth_id))
        .exec(&txn)
        .await?;

    if credited.rows_affected == 0 {
        return Err(Error::BoothNotFound {
            booth_id: booth_id.to_string(),
        });
    }

    let booth = get_booth_by_id(&txn, booth_id)
        .await?
        .ok_or_else(|| Error::BoothNotFound {
            booth_id: booth_id.to_string(),
        })?;
    let participant =
        get_participant_by_phone(&txn, phone)
            .await?
            .ok_or_else(|| Error::ParticipantNotFound {
                phone: phone.to_string(),
            })?;

    let record = transaction::ActiveModel {
        participant_phone: Set(phone.to_string()),
        booth_id: Set(booth.id.clone()),
        booth_name: Set(booth.name.clone()),
        amount: Set(amount),
        note: Set(note.unwrap_or_default()),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        transaction_id = record.id,
        new_balance = participant.balance,
        booth_balance = booth.balance,
        "Transfer committed"
    );

    Ok(TransferReceipt {
        new_balance: participant.balance,
        booth_balance: booth.balance,
        booth_name: booth.name,
        transaction: record,
    })
}

/// Retrieves all transfers made by a participant, newest first.
pub async fn transactions_for_participant(
    db: &DatabaseConnection,
    phone: &str,
) -> Result<Vec<transaction::Model>> {
    crate::entities::Transaction::find()
        .filter(transaction::Column::ParticipantPhone.eq(phone))
        .order_by_desc(transaction::Column::Timestamp)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
