//! Roster provisioning - inserts participants and booths missing from the store.

use crate::{
    config::roster::Roster,
    core::{booth, participant},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

/// Counts of rows created by [`provision_roster`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Participants inserted
    pub participants_created: usize,
    /// Booths inserted
    pub booths_created: usize,
}

/// Inserts every roster entry whose key is not already present.
///
/// Existing participants and booths are left untouched, so re-running with the
/// same roster never resets balances or activation state.
#[instrument(skip_all)]
pub async fn provision_roster(db: &DatabaseConnection, roster: &Roster) -> Result<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for entry in &roster.participants {
        if participant::provision_participant(db, &entry.phone, entry.balance).await? {
            report.participants_created += 1;
        } else {
            debug!(phone = %entry.phone, "Participant already provisioned");
        }
    }

    for entry in &roster.booths {
        if booth::provision_booth(db, &entry.id, &entry.name).await? {
            report.booths_created += 1;
        } else {
            debug!(booth_id = %entry.id, "Booth already provisioned");
        }
    }

    info!(
        participants = report.participants_created,
        booths = report.booths_created,
        "Roster provisioned"
    );
    Ok(report)
}
