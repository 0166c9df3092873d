//! Event roster loading from a TOML file.
//!
//! Participants and booths are provisioned before the event. The roster file lists
//! them so the service can insert any that are missing at startup. Existing rows are
//! never modified by provisioning.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Contents of a roster file
#[derive(Debug, Default, Deserialize)]
pub struct Roster {
    /// Participants to provision
    #[serde(default)]
    pub participants: Vec<ParticipantEntry>,
    /// Booths to provision
    #[serde(default)]
    pub booths: Vec<BoothEntry>,
}

/// A participant row as listed in the roster
#[derive(Debug, Deserialize, Clone)]
pub struct ParticipantEntry {
    /// Phone number (11 digits)
    pub phone: String,
    /// Starting balance
    #[serde(default)]
    pub balance: i64,
}

/// A booth row as listed in the roster
#[derive(Debug, Deserialize, Clone)]
pub struct BoothEntry {
    /// Booth identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// Parses a roster from TOML text.
pub fn parse_roster(contents: &str) -> Result<Roster> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse roster: {e}"),
    })
}

/// Loads a roster from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let path_ref = path.as_ref();
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read roster file {}: {e}", path_ref.display()),
    })?;
    parse_roster(&contents)
}
