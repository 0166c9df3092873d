//! Core business logic - framework-agnostic ledger operations.
//!
//! Nothing in here knows about HTTP. Operations take a database connection (and a
//! [`session::SessionIssuer`] where credentials are minted) and return
//! [`crate::errors::Result`].

/// Booth listing, lookup and provisioning
pub mod booth;
/// Participant activation, balance lookup and provisioning
pub mod participant;
/// One-way password hashing
pub mod password;
/// Roster provisioning at startup
pub mod roster;
/// Signed session tokens
pub mod session;
/// Points transfer between participants and booths
pub mod transfer;
