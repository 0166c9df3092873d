//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the participants, booths and transactions tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booth;
pub mod participant;
pub mod transaction;

// Re-export the entities under distinct names to avoid conflicts
pub use booth::Entity as Booth;
pub use participant::Entity as Participant;
pub use transaction::Entity as Transaction;
