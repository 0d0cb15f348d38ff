//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - IDs are stored as the document `_id`.
//! - Datetimes are serialised in MongoDB's own format.

mod user;
pub use user::User;

mod vote;
pub use vote::Vote;
