//! Persistence for users and votes.
//!
//! Handlers only ever see a [`Storage`], so the same request logic runs
//! against MongoDB in production and against [`MemoryStore`] in tests.

mod memory;
mod mongo;

pub use memory::MemoryStore;
#[cfg(test)]
pub use memory::StaleReads;
pub use mongo::MongoStore;

use crate::{
    error::Result,
    model::{
        db::{User, Vote},
        mongodb::Id,
    },
};

/// What happened to an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// A record with the same unique key already exists; nothing was written.
    Duplicate,
}

#[rocket::async_trait]
pub trait Store: Send + Sync {
    /// Point read of a user by ID.
    async fn user(&self, id: &Id) -> Result<Option<User>>;

    /// Find the user registered with exactly this email.
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fetch every user among `ids` that exists, in no particular order.
    async fn users(&self, ids: &[Id]) -> Result<Vec<User>>;

    /// Insert a user unless one with the same email exists.
    async fn insert_user(&self, user: &User) -> Result<Insertion>;

    /// Find the vote cast by the given user, if any.
    async fn vote_by_user(&self, user_id: &Id) -> Result<Option<Vote>>;

    /// Insert a vote unless its user has already voted.
    async fn insert_vote(&self, vote: &Vote) -> Result<Insertion>;

    /// Every vote, newest first.
    async fn votes(&self) -> Result<Vec<Vote>>;
}

/// The store placed in managed state.
pub type Storage = Box<dyn Store>;
