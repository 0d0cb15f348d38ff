use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::Result,
    model::{
        db::{User, Vote},
        mongodb::Id,
    },
};

use super::{Insertion, Store};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Id, User>,
    votes: Vec<Vote>,
}

/// In-process storage with the same uniqueness rules as [`super::MongoStore`].
///
/// Clones share the same underlying tables, so a test can keep a handle on
/// the store it gave to the server.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        // Every operation leaves the tables consistent, so a panic elsewhere
        // while holding the lock does not invalidate them.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove a user out-of-band, leaving any vote they cast in place.
    pub fn remove_user(&self, id: &Id) -> Option<User> {
        self.tables().users.remove(id)
    }

    /// Number of users stored.
    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    /// Number of votes stored.
    pub fn vote_count(&self) -> usize {
        self.tables().votes.len()
    }
}

#[rocket::async_trait]
impl Store for MemoryStore {
    async fn user(&self, id: &Id) -> Result<Option<User>> {
        Ok(self.tables().users.get(id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn users(&self, ids: &[Id]) -> Result<Vec<User>> {
        let tables = self.tables();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn insert_user(&self, user: &User) -> Result<Insertion> {
        let mut tables = self.tables();
        let taken = tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.email == user.email);
        if taken {
            return Ok(Insertion::Duplicate);
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(Insertion::Inserted)
    }

    async fn vote_by_user(&self, user_id: &Id) -> Result<Option<Vote>> {
        let tables = self.tables();
        Ok(tables.votes.iter().find(|v| &v.user_id == user_id).cloned())
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<Insertion> {
        let mut tables = self.tables();
        let taken = tables
            .votes
            .iter()
            .any(|v| v.id == vote.id || v.user_id == vote.user_id);
        if taken {
            return Ok(Insertion::Duplicate);
        }
        tables.votes.push(vote.clone());
        Ok(Insertion::Inserted)
    }

    async fn votes(&self) -> Result<Vec<Vote>> {
        let mut votes = self.tables().votes.clone();
        votes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(votes)
    }
}

/// A [`MemoryStore`] whose duplicate lookups always miss, as if a concurrent
/// request had written between our check and our insert. Only the inserts
/// see existing records.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaleReads(pub MemoryStore);

#[cfg(test)]
#[rocket::async_trait]
impl Store for StaleReads {
    async fn user(&self, id: &Id) -> Result<Option<User>> {
        self.0.user(id).await
    }

    async fn user_by_email(&self, _email: &str) -> Result<Option<User>> {
        Ok(None)
    }

    async fn users(&self, ids: &[Id]) -> Result<Vec<User>> {
        self.0.users(ids).await
    }

    async fn insert_user(&self, user: &User) -> Result<Insertion> {
        self.0.insert_user(user).await
    }

    async fn vote_by_user(&self, _user_id: &Id) -> Result<Option<Vote>> {
        Ok(None)
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<Insertion> {
        self.0.insert_vote(vote).await
    }

    async fn votes(&self) -> Result<Vec<Vote>> {
        self.0.votes().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::model::common::Choice;

    use super::*;

    #[rocket::async_test]
    async fn users_are_unique_by_email() {
        let store = MemoryStore::default();
        let alice = User::example();
        assert_eq!(store.insert_user(&alice).await.unwrap(), Insertion::Inserted);

        let impostor = User {
            id: Id::new(),
            pseudo: "not alice".to_string(),
            ..alice.clone()
        };
        assert_eq!(
            store.insert_user(&impostor).await.unwrap(),
            Insertion::Duplicate
        );
        assert_eq!(store.user_count(), 1);
        assert_eq!(
            store.user_by_email("a@x.com").await.unwrap().unwrap().pseudo,
            "alice"
        );
        assert_eq!(store.user(&alice.id).await.unwrap(), Some(alice));
    }

    #[rocket::async_test]
    async fn one_vote_per_user() {
        let store = MemoryStore::default();
        let user_id = Id::new();
        let first = Vote::new(user_id.clone(), Choice::Oui);
        let second = Vote::new(user_id.clone(), Choice::Non);

        assert_eq!(store.insert_vote(&first).await.unwrap(), Insertion::Inserted);
        assert_eq!(store.insert_vote(&second).await.unwrap(), Insertion::Duplicate);
        assert_eq!(store.vote_count(), 1);
        assert_eq!(store.vote_by_user(&user_id).await.unwrap(), Some(first));
    }

    #[rocket::async_test]
    async fn votes_newest_first() {
        let store = MemoryStore::default();
        let now = Utc::now();
        for (age, choice) in [(2, Choice::Oui), (0, Choice::Non), (1, Choice::Oui)] {
            let mut vote = Vote::new(Id::new(), choice);
            vote.created_at = now - Duration::minutes(age);
            store.insert_vote(&vote).await.unwrap();
        }

        let votes = store.votes().await.unwrap();
        let times = votes.iter().map(|v| v.created_at).collect::<Vec<_>>();
        assert_eq!(
            times,
            vec![
                now,
                now - Duration::minutes(1),
                now - Duration::minutes(2)
            ]
        );
    }

    #[rocket::async_test]
    async fn batch_lookup_skips_missing() {
        let store = MemoryStore::default();
        let alice = User::example();
        let bob = User::example2();
        store.insert_user(&alice).await.unwrap();
        store.insert_user(&bob).await.unwrap();

        let found = store
            .users(&[alice.id.clone(), Id::from("nobody")])
            .await
            .unwrap();
        assert_eq!(found, vec![alice.clone()]);
        assert_eq!(store.users(&[]).await.unwrap(), vec![]);

        assert_eq!(store.remove_user(&alice.id), Some(alice));
        assert_eq!(store.user_count(), 1);
    }
}
