use log::debug;
use mongodb::{
    bson::{doc, Bson},
    error::Error as DbError,
    options::FindOptions,
    Database,
};
use rocket::futures::TryStreamExt;

use crate::{
    error::Result,
    model::{
        db::{User, Vote},
        mongodb::{ensure_indexes_exist, is_duplicate_key_error, Coll, Id},
    },
};

use super::{Insertion, Store};

/// MongoDB-backed storage. Uniqueness of emails and of one vote per user is
/// enforced by the indexes created in [`MongoStore::open`].
#[derive(Clone)]
pub struct MongoStore {
    users: Coll<User>,
    votes: Coll<Vote>,
}

impl MongoStore {
    /// Get handles on the collections, provisioning them and their indexes
    /// if needed.
    pub async fn open(db: &Database) -> std::result::Result<Self, DbError> {
        ensure_indexes_exist(db).await?;
        Ok(Self {
            users: Coll::from_db(db),
            votes: Coll::from_db(db),
        })
    }
}

/// Map a write result onto an [`Insertion`], treating a unique index
/// violation as an expected outcome rather than an error.
fn insertion<T>(result: std::result::Result<T, DbError>) -> Result<Insertion> {
    match result {
        Ok(_) => Ok(Insertion::Inserted),
        Err(err) if is_duplicate_key_error(&err) => {
            debug!("Duplicate key on insert: {err}");
            Ok(Insertion::Duplicate)
        }
        Err(err) => Err(err.into()),
    }
}

#[rocket::async_trait]
impl Store for MongoStore {
    async fn user(&self, id: &Id) -> Result<Option<User>> {
        Ok(self.users.find_one(id.as_doc(), None).await?)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let with_email = doc! {
            "email": email,
        };
        Ok(self.users.find_one(with_email, None).await?)
    }

    async fn users(&self, ids: &[Id]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.iter().cloned().map(Bson::from).collect::<Vec<_>>();
        let filter = doc! {
            "_id": { "$in": ids },
        };
        let users: Vec<User> = self.users.find(filter, None).await?.try_collect().await?;
        Ok(users)
    }

    async fn insert_user(&self, user: &User) -> Result<Insertion> {
        insertion(self.users.insert_one(user, None).await)
    }

    async fn vote_by_user(&self, user_id: &Id) -> Result<Option<Vote>> {
        let by_user = doc! {
            "user_id": user_id.as_str(),
        };
        Ok(self.votes.find_one(by_user, None).await?)
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<Insertion> {
        insertion(self.votes.insert_one(vote, None).await)
    }

    async fn votes(&self) -> Result<Vec<Vote>> {
        let newest_first = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let votes: Vec<Vote> = self
            .votes
            .find(None, newest_first)
            .await?
            .try_collect()
            .await?;
        Ok(votes)
    }
}
