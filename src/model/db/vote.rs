use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{Choice, QUESTION},
    mongodb::Id,
};

/// A recorded vote, as stored in the database. Votes are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    pub user_id: Id,
    pub choice: Choice,
    pub question: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// A new vote on the poll question, timestamped now.
    pub fn new(user_id: Id, choice: Choice) -> Self {
        Self {
            id: Id::new(),
            user_id,
            choice,
            question: QUESTION.to_string(),
            created_at: Utc::now(),
        }
    }
}
