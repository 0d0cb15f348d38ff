use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{common::Choice, db::Vote, mongodb::Id},
};

use super::{present, SUCCESS};

/// Body of `POST /vote`, as received.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub user_id: Option<String>,
    pub choice: Option<String>,
}

/// A validated vote that the user wishes to cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSpec {
    pub user_id: Id,
    pub choice: Choice,
}

impl TryFrom<VoteRequest> for VoteSpec {
    type Error = Error;

    fn try_from(req: VoteRequest) -> Result<Self> {
        let (user_id, choice) = match (present(req.user_id), present(req.choice)) {
            (Some(user_id), Some(choice)) => (user_id, choice),
            _ => return Err(Error::bad_request("Both user_id and choice are required")),
        };
        let choice = choice
            .parse::<Choice>()
            .map_err(|e| Error::bad_request(e.to_string()))?;
        Ok(Self {
            user_id: user_id.into(),
            choice,
        })
    }
}

/// The public view of a freshly recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub id: Id,
    pub user_id: Id,
    pub choice: Choice,
    pub question: String,
}

impl From<Vote> for VoteReceipt {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id,
            user_id: vote.user_id,
            choice: vote.choice,
            question: vote.question,
        }
    }
}

/// Response of a successful vote submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub status: String,
    pub vote: VoteReceipt,
}

impl From<Vote> for VoteResponse {
    fn from(vote: Vote) -> Self {
        Self {
            status: SUCCESS.to_string(),
            vote: vote.into(),
        }
    }
}
