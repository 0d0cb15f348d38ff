use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{Choice, DELETED_USER_PSEUDO, QUESTION},
    db::{User, Vote},
    mongodb::Id,
};

/// Who cast a vote, as shown in the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: Id,
    pub pseudo: String,
}

/// A single vote joined with its voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteView {
    pub id: Id,
    pub user: Voter,
    pub choice: Choice,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

impl VoteView {
    /// Join a vote with its voter. A voter that no longer exists is shown
    /// under a placeholder pseudo rather than dropping the vote.
    pub fn new(vote: Vote, user: Option<&User>) -> Self {
        let pseudo = user
            .map(|user| user.pseudo.clone())
            .unwrap_or_else(|| DELETED_USER_PSEUDO.to_string());
        Self {
            id: vote.id,
            user: Voter {
                id: vote.user_id,
                pseudo,
            },
            choice: vote.choice,
            question: vote.question,
            created_at: vote.created_at,
        }
    }
}

/// Running tally of the poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteStats {
    pub oui: u64,
    pub non: u64,
    pub total: u64,
    pub oui_percentage: f64,
    pub non_percentage: f64,
}

impl VoteStats {
    /// Count the given choices. Percentages are rounded to one decimal
    /// place and are both zero when nothing has been counted.
    pub fn tally(choices: impl IntoIterator<Item = Choice>) -> Self {
        let (mut oui, mut non) = (0, 0);
        for choice in choices {
            match choice {
                Choice::Oui => oui += 1,
                Choice::Non => non += 1,
            }
        }
        let total = oui + non;
        Self {
            oui,
            non,
            total,
            oui_percentage: percentage(oui, total),
            non_percentage: percentage(non, total),
        }
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let exact = count as f64 / total as f64 * 100.0;
    (exact * 10.0).round() / 10.0
}

/// Body of `GET /votes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResults {
    pub votes: Vec<VoteView>,
    pub stats: VoteStats,
    pub question: String,
}

impl VoteResults {
    /// Join the votes, in the order given, with whichever of their voters
    /// could be found.
    pub fn compile(votes: Vec<Vote>, users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect::<HashMap<_, _>>();
        let votes = votes
            .into_iter()
            .map(|vote| {
                let user = users.get(&vote.user_id);
                VoteView::new(vote, user)
            })
            .collect::<Vec<_>>();
        let stats = VoteStats::tally(votes.iter().map(|vote| vote.choice));
        Self {
            votes,
            stats,
            question: QUESTION.to_string(),
        }
    }
}
