use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The answer to the poll question.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Oui,
    Non,
}

impl Choice {
    pub const ALL: [Choice; 2] = [Choice::Oui, Choice::Non];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Oui => "oui",
            Choice::Non => "non",
        }
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Choice must be 'oui' or 'non'")]
pub struct InvalidChoice;

/// Parsing is case-insensitive. Surrounding whitespace is not accepted.
impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        Choice::ALL
            .into_iter()
            .find(|choice| choice.as_str() == normalized)
            .ok_or(InvalidChoice)
    }
}
