use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{api::user::Registration, mongodb::Id, password},
};

/// A user account, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,
    pub pseudo: String,
    pub email: String,
    /// Argon2 encoded hash. Older records may lack one, in which case the
    /// account cannot be logged into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID, hashing the password.
    pub fn new(registration: Registration) -> Result<Self> {
        let password_hash = password::hash(&registration.password)?;
        Ok(Self {
            id: Id::new(),
            pseudo: registration.pseudo,
            email: registration.email,
            password_hash: Some(password_hash),
            created_at: Utc::now(),
        })
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        self.password_hash
            .as_deref()
            .map_or(false, |hash| password::verify(password, hash))
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl User {
        pub fn example() -> Self {
            Self::new(Registration::example()).unwrap()
        }

        pub fn example2() -> Self {
            Self::new(Registration::example2()).unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{self, Bson};

    use super::*;

    #[test]
    fn verify_password() {
        let user = User::example();
        assert!(user.verify_password(Registration::example().password));
        assert!(!user.verify_password("wrong"));
    }

    #[test]
    fn no_hash_never_verifies() {
        let user = User {
            password_hash: None,
            ..User::example()
        };
        assert!(!user.verify_password(""));
        assert!(!user.verify_password(Registration::example().password));
    }

    #[test]
    fn bson_layout() {
        let user = User::example();
        let doc = bson::to_document(&user).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), user.id.as_str());
        assert_eq!(doc.get_str("email").unwrap(), "a@x.com");
        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));

        let mut legacy = doc.clone();
        legacy.remove("password_hash");
        let read: User = bson::from_document(legacy).unwrap();
        assert_eq!(read.password_hash, None);
    }
}
