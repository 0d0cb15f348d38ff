use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{db::User, mongodb::Id},
};

use super::{non_blank, present, SUCCESS};

/// Body of `POST /user`, as received. Every field is optional here so that
/// missing fields are reported with our own message.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub pseudo: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A validated registration. The password is still in plaintext and must
/// never be stored directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub pseudo: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(req: RegisterRequest) -> Result<Self> {
        let password = present(req.password);
        match (non_blank(req.pseudo), non_blank(req.email), password) {
            (Some(pseudo), Some(email), Some(password)) => Ok(Self {
                pseudo,
                email,
                password,
            }),
            _ => Err(Error::bad_request("Pseudo, email and password are required")),
        }
    }
}

/// Body of `POST /login`, as received.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = Error;

    fn try_from(req: LoginRequest) -> Result<Self> {
        let password = present(req.password);
        match (non_blank(req.email), password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(Error::bad_request("Email and password are required")),
        }
    }
}

/// The publicly visible part of a user. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Id,
    pub pseudo: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            pseudo: user.pseudo,
            email: user.email,
        }
    }
}

/// Response of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub status: String,
    pub user: PublicUser,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            status: SUCCESS.to_string(),
            user: user.into(),
        }
    }
}
