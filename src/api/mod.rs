use log::debug;
use rocket::{
    http::Status,
    serde::json::{self, Json},
    Catcher, Request, Route,
};

use crate::error::{Error, ErrorBody, Result, INTERNAL_ERROR_MESSAGE};

mod results;
mod user;
mod vote;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(user::routes());
    routes.extend(vote::routes());
    routes.extend(results::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![not_found, default_catcher]
}

/// A JSON request body, or the reason it could not be parsed.
///
/// Taking the parse failure ourselves, rather than letting Rocket forward it
/// to a catcher, lets us answer with our own 400 message.
type JsonBody<'r, T> = std::result::Result<Json<T>, json::Error<'r>>;

const BODY_REQUIRED: &str = "Request body is required";

/// Unwrap a request body, rejecting anything that is not valid JSON.
///
/// A body that carries none of the expected fields, such as `{}`, counts as
/// no body at all.
fn body<T: Default + PartialEq>(data: JsonBody<'_, T>) -> Result<T> {
    match data {
        Ok(Json(inner)) if inner == T::default() => Err(Error::bad_request(BODY_REQUIRED)),
        Ok(Json(inner)) => Ok(inner),
        Err(json::Error::Parse(raw, _)) if raw.trim().is_empty() => {
            Err(Error::bad_request(BODY_REQUIRED))
        }
        Err(e) => {
            debug!("Unreadable request body: {e}");
            Err(Error::bad_request("Invalid request body"))
        }
    }
}

#[catch(404)]
fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new("Not found"))
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let message = if status == Status::InternalServerError {
        INTERNAL_ERROR_MESSAGE
    } else {
        status.reason().unwrap_or("Unknown error")
    };
    (status, Json(ErrorBody::new(message)))
}
