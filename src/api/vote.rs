use log::{debug, info};
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::vote::{VoteRequest, VoteResponse, VoteSpec},
        db::Vote,
    },
    store::{Insertion, Storage},
};

use super::{body, JsonBody};

const ALREADY_VOTED: &str = "User has already voted";

pub fn routes() -> Vec<Route> {
    routes![submit_vote]
}

#[post("/vote", data = "<request>")]
async fn submit_vote(
    request: JsonBody<'_, VoteRequest>,
    store: &State<Storage>,
) -> Result<(Status, Json<VoteResponse>)> {
    let spec = VoteSpec::try_from(body(request)?)?;

    // Ensure the voter exists.
    if store.user(&spec.user_id).await?.is_none() {
        return Err(Error::not_found("User not found"));
    }

    // Check that the user has not already voted.
    if store.vote_by_user(&spec.user_id).await?.is_some() {
        debug!("User {} tried to vote twice", spec.user_id);
        return Err(Error::conflict(ALREADY_VOTED));
    }

    // Record the vote. One vote per user is enforced again on insert, which
    // settles concurrent submissions.
    let vote = Vote::new(spec.user_id, spec.choice);
    if store.insert_vote(&vote).await? == Insertion::Duplicate {
        debug!("User {} lost a race to vote", vote.user_id);
        return Err(Error::conflict(ALREADY_VOTED));
    }
    info!("Recorded vote {} for user {}", vote.id, vote.user_id);

    Ok((Status::Created, Json(vote.into())))
}
