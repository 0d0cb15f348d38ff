use rocket::{serde::json::Json, Route, State};

use crate::{error::Result, model::api::results::VoteResults, store::Storage};

pub fn routes() -> Vec<Route> {
    routes![list_votes]
}

#[get("/votes")]
async fn list_votes(store: &State<Storage>) -> Result<Json<VoteResults>> {
    let votes = store.votes().await?;

    // Fetch all the voters in one go.
    let mut user_ids = votes.iter().map(|v| v.user_id.clone()).collect::<Vec<_>>();
    user_ids.sort();
    user_ids.dedup();
    let users = store.users(&user_ids).await?;

    Ok(Json(VoteResults::compile(votes, users)))
}
