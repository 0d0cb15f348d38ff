use log::{debug, info};
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::user::{Credentials, LoginRequest, RegisterRequest, Registration, UserResponse},
        db::User,
    },
    store::{Insertion, Storage},
};

use super::{body, JsonBody};

const EMAIL_TAKEN: &str = "Email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn routes() -> Vec<Route> {
    routes![register, login]
}

#[post("/user", data = "<request>")]
async fn register(
    request: JsonBody<'_, RegisterRequest>,
    store: &State<Storage>,
) -> Result<(Status, Json<UserResponse>)> {
    let registration = Registration::try_from(body(request)?)?;

    // Check email uniqueness.
    if store.user_by_email(&registration.email).await?.is_some() {
        debug!("Registration refused, email in use: {}", registration.email);
        return Err(Error::conflict(EMAIL_TAKEN));
    }

    // Create and insert the user. The unique email index catches any
    // registration that raced us past the check above.
    let user = User::new(registration)?;
    if store.insert_user(&user).await? == Insertion::Duplicate {
        debug!("Registration lost a race for email {}", user.email);
        return Err(Error::conflict(EMAIL_TAKEN));
    }
    info!("Registered user {}", user.id);

    Ok((Status::Created, Json(user.into())))
}

#[post("/login", data = "<request>")]
async fn login(
    request: JsonBody<'_, LoginRequest>,
    store: &State<Storage>,
) -> Result<Json<UserResponse>> {
    let credentials = Credentials::try_from(body(request)?)?;

    // Unknown email, missing hash and wrong password are indistinguishable
    // to the client.
    let user = store
        .user_by_email(&credentials.email)
        .await?
        .filter(|user| user.verify_password(&credentials.password))
        .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::ContentType,
        local::asynchronous::{Client, LocalResponse},
        serde::json::{json, Value},
    };

    use crate::{
        error::ErrorBody,
        model::mongodb::Id,
        store::{MemoryStore, StaleReads, Store},
    };

    use super::*;

    async fn post<'c>(client: &'c Client, uri: &'static str, body: Value) -> LocalResponse<'c> {
        client
            .post(uri)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn register_creates_user(client: Client, store: MemoryStore) {
        let response = post(
            &client,
            "/user",
            json!({"pseudo": "alice", "email": "a@x.com", "password": "pw123456"}),
        )
        .await;

        assert_eq!(Status::Created, response.status());
        let raw = response.into_string().await.unwrap();
        assert!(!raw.contains("password"));

        let created = rocket::serde::json::from_str::<UserResponse>(&raw).unwrap();
        assert_eq!(created.status, "success");
        assert_eq!(created.user.id.as_str().len(), 36);
        assert_eq!(created.user.pseudo, "alice");
        assert_eq!(created.user.email, "a@x.com");

        // The stored record carries a hash, not the password.
        let stored = store.user(&created.user.id).await.unwrap().unwrap();
        assert!(stored.verify_password("pw123456"));
        assert_ne!(stored.password_hash.as_deref(), Some("pw123456"));
    }

    #[backend_test]
    async fn register_same_email_twice(client: Client, store: MemoryStore) {
        let first = post(
            &client,
            "/user",
            json!({"pseudo": "alice", "email": "a@x.com", "password": "pw123456"}),
        )
        .await;
        assert_eq!(Status::Created, first.status());

        let second = post(
            &client,
            "/user",
            json!({"pseudo": "alice2", "email": "a@x.com", "password": "other"}),
        )
        .await;
        assert_eq!(Status::Conflict, second.status());
        assert_eq!(
            Some(ErrorBody::new(EMAIL_TAKEN)),
            second.into_json::<ErrorBody>().await
        );

        assert_eq!(1, store.user_count());
    }

    #[rocket::async_test]
    async fn register_race_on_email() {
        // The email is already taken, but the lookup cannot see it yet.
        let store = MemoryStore::default();
        store.insert_user(&User::example()).await.unwrap();
        let client = Client::tracked(crate::rocket_for_store(Box::new(StaleReads(store.clone()))))
            .await
            .unwrap();

        let response = post(&client, "/user", json!(RegisterRequest::example())).await;

        assert_eq!(Status::Conflict, response.status());
        assert_eq!(
            Some(ErrorBody::new(EMAIL_TAKEN)),
            response.into_json::<ErrorBody>().await
        );
        assert_eq!(1, store.user_count());
    }

    #[backend_test]
    async fn register_missing_fields(client: Client, store: MemoryStore) {
        let bodies = [
            json!({"email": "a@x.com", "password": "pw123456"}),
            json!({"pseudo": "alice", "password": "pw123456"}),
            json!({"pseudo": "alice", "email": "a@x.com"}),
            json!({"pseudo": "", "email": "a@x.com", "password": "pw123456"}),
            json!({"pseudo": "alice", "email": "   ", "password": "pw123456"}),
            json!({"pseudo": "alice", "email": "a@x.com", "password": null}),
            json!({"pseudo": " "}),
        ];
        for body in bodies {
            let response = post(&client, "/user", body).await;
            assert_eq!(Status::BadRequest, response.status());
            assert_eq!(
                Some(ErrorBody::new("Pseudo, email and password are required")),
                response.into_json::<ErrorBody>().await
            );
        }

        assert_eq!(0, store.user_count());
    }

    #[backend_test]
    async fn register_malformed_body(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body("{not json")
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some(ErrorBody::new("Invalid request body")),
            response.into_json::<ErrorBody>().await
        );

        let response = client.post(uri!(register)).dispatch().await;
        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some(ErrorBody::new("Request body is required")),
            response.into_json::<ErrorBody>().await
        );
    }

    #[backend_test(user)]
    async fn login_valid(client: Client, store: MemoryStore) {
        let response = post(&client, "/login", json!(LoginRequest::example())).await;

        assert_eq!(Status::Ok, response.status());
        let logged_in = response.into_json::<UserResponse>().await.unwrap();
        let expected = store.user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(logged_in, UserResponse::from(expected));
    }

    #[backend_test(user)]
    async fn login_invalid(client: Client) {
        // Wrong password.
        let wrong_password = post(
            &client,
            "/login",
            json!({"email": "a@x.com", "password": "pw1234567"}),
        )
        .await;
        assert_eq!(Status::Unauthorized, wrong_password.status());
        let wrong_password = wrong_password.into_json::<ErrorBody>().await;

        // Unknown email.
        let unknown_email = post(
            &client,
            "/login",
            json!({"email": "nobody@x.com", "password": "pw123456"}),
        )
        .await;
        assert_eq!(Status::Unauthorized, unknown_email.status());
        let unknown_email = unknown_email.into_json::<ErrorBody>().await;

        // Both failures look exactly the same.
        assert_eq!(Some(ErrorBody::new(INVALID_CREDENTIALS)), wrong_password);
        assert_eq!(wrong_password, unknown_email);
    }

    #[backend_test]
    async fn login_without_stored_hash(client: Client, store: MemoryStore) {
        let legacy = User {
            id: Id::new(),
            password_hash: None,
            ..User::example()
        };
        store.insert_user(&legacy).await.unwrap();

        let response = post(&client, "/login", json!(LoginRequest::example())).await;

        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(
            Some(ErrorBody::new(INVALID_CREDENTIALS)),
            response.into_json::<ErrorBody>().await
        );
    }

    #[backend_test]
    async fn login_missing_fields(client: Client) {
        for body in [
            json!({"email": "a@x.com"}),
            json!({"password": "pw123456"}),
            json!({"email": " ", "password": "pw123456"}),
        ] {
            let response = post(&client, "/login", body).await;
            assert_eq!(Status::BadRequest, response.status());
            assert_eq!(
                Some(ErrorBody::new("Email and password are required")),
                response.into_json::<ErrorBody>().await
            );
        }
    }

    #[backend_test]
    async fn register_then_login(client: Client) {
        let registered = post(
            &client,
            "/user",
            json!({"pseudo": "bob", "email": "b@x.com", "password": "hunter22"}),
        )
        .await
        .into_json::<UserResponse>()
        .await
        .unwrap();

        let response = post(
            &client,
            "/login",
            json!({"email": "b@x.com", "password": "hunter22"}),
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(registered), response.into_json::<UserResponse>().await);
    }
}
