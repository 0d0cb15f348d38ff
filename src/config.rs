use log::{error, info};
use mongodb::{
    options::{ClientOptions, Credential},
    Client as MongoClient,
};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::store::{MongoStore, Storage};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint or fairing.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_cors_origin")]
    cors_origin: String,
}

impl Config {
    /// Value of the `Access-Control-Allow-Origin` header.
    pub fn cors_origin(&self) -> &str {
        &self.cors_origin
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
pub struct DbConfig {
    // non-secrets
    #[serde(default = "default_db_name")]
    pub db_name: String,
    pub db_username: Option<String>,
    // secrets
    pub db_uri: String,
    pub db_password: Option<String>,
}

impl DbConfig {
    /// Build client options from the URI, layering the explicit credential
    /// on top if one was configured.
    pub async fn client_options(&self) -> Result<ClientOptions, mongodb::error::Error> {
        let mut options = ClientOptions::parse(&self.db_uri).await?;
        options.app_name = Some("bayroumeter".to_string());
        if let Some(ref username) = self.db_username {
            options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(self.db_password.clone())
                    .build(),
            );
        }
        Ok(options)
    }
}

fn default_db_name() -> String {
    "bayroumeter".to_string()
}

/// A fairing that loads the MongoDB config, connects to the database,
/// ensures the collections' unique indexes exist, and places the resulting
/// [`Storage`] into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");

        // Construct the connection.
        let client = match config.client_options().await.and_then(MongoClient::with_options) {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&config.db_name);

        // Ensure the required indexes exist.
        let store = match MongoStore::open(&db).await {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to prepare database: {e}");
                return Err(rocket);
            }
        };
        info!("...database connection online!");

        // Manage the state.
        let storage: Storage = Box::new(store);
        rocket = rocket.manage(storage);
        Ok(rocket)
    }
}
