#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use cors::CorsFairing;
use logging::LoggerFairing;
use store::Storage;

/// Build the production server: configuration and the MongoDB-backed store
/// are loaded by fairings at ignition.
pub fn build() -> Rocket<Build> {
    base_rocket().attach(DatabaseFairing)
}

/// Build a server over an already-constructed store.
///
/// This skips the database fairing entirely, so no `db_uri` is needed.
pub fn rocket_for_store(store: Storage) -> Rocket<Build> {
    base_rocket().manage(store)
}

/// Everything except storage.
fn base_rocket() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .mount("/", cors::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
        .attach(CorsFairing)
}
