//! Cross-origin headers for the browser frontend.

use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Status},
    Request, Response, Route,
};

use crate::Config;

pub fn routes() -> Vec<Route> {
    routes![preflight]
}

/// Answer any CORS preflight request; the headers are added by [`CorsFairing`].
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}

/// A fairing that stamps the CORS headers onto every response.
#[derive(Debug, Copy, Clone)]
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let origin = req
            .rocket()
            .state::<Config>()
            .map(|config| config.cors_origin().to_string())
            .unwrap_or_else(|| Config::default().cors_origin().to_string());
        res.set_header(Header::new("Access-Control-Allow-Origin", origin));
        res.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        res.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

#[cfg(test)]
mod tests {
    use rocket::local::asynchronous::Client;

    use super::*;

    #[backend_test]
    async fn preflight_is_answered(client: Client) {
        let response = client.options("/vote").dispatch().await;

        assert_eq!(Status::NoContent, response.status());
        assert_eq!(
            Some("*"),
            response.headers().get_one("Access-Control-Allow-Origin")
        );
        assert_eq!(
            Some("Content-Type"),
            response.headers().get_one("Access-Control-Allow-Headers")
        );
    }

    #[backend_test]
    async fn headers_on_regular_responses(client: Client) {
        let response = client.get("/votes").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            Some("GET, POST, OPTIONS"),
            response.headers().get_one("Access-Control-Allow-Methods")
        );
    }
}
