//! Request logging.
//!
//! Every request gets a [`RequestId`], cached on the request so that the
//! error responder can tag its own log lines with the same number.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    Data, Orbit, Request, Response, Rocket,
};

use crate::Config;

/// A unique identifier for a particular request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID, wrapping back to zero past `usize::MAX`.
    pub fn next() -> RequestId {
        static NEXT_REQUEST: AtomicUsize = AtomicUsize::new(0);
        RequestId(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed))
    }
}

/// When the request reached us.
#[derive(Debug, Copy, Clone)]
struct Received(Instant);

impl Received {
    fn now() -> Self {
        Self(Instant::now())
    }
}

/// Format a duration as whole milliseconds, or sub-millisecond precision when
/// it is shorter than that.
fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_millis(1) {
        format!("{}µs", elapsed.as_micros())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

/// Describe what answered a request: the route that handled it, or the
/// catcher when no route did.
fn handler_name(req: &Request<'_>) -> String {
    match req.route() {
        Some(route) => match route.name {
            Some(ref name) => format!("{name} ({})", route.uri),
            None => route.uri.to_string(),
        },
        None => "catcher".to_string(),
    }
}

/// A rocket fairing logging launch, shutdown, and every request and response.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        let protocol = if config.tls_enabled() { "https" } else { "http" };
        info!(
            "BayrouMeter listening on {protocol}://{}:{}",
            config.address, config.port
        );
        if let Some(app_config) = rocket.state::<Config>() {
            info!("Allowing cross-origin requests from {}", app_config.cors_origin());
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let id = req.local_cache(RequestId::next);
        req.local_cache(Received::now);
        let client = req
            .client_ip()
            .map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
        info!("->req{id} {} {} from {client}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = req.local_cache(RequestId::next);
        let elapsed = format_elapsed(req.local_cache(Received::now).0.elapsed());
        let status = res.status();
        let msg = format!("<-rsp{id} {status} {} in {elapsed}", handler_name(req));
        match status.class() {
            StatusClass::ServerError => error!("{msg}"),
            StatusClass::ClientError => warn!("{msg}"),
            _ => info!("{msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, draining requests...");
    }
}
