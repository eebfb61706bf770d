//! Lookup handler.
//!
//! Turns one [`Invocation`] into one [`HandlerResponse`]. Warmup pings are
//! answered without touching the database; every other invocation resolves a
//! target address, queries it, and answers with the record or a generic error.

mod invocation;
mod response;

use std::net::IpAddr;
use std::sync::Arc;

use crate::error_handling::LookupError;
use crate::geoip::GeoIpLookup;

pub use invocation::{HttpContext, HttpInvocation, Invocation, InvocationEnvelope, RequestContext};
pub use response::HandlerResponse;

/// Answers invocations against a shared, read-only database.
#[derive(Clone)]
pub struct LookupHandler {
    database: Arc<dyn GeoIpLookup>,
}

impl LookupHandler {
    /// Creates a handler over `database`.
    pub fn new(database: Arc<dyn GeoIpLookup>) -> Self {
        Self { database }
    }

    /// Handles a single invocation. Never fails: lookup errors are logged in
    /// full and reported to the caller as a 500 with the generic message.
    pub fn handle(&self, invocation: &Invocation) -> HandlerResponse {
        log::debug!("Invocation received: {:?}", invocation);

        match invocation {
            Invocation::Warmup => {
                log::info!("Warmup call received");
                HandlerResponse::warmup()
            }
            Invocation::Http(request) => match self.lookup(request) {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Error occurred: {}", e);
                    HandlerResponse::lookup_failed()
                }
            },
        }
    }

    fn lookup(&self, request: &HttpInvocation) -> Result<HandlerResponse, LookupError> {
        let raw = request
            .resolve_target_ip()
            .ok_or(LookupError::MissingAddress)?;
        log::info!("Resolving IP {}", raw);

        let ip: IpAddr = raw
            .trim()
            .parse()
            .map_err(|_| LookupError::InvalidAddress(raw.to_string()))?;

        let record = self.database.lookup(ip)?;
        log::debug!(
            "Resolved {} to {} ({})",
            ip,
            record.city_name().unwrap_or("unknown city"),
            record.country_code().unwrap_or("??")
        );
        Ok(HandlerResponse::ok_json(&record)?)
    }
}
