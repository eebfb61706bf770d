//! geoip_api library: GeoLite2 City acquisition and IP lookup
//!
//! This library provides two halves:
//!
//! - **Acquisition**: download the GeoLite2 City archive from MaxMind (following
//!   redirects manually), extract the single `.mmdb` file, and place it in a
//!   target directory.
//! - **Lookup**: load that database once per process and answer invocations
//!   with the geolocation record of an IP address, either from a serverless-style
//!   JSON envelope or from an HTTP request.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use geoip_api::{init_database, Invocation, LookupHandler};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let database = init_database(Path::new("./data/GeoLite2-City.mmdb"))?;
//! let handler = LookupHandler::new(database);
//!
//! let invocation = Invocation::from_json(r#"{"ip": "8.8.8.8"}"#)?;
//! let response = handler.handle(&invocation);
//! println!("{} {}", response.status_code, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Acquisition and the HTTP server require a Tokio runtime. Lookups themselves
//! are synchronous.

#![warn(missing_docs)]

pub mod acquire;
pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod handler;
pub mod initialization;
pub mod server;

// Re-export public API
pub use acquire::{run_acquisition, AcquisitionReport};
pub use config::{AcquireConfig, Cli, Command, LogFormat, LogLevel};
pub use error_handling::{AcquisitionError, DatabaseError, LookupError};
pub use geoip::{init_database, GeoIpLookup, GeoRecord, MaxMindDatabase};
pub use handler::{HandlerResponse, Invocation, LookupHandler};
pub use server::start_lookup_server;
