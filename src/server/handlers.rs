//! Lookup route.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::handler::{HandlerResponse, HttpInvocation, Invocation, LookupHandler};

/// Query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    /// Address to look up
    pub ip: Option<String>,
}

/// `GET /?ip=<addr>`: looks up `ip`, or the caller's own address when absent.
pub async fn lookup_handler(
    State(handler): State<LookupHandler>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<LookupParams>,
) -> Response {
    let invocation = Invocation::Http(HttpInvocation {
        query_ip: params.ip,
        envelope_ip: None,
        // dual-stack listeners report IPv4 callers as ::ffff:a.b.c.d
        source_ip: Some(peer.ip().to_canonical().to_string()),
    });

    handler.handle(&invocation).into_response()
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}
