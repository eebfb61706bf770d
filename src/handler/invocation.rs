//! Invocation envelopes and their typed form.
//!
//! Invocations arrive as loosely structured JSON (the serverless event shape:
//! `source`, `queryStringParameters`, `ip`, `requestContext.http.sourceIp`) or
//! from the HTTP route. Both are turned into an [`Invocation`] at the boundary so
//! the handler only ever branches on a typed value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{IP_QUERY_PARAM, SCHEDULED_EVENT_SOURCE};

/// Raw invocation event as delivered by the hosting platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEnvelope {
    /// Origin marker; scheduled events carry `aws.events`
    pub source: Option<String>,
    /// Query string of an HTTP-originated event
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Explicit IP placed directly on the event
    pub ip: Option<String>,
    /// Transport metadata of an HTTP-originated event
    pub request_context: Option<RequestContext>,
}

/// `requestContext` of an HTTP-originated event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// HTTP details
    pub http: Option<HttpContext>,
}

/// `requestContext.http` of an HTTP-originated event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpContext {
    /// Network-observed address of the caller
    pub source_ip: Option<String>,
}

/// What the handler was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Scheduler keep-warm ping; answered without touching the database.
    Warmup,
    /// A real lookup request.
    Http(HttpInvocation),
}

/// Candidate addresses carried by a lookup request, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpInvocation {
    /// `ip` query string parameter
    pub query_ip: Option<String>,
    /// `ip` field on the envelope itself
    pub envelope_ip: Option<String>,
    /// Caller address observed by the transport
    pub source_ip: Option<String>,
}

impl HttpInvocation {
    /// Picks the address to look up: query parameter, then envelope field, then
    /// the caller's source address. Blank values count as absent.
    pub fn resolve_target_ip(&self) -> Option<&str> {
        [&self.query_ip, &self.envelope_ip, &self.source_ip]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .find(|candidate| !candidate.trim().is_empty())
    }
}

impl Invocation {
    /// Parses a JSON envelope and classifies it.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let envelope: InvocationEnvelope = serde_json::from_str(raw)?;
        Ok(envelope.into())
    }

    /// True for scheduler keep-warm pings.
    pub fn is_warmup(&self) -> bool {
        matches!(self, Invocation::Warmup)
    }
}

impl From<InvocationEnvelope> for Invocation {
    fn from(envelope: InvocationEnvelope) -> Self {
        if envelope.source.as_deref() == Some(SCHEDULED_EVENT_SOURCE) {
            return Invocation::Warmup;
        }

        let query_ip = envelope
            .query_string_parameters
            .and_then(|mut params| params.remove(IP_QUERY_PARAM));
        let source_ip = envelope
            .request_context
            .and_then(|context| context.http)
            .and_then(|http| http.source_ip);

        Invocation::Http(HttpInvocation {
            query_ip,
            envelope_ip: envelope.ip,
            source_ip,
        })
    }
}
