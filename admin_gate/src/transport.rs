//! TLS enforcement gate
//!
//! Decides, for admin-area requests only, whether the transport is
//! acceptable. The effective scheme honors `X-Forwarded-Proto` solely when
//! proxy trust is configured; otherwise the header is ignored entirely.

use http::HeaderMap;
use url::Url;

use crate::config::{GateConfig, TlsPolicy};

const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Outcome of TLS enforcement for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsDecision {
    Allow,
    /// 301 to the canonical secure origin plus the original path and query.
    Redirect(String),
    /// 403, no further processing.
    Reject,
}

/// Whether the request effectively arrived over a secure channel.
pub fn request_is_secure(headers: &HeaderMap, transport_secure: bool, trust_proxy: bool) -> bool {
    if transport_secure {
        return true;
    }
    if !trust_proxy {
        return false;
    }
    headers
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// Apply the TLS policy to an admin-area request.
pub fn enforce(
    config: &GateConfig,
    headers: &HeaderMap,
    transport_secure: bool,
    path: &str,
    query: Option<&str>,
) -> TlsDecision {
    match &config.tls {
        TlsPolicy::Disabled => TlsDecision::Allow,
        _ if request_is_secure(headers, transport_secure, config.trust_proxy) => TlsDecision::Allow,
        TlsPolicy::RequireReject => {
            tracing::warn!("insecure admin request rejected: {path}");
            TlsDecision::Reject
        }
        TlsPolicy::RequireRedirect { secure_origin } => {
            TlsDecision::Redirect(secure_location(secure_origin, path, query))
        }
    }
}

fn secure_location(origin: &Url, path: &str, query: Option<&str>) -> String {
    let base = origin.as_str().trim_end_matches('/');
    match query {
        Some(q) => format!("{base}{path}?{q}"),
        None => format!("{base}{path}"),
    }
}
