//! Client upgrade request.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! ```text
//! GET /path HTTP/1.1
//! host: www.example.com
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==
//! sec-websocket-version: 13
//! ```
//!
//! Only `sec-websocket-key` is mandatory here. `upgrade`, `connection` and
//! `sec-websocket-version` are checked when the client sends them.

use super::{UPGRADE_VALUE, CONNECTION_VALUE, VERSION_VALUE};

use crate::http::{Request, Method};
use crate::http::header_names::*;
use crate::error::HandshakeError;

macro_rules! handshake_check {
    ($req: expr, $name: expr, $accept: expr, $e: expr) => {
        if let Some(value) = $req.headers.get($name) {
            if !$accept(value) {
                return Err($e);
            }
        }
    };
}

/// Check an upgrade request, return its `sec-websocket-key`.
pub fn validate_request(req: &Request) -> Result<&str, HandshakeError> {
    if req.method != Method::Get {
        return Err(HandshakeError::HttpMethod);
    }

    let key = match req.headers.get(SEC_WEBSOCKET_KEY) {
        Some(key) if !key.is_empty() => key,
        _ => return Err(HandshakeError::SecWebSocketKey),
    };

    // header value here is case insensitive
    handshake_check!(
        req,
        UPGRADE,
        |v: &str| v.eq_ignore_ascii_case(UPGRADE_VALUE),
        HandshakeError::Upgrade
    );

    // e.g. "keep-alive, Upgrade"
    handshake_check!(
        req,
        CONNECTION,
        |v: &str| v.split(',').any(|t| t.trim().eq_ignore_ascii_case(CONNECTION_VALUE)),
        HandshakeError::Connection
    );

    handshake_check!(
        req,
        SEC_WEBSOCKET_VERSION,
        |v: &str| v.trim() == VERSION_VALUE,
        HandshakeError::SecWebSocketVersion
    );

    Ok(key)
}
