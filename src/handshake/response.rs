//! Server upgrade response.
//!
//! From [RFC-6455 Section 4.2.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.2):
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! ```

use super::derive_accept_key;

use crate::http::ResponseHead;
use crate::http::header_names::*;

/// `101 Switching Protocols` answering `sec_key`.
pub fn switching_protocols(sec_key: &str) -> ResponseHead {
    ResponseHead::new(101, "Switching Protocols")
        .with_header(UPGRADE, "websocket")
        .with_header(CONNECTION, "Upgrade")
        .with_header(SEC_WEBSOCKET_ACCEPT, derive_accept_key(sec_key))
}

/// `400 Bad Request`, sent before dropping a failed upgrade.
pub fn bad_request() -> ResponseHead {
    ResponseHead::new(400, "Bad Request")
        .with_header(CONTENT_LENGTH, "0")
        .with_header(CONNECTION, "close")
}
