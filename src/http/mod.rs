//! Http/1.1 messages.
//!
//! [`HttpReader`] parses one message head at a time from a buffered source
//! and picks the body framing from its headers:
//!
//! 1. `content-length` present: a fixed-length body,
//! 2. otherwise `transfer-encoding` ending with `chunked`: a chunked body,
//! 3. otherwise no body.
//!
//! The same source is reused for the next message, so an unread body
//! is drained before the next head is parsed.
//!
//! ```ignore
//! {
//!     let mut reader = HttpReader::new(BufReader::new(tcp));
//!     while let Some(request) = reader.read_request()? {
//!         let mut body = Vec::new();
//!         reader.body().read_to_end(&mut body)?;
//!     }
//! }
//! ```

mod uri;
mod body;
mod header;
mod encode;
mod message;

pub use header::Headers;
pub use encode::{ResponseHead, ChunkedEncoder};
pub use body::{Body, BodyDecoder, LengthDecoder, ChunkedDecoder};
pub use message::{HttpReader, Method, Request, Response};
pub use uri::{split_target, percent_decode, path_segments, query_pairs};

/// HTTP/1.1
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// CRLF
pub const HTTP_LINE_BREAK: &[u8] = b"\r\n";

/// A colon + one SP is prefered
pub const HTTP_HEADER_SP: &[u8] = b": ";

/// Header names this crate looks at.
#[allow(unused)]
pub mod header_names {
    macro_rules! header {
        (   $(
                $(#[$docs: meta])*
                ($hdr_name: ident => $name: expr);
            )+
        ) => {
            $(
                $(#[$docs])*
                pub const $hdr_name: &str = $name;
            )+
        };
    }

    header! {
        /// Content-Length
        (CONTENT_LENGTH => "Content-Length");

        /// Transfer-Encoding
        (TRANSFER_ENCODING => "Transfer-Encoding");

        /// Connection
        (CONNECTION => "Connection");

        /// Cookie
        (COOKIE => "Cookie");

        /// Upgrade
        (UPGRADE => "Upgrade");

        /// Sec-WebSocket-Key
        (SEC_WEBSOCKET_KEY => "Sec-WebSocket-Key");

        /// Sec-WebSocket-Accept
        (SEC_WEBSOCKET_ACCEPT => "Sec-WebSocket-Accept");

        /// Sec-WebSocket-Version
        (SEC_WEBSOCKET_VERSION => "Sec-WebSocket-Version");
    }
}
