//! Websocket handshake.
//!
//! The upgrade request is parsed by [`HttpReader`](crate::http::HttpReader),
//! checked by [`validate_request`], then answered with [`switching_protocols`]
//! or [`bad_request`].

pub mod key;
pub mod request;
pub mod response;

pub use key::{new_sec_key, derive_accept_key};
pub use request::validate_request;
pub use response::{switching_protocols, bad_request};

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// websocket
pub const UPGRADE_VALUE: &str = "websocket";

/// upgrade
pub const CONNECTION_VALUE: &str = "upgrade";

/// 13
pub const VERSION_VALUE: &str = "13";
