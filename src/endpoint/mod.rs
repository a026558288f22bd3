//! Websocket endpoint.
//!
//! `Endpoint<IO, Server>::accept` runs the opening handshake on a freshly
//! accepted connection and returns a [`Session`](crate::session::Session)
//! ready to handle frames.

mod server;

use std::marker::PhantomData;

/// Client or server endpoint.
pub struct Endpoint<IO, Role> {
    _marker: PhantomData<IO>,
    __marker: PhantomData<Role>,
}
