//! Markers.
//!
//! Markers are used to apply different strategies as a client or server.
//!
//! For example, `Endpoint<IO, Server>::accept` answers the opening handshake
//! and returns `Session<IO, Server>`. A server never masks what it writes and
//! requires every frame it reads to be masked, a client does the reverse.
//!
//! Both client and server meet [`RoleHelper`], which tells how to mask payload
//! data. Only server meets [`ServerRole`], which the accepting endpoint requires.
//!
//! Any type implements these traits will be treated as a `client` or `server`.

use crate::frame::Mask;
use crate::frame::mask::new_mask_key;

/// Client or Server marker.
pub trait RoleHelper: Send + Sync + 'static {
    /// Whether frames from the peer must carry a mask key.
    const REQUIRE_READ_MASK: bool;

    /// Mask for the next outgoing frame.
    fn new_write_mask() -> Mask;
}

/// Server marker.
pub trait ServerRole: RoleHelper {}

/// Standard server.
#[derive(Debug, Clone, Copy)]
pub struct Server;

/// Standard client using random mask key.
#[derive(Debug, Clone, Copy)]
pub struct Client;

impl RoleHelper for Server {
    const REQUIRE_READ_MASK: bool = true;

    /// Server should not mask the payload.
    #[inline]
    fn new_write_mask() -> Mask { Mask::None }
}

impl RoleHelper for Client {
    const REQUIRE_READ_MASK: bool = false;

    #[inline]
    fn new_write_mask() -> Mask { Mask::Key(new_mask_key()) }
}

impl ServerRole for Server {}
