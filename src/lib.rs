//! Blocking http/1.1 message reader and websocket session engine.
//!
//! ## Features
//! - Strict CRLF line reading, never a silently truncated line.
//! - Content-length and chunked bodies that always leave the connection
//!   on the first byte of the next message.
//! - RFC 6455 framing, fragmentation and the close handshake.
//! - A single write lock per session, frames never interleave.
//!
//! ## High-level API
//!
//! - [`http`]
//! - [`endpoint`]
//! - [`session`]
//!
//! ```ignore
//! {
//!     // handshake
//!     let mut session = Endpoint::<TcpStream, Server>::accept(tcp, observer)?;
//!     // push messages from another thread
//!     let sender = session.sender();
//!     thread::spawn(move || sender.send_text("hello"));
//!     // drive the observer until the connection is closed
//!     session.run()?;
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`line`]
//! - [`frame`]
//! - [`handshake`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // encode a frame head
//!     let head = FrameHead::new(...);
//!     let offset = head.encode(&mut buf)?;
//!
//!     // decode a frame head
//!     let (head, offset) = FrameHead::decode(&buf)?;
//!
//!     // read a whole frame as a server
//!     let frame = read_frame::<_, Server>(&mut io, limit)?;
//! }
//! ```

mod bleed;

pub mod line;
pub mod role;
pub mod http;
pub mod error;
pub mod frame;
pub mod config;
pub mod session;
pub mod endpoint;
pub mod handshake;
pub mod transport;

pub use config::Config;
pub use error::Error;
pub use endpoint::Endpoint;
pub use role::{Client, Server};
pub use session::{Session, Sender, Observer, State};
