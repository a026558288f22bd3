#![allow(missing_docs)]
//! Errors

mod http;
mod frame;
mod session;
mod handshake;

pub use http::HttpError;
pub use frame::FrameError;
pub use session::SessionError;
pub use handshake::HandshakeError;

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Http(HttpError),

    Frame(FrameError),

    Handshake(HandshakeError),

    Session(SessionError),

    Io(std::io::Error),
}

impl Error {
    /// Close code to send before failing a websocket connection,
    /// `None` if the error does not come from the peer's framing.
    pub const fn close_code(&self) -> Option<u16> {
        match self {
            Error::Frame(_) | Error::Session(SessionError::Protocol(_)) => Some(1002),
            _ => None,
        }
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self { Error::Http(e) }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self { Error::Frame(e) }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self { Error::Handshake(e) }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self { Error::Session(e) }
}

/// Unwrap an [`Error`] previously carried inside an io error,
/// e.g. by a body reader.
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        match e.downcast::<Error>() {
            Ok(inner) => inner,
            Err(e) => Error::Io(e),
        }
    }
}

/// Carry an [`Error`] through `std::io` interfaces.
impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        match e {
            Error::Io(e) => e,
            e => std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            Http(e) => write!(f, "Http error: {}", e),
            Frame(e) => write!(f, "Frame error: {}", e),
            Handshake(e) => write!(f, "Handshake error: {}", e),
            Session(e) => write!(f, "Session error: {}", e),
            Io(e) => write!(f, "Io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use Error::*;

        match self {
            Http(e) => Some(e),
            Frame(e) => Some(e),
            Handshake(e) => Some(e),
            Session(e) => Some(e),
            Io(e) => Some(e),
        }
    }
}
