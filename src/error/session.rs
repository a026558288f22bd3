use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The peer broke the framing or message rules.
    Protocol(&'static str),

    /// The session already sent its close frame or released the connection.
    Closed,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use SessionError::*;
        match self {
            Protocol(reason) => write!(f, "Protocol violation: {}", reason),
            Closed => write!(f, "Session is closed"),
        }
    }
}

// use default impl
impl std::error::Error for SessionError {}
