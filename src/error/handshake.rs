use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum HandshakeError {
    // http error
    ConnectionClosed,

    HttpMethod,

    // websocket error
    Upgrade,

    Connection,

    SecWebSocketKey,

    SecWebSocketVersion,
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            // http error
            ConnectionClosed => write!(f, "Connection closed before the upgrade request"),

            HttpMethod => write!(f, "Illegal http method"),

            // websocket error
            Upgrade => write!(f, "Missing or illegal upgrade header"),

            Connection => write!(f, "Missing or illegal connection header"),

            SecWebSocketKey => {
                write!(f, "Missing sec-websocket-key header")
            }

            SecWebSocketVersion => {
                write!(f, "Missing or illegal sec-websocket-version")
            }
        }
    }
}

// use default impl
impl std::error::Error for HandshakeError {}
