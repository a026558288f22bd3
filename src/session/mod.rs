//! Websocket session.
//!
//! A [`Session`] owns the read half of an upgraded connection and turns
//! frames into messages for an [`Observer`]. Writes go through a [`Sender`],
//! which can be cloned and used from any thread.
//!
//! ```text
//!   OPEN --(close sent or received)--> CLOSING --(released)--> CLOSED
//!     \                                                          ^
//!      `------(eof, protocol error, io error, terminate)--------'
//! ```
//!
//! Fragmented messages are assembled here and delivered once, when the
//! final fragment arrives. Pings are answered automatically. A close frame
//! from the peer is echoed (unless this side closed first), then the
//! connection is released.

mod sender;
mod observer;

pub use sender::Sender;
pub use observer::Observer;

use std::io::BufReader;
use std::marker::PhantomData;

use log::{debug, warn};

use crate::config::Config;
use crate::transport::Transport;
use crate::frame::{Frame, OpCode, read_frame};
use crate::role::RoleHelper;
use crate::error::{Error, FrameError, SessionError};

/// No status code in the close frame.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Connection ended without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Open,
    /// A close frame was sent or received, the connection is still up.
    Closing,
    Closed,
}

// message being assembled from fragments
struct Partial {
    opcode: OpCode,
    data: Vec<u8>,
}

/// Websocket session over `IO`, acting as `Role`.
pub struct Session<IO, Role, O> {
    io: BufReader<IO>,
    sender: Sender,
    observer: O,
    partial: Option<Partial>,
    config: Config,
    closed: bool,
    _marker: PhantomData<Role>,
}

impl<IO, Role, O> Session<IO, Role, O>
where
    IO: Transport,
    Role: RoleHelper,
    O: Observer,
{
    /// Create a session over a connection that already completed
    /// its opening handshake.
    pub fn new(io: IO, observer: O) -> Result<Self, Error> {
        Self::with_config(io, observer, Config::new())
    }

    /// Create with custom limits.
    pub fn with_config(io: IO, observer: O, config: Config) -> Result<Self, Error> {
        let io = BufReader::with_capacity(config.read_buffer_size, io);
        Self::from_buffered(io, observer, config)
    }

    /// Create from a buffered reader, keeping whatever it already holds.
    /// Frames sent right behind the handshake may sit in that buffer.
    pub fn from_buffered(io: BufReader<IO>, observer: O, config: Config) -> Result<Self, Error> {
        let write_half = io.get_ref().try_clone()?;
        Ok(Self {
            io,
            sender: Sender::new::<Role>(Box::new(write_half), config.fragment_size),
            observer,
            partial: None,
            config,
            closed: false,
            _marker: PhantomData,
        })
    }

    /// A new write handle.
    #[inline]
    pub fn sender(&self) -> Sender { self.sender.clone() }

    #[inline]
    pub const fn observer(&self) -> &O { &self.observer }

    #[inline]
    pub fn observer_mut(&mut self) -> &mut O { &mut self.observer }

    /// Consume the session, return the observer.
    #[inline]
    pub fn into_observer(self) -> O { self.observer }

    /// Current state.
    pub fn state(&self) -> State {
        if self.closed {
            State::Closed
        } else {
            self.sender.state()
        }
    }

    /// Read one frame and act on it.
    ///
    /// Blocks until a frame arrives. Once the session is closed,
    /// every call returns [`SessionError::Closed`].
    /// A framing or protocol violation sends a 1002 close, releases
    /// the connection and is returned.
    pub fn handle_next_frame(&mut self) -> Result<(), Error> {
        if self.closed {
            return Err(SessionError::Closed.into());
        }

        let frame = match read_frame::<_, Role>(&mut self.io, self.config.max_frame_size) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("connection ended without close frame");
                self.sender.fail(None, "");
                self.finish(CLOSE_ABNORMAL, String::new());
                return Ok(());
            }
            Err(e) => return self.fail(e),
        };

        match self.dispatch(frame) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Handle frames until the session is closed.
    pub fn run(&mut self) -> Result<(), Error> {
        while !self.closed {
            self.handle_next_frame()?;
        }
        Ok(())
    }

    fn dispatch(&mut self, frame: Frame) -> Result<(), Error> {
        let Frame {
            fin,
            opcode,
            payload,
        } = frame;

        match opcode {
            OpCode::Text | OpCode::Binary => {
                if self.partial.is_some() {
                    return Err(SessionError::Protocol("message already in progress").into());
                }
                self.check_message_size(payload.len())?;
                if fin {
                    self.deliver(opcode, payload)
                } else {
                    self.partial = Some(Partial {
                        opcode,
                        data: payload,
                    });
                    Ok(())
                }
            }
            OpCode::Continue => {
                let len = match &self.partial {
                    Some(partial) => partial.data.len() + payload.len(),
                    None => return Err(SessionError::Protocol("unstarted continuation").into()),
                };
                self.check_message_size(len)?;
                // checked above
                if let Some(partial) = self.partial.as_mut() {
                    partial.data.extend_from_slice(&payload);
                }
                if fin {
                    match self.partial.take() {
                        Some(Partial { opcode, data }) => self.deliver(opcode, data),
                        None => Ok(()),
                    }
                } else {
                    Ok(())
                }
            }
            OpCode::Ping => self.sender.reply_pong(&payload),
            OpCode::Pong => {
                self.observer.on_pong(&self.sender, payload);
                Ok(())
            }
            OpCode::Close => {
                self.on_close_frame(payload);
                Ok(())
            }
        }
    }

    fn check_message_size(&self, len: usize) -> Result<(), Error> {
        if len > self.config.max_message_size {
            return Err(FrameError::TooLarge.into());
        }
        Ok(())
    }

    fn deliver(&mut self, opcode: OpCode, data: Vec<u8>) -> Result<(), Error> {
        if opcode == OpCode::Text {
            let text = String::from_utf8(data)
                .map_err(|_| SessionError::Protocol("invalid utf-8 in text message"))?;
            self.observer.on_text(&self.sender, text);
        } else {
            self.observer.on_binary(&self.sender, data);
        }
        Ok(())
    }

    fn on_close_frame(&mut self, payload: Vec<u8>) {
        let (code, reason, echo) = match payload.as_slice() {
            [b1, b2, reason @ ..] => (
                u16::from_be_bytes([*b1, *b2]),
                String::from_utf8_lossy(reason).into_owned(),
                vec![*b1, *b2],
            ),
            _ => (CLOSE_NO_STATUS, String::new(), Vec::new()),
        };

        debug!("close frame received: code={}, reason={}", code, reason);

        self.sender.on_peer_close(&echo);
        self.finish(code, reason);
    }

    fn fail(&mut self, e: Error) -> Result<(), Error> {
        let code = e.close_code();
        let reason = e.to_string();

        match code {
            Some(code) => warn!("failing connection with {}: {}", code, reason),
            None => debug!("connection failed: {}", reason),
        }

        self.sender.fail(code, &reason);
        self.observer.on_error(&self.sender, &e);
        self.finish(code.unwrap_or(CLOSE_ABNORMAL), reason);
        Err(e)
    }

    fn finish(&mut self, code: u16, reason: String) {
        self.closed = true;
        self.partial = None;
        self.observer.on_close(&self.sender, code, reason);
    }
}
