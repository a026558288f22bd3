use std::io::{Read, ErrorKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::State;

use crate::transport::Transport;
use crate::frame::{OpCode, write_frame, MAX_CONTROL_PAYLOAD};
use crate::role::RoleHelper;
use crate::error::{Error, FrameError, SessionError};

type WriteFn = fn(&mut dyn Transport, bool, OpCode, &[u8]) -> Result<(), Error>;

/// Everything guarded by the write lock.
pub(super) struct WriteSide {
    io: Box<dyn Transport>,
    write: WriteFn,
    sent_close: bool,
    received_close: bool,
    released: bool,
}

impl WriteSide {
    fn write(&mut self, fin: bool, opcode: OpCode, payload: &[u8]) -> Result<(), Error> {
        if self.released || self.sent_close {
            return Err(SessionError::Closed.into());
        }

        match (self.write)(&mut *self.io, fin, opcode, payload) {
            // a broken transport can not carry any more frames
            Err(Error::Io(e)) => {
                self.release();
                Err(Error::Io(e))
            }
            r => r,
        }
    }

    fn write_close(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.write(true, OpCode::Close, payload)?;
        self.sent_close = true;
        debug!("close frame sent, len={}", payload.len());
        Ok(())
    }

    /// Shut the connection down, only the first call has any effect.
    pub(super) fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.io.shutdown() {
            debug!("shutdown failed: {}", e);
        }
        debug!("connection released");
    }

    pub(super) fn state(&self) -> State {
        if self.released {
            State::Closed
        } else if self.sent_close || self.received_close {
            State::Closing
        } else {
            State::Open
        }
    }
}

/// Clonable write handle of a session.
///
/// All frames go through one lock, so concurrent senders never
/// interleave partial frames on the wire.
#[derive(Clone)]
pub struct Sender {
    shared: Arc<Mutex<WriteSide>>,
    fragment_size: usize,
}

impl Sender {
    pub(super) fn new<Role: RoleHelper>(io: Box<dyn Transport>, fragment_size: usize) -> Self {
        let side = WriteSide {
            io,
            write: write_frame::<dyn Transport, Role>,
            sent_close: false,
            received_close: false,
            released: false,
        };
        Self {
            shared: Arc::new(Mutex::new(side)),
            fragment_size: fragment_size.max(1),
        }
    }

    // a panicking observer must not wedge the other senders
    pub(super) fn lock(&self) -> MutexGuard<'_, WriteSide> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state, as seen by the write side.
    pub fn state(&self) -> State { self.lock().state() }

    /// Send a text message in one frame.
    pub fn send_text(&self, text: &str) -> Result<(), Error> {
        self.lock().write(true, OpCode::Text, text.as_bytes())
    }

    /// Send a binary message in one frame.
    pub fn send_binary(&self, data: &[u8]) -> Result<(), Error> {
        self.lock().write(true, OpCode::Binary, data)
    }

    /// Send a ping, at most 125 bytes.
    pub fn send_ping(&self, data: &[u8]) -> Result<(), Error> {
        self.lock().write(true, OpCode::Ping, data)
    }

    /// Stream a binary message, split into frames of the configured
    /// fragment size. No other frame is written until the last fragment
    /// is out. Returns the number of payload bytes sent.
    pub fn send_reader<R: Read>(&self, mut reader: R) -> Result<u64, Error> {
        let size = self.fragment_size;
        let mut cur = vec![0u8; size];
        let mut next = vec![0u8; size];

        let mut side = self.lock();
        let mut cur_n = read_fill(&mut reader, &mut cur)?;
        let mut opcode = OpCode::Binary;
        let mut total = 0_u64;

        loop {
            // a short read means the reader is exhausted
            let next_n = if cur_n == size {
                match read_fill(&mut reader, &mut next) {
                    Ok(n) => n,
                    Err(e) => {
                        // the message can never be finished
                        if opcode == OpCode::Continue {
                            side.release();
                        }
                        return Err(e);
                    }
                }
            } else {
                0
            };
            let fin = next_n == 0;

            side.write(fin, opcode, &cur[..cur_n])?;
            total += cur_n as u64;

            if fin {
                return Ok(total);
            }

            std::mem::swap(&mut cur, &mut next);
            cur_n = next_n;
            opcode = OpCode::Continue;
        }
    }

    /// Send a close frame. Without a code the frame has no payload
    /// and the reason is not sent. A reason longer than 123 bytes
    /// is refused with [`FrameError::ControlTooLong`].
    ///
    /// The connection is released here if the peer already closed.
    pub fn send_close(&self, code: Option<u16>, reason: &str) -> Result<(), Error> {
        if code.is_some() && 2 + reason.len() > MAX_CONTROL_PAYLOAD {
            return Err(FrameError::ControlTooLong.into());
        }
        let payload = close_payload(code, reason);
        let mut side = self.lock();
        side.write_close(&payload)?;
        if side.received_close {
            side.release();
        }
        Ok(())
    }

    /// Release the connection without a close frame.
    /// A reader blocked on the session sees an abnormal closure.
    pub fn terminate(&self) { self.lock().release() }

    /// Answer a ping, unless a close frame is already out.
    pub(super) fn reply_pong(&self, data: &[u8]) -> Result<(), Error> {
        let mut side = self.lock();
        if side.sent_close || side.released {
            debug!("ping after close, not answered");
            return Ok(());
        }
        side.write(true, OpCode::Pong, data)
    }

    /// Record the peer's close, echo it if needed, then release.
    pub(super) fn on_peer_close(&self, echo: &[u8]) {
        let mut side = self.lock();
        side.received_close = true;
        if !side.sent_close && !side.released {
            if let Err(e) = side.write_close(echo) {
                debug!("close echo failed: {}", e);
            }
        }
        side.release();
    }

    /// Best-effort close with `code` before failing the connection.
    pub(super) fn fail(&self, code: Option<u16>, reason: &str) {
        let mut side = self.lock();
        if let Some(code) = code {
            if !side.sent_close && !side.released {
                if let Err(e) = side.write_close(&close_payload(Some(code), reason)) {
                    debug!("failed to send close {}: {}", code, e);
                }
            }
        }
        side.release();
    }
}

/// Code in network byte order, then as much of the reason
/// as fits in a control frame, cut at a char boundary.
fn close_payload(code: Option<u16>, reason: &str) -> Vec<u8> {
    let code = match code {
        Some(code) => code,
        None => return Vec::new(),
    };

    let mut end = reason.len().min(MAX_CONTROL_PAYLOAD - 2);
    while !reason.is_char_boundary(end) {
        end -= 1;
    }

    let mut payload = Vec::with_capacity(2 + end);
    payload.extend_from_slice(&code.to_be_bytes());
    payload.extend_from_slice(reason[..end].as_bytes());
    payload
}

fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, Error> {
    let mut n = 0;
    while n < buf.len() {
        match reader.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(read_n) => n += read_n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(n)
}
