//! Whole frames over blocking streams.

use std::io::{Read, Write, ErrorKind};

use log::trace;

use super::{FrameHead, Fin, OpCode, Mask, PayloadLen};
use super::{MAX_FRAME_HEAD_LEN, MAX_CONTROL_PAYLOAD};
use super::mask::apply_mask4;

use crate::role::RoleHelper;
use crate::error::{Error, FrameError, SessionError};

/// A decoded frame, payload already unmasked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fin: bool,
    pub opcode: OpCode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Constructor.
    #[inline]
    pub fn new<P: Into<Vec<u8>>>(fin: bool, opcode: OpCode, payload: P) -> Self {
        Self {
            fin,
            opcode,
            payload: payload.into(),
        }
    }

    /// Serialize with the mask strategy of `Role`.
    pub fn encode<Role: RoleHelper>(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(MAX_FRAME_HEAD_LEN + self.payload.len());
        write_frame::<_, Role>(&mut buf, self.fin, self.opcode, &self.payload)?;
        Ok(buf)
    }
}

/// 64K
const PAYLOAD_PREALLOC: usize = 0x10000;

// EOF here means the peer stopped inside a frame
fn read_full<R: Read + ?Sized>(io: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    io.read_exact(buf).map_err(|e| -> Error {
        match e.kind() {
            ErrorKind::UnexpectedEof => FrameError::Truncated.into(),
            _ => e.into(),
        }
    })
}

/// Read one frame.
///
/// Returns `Ok(None)` if the stream ends cleanly before the first byte.
/// Frames from the peer are checked against the role: a server rejects
/// unmasked frames. Control frames must be final and at most 125 bytes.
/// A payload above `max_payload` (or `i32::MAX`) is rejected before
/// anything is allocated for it, a smaller one is buffered as it arrives.
pub fn read_frame<R, Role>(io: &mut R, max_payload: usize) -> Result<Option<Frame>, Error>
where
    R: Read + ?Sized,
    Role: RoleHelper,
{
    let mut buf = [0u8; MAX_FRAME_HEAD_LEN];

    loop {
        match io.read(&mut buf[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    read_full(io, &mut buf[1..2])?;

    // rest of the head: extended length, then mask key
    let key_len = if Mask::is_flagged(buf[1]) { 4 } else { 0 };
    let head_len = 2 + PayloadLen::from_flag(buf[1]).extra_len() + key_len;
    read_full(io, &mut buf[2..head_len])?;

    let (head, _) = FrameHead::decode(&buf[..head_len])?;
    let FrameHead {
        fin,
        opcode,
        mask,
        length,
    } = head;

    if Role::REQUIRE_READ_MASK && mask == Mask::None {
        return Err(SessionError::Protocol("unmasked frame from client").into());
    }

    if opcode.is_control() {
        if !fin.is_set() {
            return Err(SessionError::Protocol("fragmented control frame").into());
        }
        if length.to_num() > MAX_CONTROL_PAYLOAD as u64 {
            return Err(SessionError::Protocol("control frame too long").into());
        }
    }

    // grow with the bytes that actually arrive, not the declared length
    let len = length.checked_size(max_payload)?;
    let mut payload = Vec::with_capacity(len.min(PAYLOAD_PREALLOC));
    (&mut *io).take(len as u64).read_to_end(&mut payload)?;
    if payload.len() < len {
        return Err(FrameError::Truncated.into());
    }

    if let Mask::Key(key) = mask {
        apply_mask4(key, &mut payload);
    }

    trace!("read frame: fin={}, opcode={:?}, len={}", fin.is_set(), opcode, len);

    Ok(Some(Frame {
        fin: fin.is_set(),
        opcode,
        payload,
    }))
}

/// Write one frame, masked if `Role` masks its writes.
///
/// The length always takes its shortest form. Head and payload go out
/// in a single `write_all`.
pub fn write_frame<W, Role>(io: &mut W, fin: bool, opcode: OpCode, payload: &[u8]) -> Result<(), Error>
where
    W: Write + ?Sized,
    Role: RoleHelper,
{
    if opcode.is_control() && payload.len() > MAX_CONTROL_PAYLOAD {
        return Err(FrameError::ControlTooLong.into());
    }

    let mask = Role::new_write_mask();
    let head = FrameHead::new(
        Fin::from(fin),
        opcode,
        mask,
        PayloadLen::from_num(payload.len() as u64),
    );

    let mut frame = vec![0u8; head.encoded_len()];
    head.encode(&mut frame)?;
    let offset = frame.len();
    frame.extend_from_slice(payload);

    if let Mask::Key(key) = mask {
        apply_mask4(key, &mut frame[offset..]);
    }

    io.write_all(&frame)?;

    trace!("write frame: fin={}, opcode={:?}, len={}", fin, opcode, payload.len());

    Ok(())
}
