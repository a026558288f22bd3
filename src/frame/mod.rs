//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!
//! [`FrameHead`] works on byte slices, [`read_frame`] and [`write_frame`]
//! move whole frames through blocking streams.

pub mod flag;
pub mod length;
pub mod mask;
mod codec;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;
pub use codec::{Frame, read_frame, write_frame};

/// 2 + 8 + 4
pub const MAX_FRAME_HEAD_LEN: usize = 14;

/// Longest payload a control frame may carry.
pub const MAX_CONTROL_PAYLOAD: usize = 125;

/// Websocket frame head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub opcode: OpCode,
    pub mask: Mask,
    pub length: PayloadLen,
}

use crate::bleed::Writer;
use crate::error::FrameError;

impl FrameHead {
    /// Constructor.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: PayloadLen) -> Self {
        Self {
            fin,
            opcode,
            mask,
            length,
        }
    }

    /// Encoded size of this head.
    #[inline]
    pub const fn encoded_len(&self) -> usize {
        let key_len = match self.mask {
            Mask::Key(_) => 4,
            Mask::None => 0,
        };
        2 + self.length.extra_len() + key_len
    }

    /// Encode to provided buffer, returns the count of written bytes.
    /// The caller should ensure the buffer is large enough,
    /// otherwise a [`FrameError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        if buf.len() < self.encoded_len() {
            return Err(FrameError::NotEnoughCapacity);
        }

        let mut writer = Writer::new(buf);

        macro_rules! writex {
            ($dst: expr) => {
                writer.write_or_err($dst, || FrameError::NotEnoughCapacity)?
            };
        }

        // fin, opcode
        let b1 = self.fin as u8 | self.opcode as u8;

        // mask, payload length
        let b2 = self.mask.to_flag() | self.length.to_flag();

        writex!(&[b1, b2]);

        // extended payload length
        match &self.length {
            PayloadLen::Standard(_) => 0,
            PayloadLen::Extended1(v) => writex!(&v.to_be_bytes()),
            PayloadLen::Extended2(v) => writex!(&v.to_be_bytes()),
        };

        // mask key
        if let Mask::Key(k) = &self.mask {
            writex!(k);
        }

        Ok(writer.pos())
    }

    /// Parse from provided buffer, returns [`FrameHead`] and the count of read bytes
    /// if the parse succeeds.
    /// If there is not enough data to parse, a [`FrameError::NotEnoughData`] error
    /// will be returned.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), FrameError> {
        let (b1, b2) = match buf {
            [b1, b2, ..] => (*b1, *b2),
            _ => return Err(FrameError::NotEnoughData),
        };

        let fin = Fin::from_flag(b1)?;
        let opcode = OpCode::from_flag(b1)?;

        let mut length = PayloadLen::from_flag(b2);
        let mut n: usize = 2;

        let need = n + length.extra_len();
        let extra = buf.get(n..need).ok_or(FrameError::NotEnoughData)?;

        match length {
            PayloadLen::Standard(_) => {}
            PayloadLen::Extended1(_) => {
                length = PayloadLen::from_byte2([extra[0], extra[1]]);
            }
            PayloadLen::Extended2(_) => {
                let mut b8 = [0u8; 8];
                b8.copy_from_slice(extra);
                length = PayloadLen::from_byte8(b8);
            }
        };
        n = need;

        let mask = if Mask::is_flagged(b2) {
            let key = buf.get(n..n + 4).ok_or(FrameError::NotEnoughData)?;
            n += 4;
            Mask::Key([key[0], key[1], key[2], key[3]])
        } else {
            Mask::None
        };

        Ok((
            FrameHead {
                fin,
                opcode,
                mask,
                length,
            },
            n,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_head() {
        let heads = [
            FrameHead::new(
                Fin::Y,
                OpCode::Binary,
                Mask::Key(mask::new_mask_key()),
                PayloadLen::from_num(4096),
            ),
            FrameHead::new(
                Fin::N,
                OpCode::Text,
                Mask::Key(mask::new_mask_key()),
                PayloadLen::from_num(64),
            ),
            FrameHead::new(Fin::Y, OpCode::Close, Mask::None, PayloadLen::from_num(2)),
            FrameHead::new(
                Fin::Y,
                OpCode::Binary,
                Mask::None,
                PayloadLen::from_num(1 << 20),
            ),
        ];

        for head in heads {
            let mut buf = vec![0; 1024];

            let encode_n = head.encode(&mut buf).unwrap();
            assert_eq!(encode_n, head.encoded_len());

            let (head2, decode_n) = FrameHead::decode(&buf[0..encode_n + 128]).unwrap();

            assert_eq!(encode_n, decode_n);
            assert_eq!(head, head2);

            // every strict prefix is incomplete
            for i in 0..encode_n {
                assert_eq!(FrameHead::decode(&buf[..i]), Err(FrameError::NotEnoughData));
            }
        }
    }

    #[test]
    fn frame_head_capacity() {
        let head = FrameHead::new(
            Fin::Y,
            OpCode::Binary,
            Mask::Key([1, 2, 3, 4]),
            PayloadLen::from_num(70000),
        );
        assert_eq!(head.encoded_len(), MAX_FRAME_HEAD_LEN);

        let mut buf = [0u8; MAX_FRAME_HEAD_LEN - 1];
        assert_eq!(head.encode(&mut buf), Err(FrameError::NotEnoughCapacity));

        let mut buf = [0u8; MAX_FRAME_HEAD_LEN];
        assert_eq!(head.encode(&mut buf), Ok(MAX_FRAME_HEAD_LEN));
    }

    #[test]
    fn frame_head_illegal() {
        // rsv1
        assert_eq!(
            FrameHead::decode(&[0xc1, 0x00]),
            Err(FrameError::IllegalFin)
        );
        // opcode 0x3
        assert_eq!(
            FrameHead::decode(&[0x83, 0x00]),
            Err(FrameError::IllegalOpCode)
        );
    }
}
