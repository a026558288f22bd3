//! Mask flag and key.

/// Payload mask with a 32-bit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Key([u8; 4]),
    None,
}

impl Mask {
    /// Whether the mask bit is set. The key itself follows the length.
    #[inline]
    pub const fn is_flagged(b: u8) -> bool { b & 0x80 != 0 }

    /// Get the flag byte.
    #[inline]
    pub const fn to_flag(&self) -> u8 {
        match self {
            Mask::Key(_) => 0x80,
            Mask::None => 0x00,
        }
    }
}

/// Generate a new random key.
#[inline]
pub fn new_mask_key() -> [u8; 4] { rand::random::<[u8; 4]>() }

/// Mask the buffer, byte by byte.
#[inline]
pub fn apply_mask(key: [u8; 4], buf: &mut [u8]) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b ^= key[i & 0x03];
    }
}

/// Mask the buffer, 4 bytes at a time.
///
/// The key always starts at `buf[0]`, so every full chunk
/// is xored with the same word.
#[inline]
pub fn apply_mask4(key: [u8; 4], buf: &mut [u8]) {
    let key4 = u32::from_ne_bytes(key);

    let mut chunks = buf.chunks_exact_mut(4);
    for b4 in &mut chunks {
        let v = u32::from_ne_bytes([b4[0], b4[1], b4[2], b4[3]]) ^ key4;
        b4.copy_from_slice(&v.to_ne_bytes());
    }

    apply_mask(key, chunks.into_remainder());
}
