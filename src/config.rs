//! Limits shared by the http reader, the handshake and the session.

/// 8192
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// 64
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Largest payload addressable with a signed 32-bit size.
pub const DEFAULT_MAX_PAYLOAD: usize = i32::MAX as usize;

/// 4096
pub const DEFAULT_FRAGMENT_SIZE: usize = 0x1000;

/// 8192
pub const DEFAULT_READ_BUFFER_SIZE: usize = 0x2000;

/// Tunable limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Longest accepted line, CRLF excluded.
    pub max_line_len: usize,
    /// Most header lines accepted in one message head or trailer.
    pub max_headers: usize,
    /// Largest accepted frame payload.
    pub max_frame_size: usize,
    /// Largest accepted message, summed over its fragments.
    pub max_message_size: usize,
    /// Frame size used when streaming a message out.
    pub fragment_size: usize,
    /// Capacity of the buffer wrapped around the read half.
    pub read_buffer_size: usize,
}

impl Config {
    /// Constructor, with default limits.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_headers: DEFAULT_MAX_HEADERS,
            max_frame_size: DEFAULT_MAX_PAYLOAD,
            max_message_size: DEFAULT_MAX_PAYLOAD,
            fragment_size: DEFAULT_FRAGMENT_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}
