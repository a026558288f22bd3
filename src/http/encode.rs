//! Response head and chunked body encoding.

use std::io::{Write, Result};

use super::Headers;
use super::{HTTP_VERSION, HTTP_LINE_BREAK};

/// Status line and headers of an outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
}

impl ResponseHead {
    /// Constructor, without headers.
    pub fn new<S: Into<String>>(status: u16, reason: S) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers: Headers::new(),
        }
    }

    /// Add a header, builder style.
    pub fn with_header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(name, value);
        self
    }

    /// Write `HTTP/1.1 {status} {reason}`, the headers and the blank line.
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        write!(w, "{} {} {}", HTTP_VERSION, self.status, self.reason)?;
        w.write_all(HTTP_LINE_BREAK)?;
        self.headers.encode(w)?;
        w.write_all(HTTP_LINE_BREAK)
    }

    /// Encode into a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        // writing to a vec never fails
        let _ = self.encode(&mut buf);
        buf
    }
}

/// Chunked transfer-encoding writer.
///
/// Each non-empty write is sent as one chunk;
/// [`finish`](Self::finish) writes the terminal zero-size chunk.
pub struct ChunkedEncoder<W> {
    io: W,
}

impl<W: Write> ChunkedEncoder<W> {
    #[inline]
    pub const fn new(io: W) -> Self { Self { io } }

    /// Write the terminal chunk, return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.io.write_all(b"0")?;
        self.io.write_all(HTTP_LINE_BREAK)?;
        self.io.write_all(HTTP_LINE_BREAK)?;
        self.io.flush()?;
        Ok(self.io)
    }
}

impl<W: Write> Write for ChunkedEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        // a zero-size chunk would end the body
        if buf.is_empty() {
            return Ok(0);
        }
        write!(self.io, "{:x}", buf.len())?;
        self.io.write_all(HTTP_LINE_BREAK)?;
        self.io.write_all(buf)?;
        self.io.write_all(HTTP_LINE_BREAK)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { self.io.flush() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn response_head() {
        let head = ResponseHead::new(404, "Not Found")
            .with_header("Content-Length", "0")
            .with_header("Connection", "close");

        assert_eq!(
            head.to_bytes(),
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn chunked_output() {
        let mut encoder = ChunkedEncoder::new(Vec::new());
        encoder.write_all(b"Wiki").unwrap();
        encoder.write_all(b"").unwrap();
        encoder.write_all(b"pedia in chunks").unwrap();
        let out = encoder.finish().unwrap();

        assert_eq!(out, b"4\r\nWiki\r\nf\r\npedia in chunks\r\n0\r\n\r\n");
    }
}
