//! Message body decoding.
//!
//! A body is read through a [`BodyDecoder`] that knows where the body ends,
//! either from a declared `content-length` or from the chunked framing.
//! Decoders never read past the end of their body: once a decoder is
//! finished, the underlying source sits on the first byte of the next message.
//!
//! Closing a body that has not been read to the end drains the rest of it,
//! it never truncates the connection.

use std::io::{self, BufRead, Read, ErrorKind};

use super::Headers;
use super::HTTP_LINE_BREAK;

use crate::bleed::min_len;
use crate::line::ReadLine;
use crate::config::Config;
use crate::error::{Error, HttpError};

#[inline]
fn unexpected_eof() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "connection closed inside a message body")
}

/// Fixed-length body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthDecoder {
    remaining: u64,
}

impl LengthDecoder {
    #[inline]
    pub const fn new(length: u64) -> Self { Self { remaining: length } }

    #[inline]
    pub const fn remaining(&self) -> u64 { self.remaining }

    fn read<R: BufRead + ?Sized>(&mut self, io: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let len = min_len(buf.len(), self.remaining);
        let read_n = io.read(&mut buf[..len])?;

        // EOF before the declared length
        if read_n == 0 {
            return Err(unexpected_eof());
        }

        self.remaining -= read_n as u64;
        Ok(read_n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Size,
    Data(u64),
    DataEnd,
    Done,
}

/// Chunked transfer-encoding body.
#[derive(Debug, Clone)]
pub struct ChunkedDecoder {
    state: ChunkState,
    trailers: Headers,
    max_line_len: usize,
    max_headers: usize,
}

impl ChunkedDecoder {
    #[inline]
    pub fn new(config: &Config) -> Self {
        Self {
            state: ChunkState::Size,
            trailers: Headers::new(),
            max_line_len: config.max_line_len,
            max_headers: config.max_headers,
        }
    }

    /// Trailer headers, available once the terminal chunk is read.
    #[inline]
    pub fn trailers(&self) -> &Headers { &self.trailers }

    #[inline]
    pub fn is_finished(&self) -> bool { self.state == ChunkState::Done }

    fn read<R: BufRead + ?Sized>(&mut self, io: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match self.state {
                ChunkState::Done => return Ok(0),
                // hex size, optionally followed by extensions
                ChunkState::Size => {
                    let line = io
                        .read_crlf_line(self.max_line_len)?
                        .ok_or_else(unexpected_eof)?;

                    let size = parse_chunk_size(&line)?;

                    if size == 0 {
                        self.read_trailers(io)?;
                        self.state = ChunkState::Done;
                        return Ok(0);
                    }

                    self.state = ChunkState::Data(size);
                }
                // continue to read data from the same chunk
                ChunkState::Data(next) => {
                    let len = min_len(buf.len(), next);
                    let read_n = io.read(&mut buf[..len])?;

                    // EOF ?
                    if read_n == 0 {
                        return Err(unexpected_eof());
                    }

                    if next == read_n as u64 {
                        self.state = ChunkState::DataEnd;
                    } else {
                        self.state = ChunkState::Data(next - read_n as u64);
                    }
                    return Ok(read_n);
                }
                // chunk data must be followed by CRLF
                ChunkState::DataEnd => {
                    let mut crlf = [0u8; 2];
                    io.read_exact(&mut crlf)?;
                    if &crlf[..] != HTTP_LINE_BREAK {
                        return Err(Error::from(HttpError::ChunkFormat).into());
                    }
                    self.state = ChunkState::Size;
                }
            }
        }
    }

    fn read_trailers<R: BufRead + ?Sized>(&mut self, io: &mut R) -> io::Result<()> {
        let mut count = 0;
        loop {
            let line = io
                .read_crlf_line(self.max_line_len)?
                .ok_or_else(unexpected_eof)?;

            if line.is_empty() {
                return Ok(());
            }

            count += 1;
            if count > self.max_headers {
                return Err(Error::from(HttpError::Header).into());
            }

            self.trailers.insert_line(&line).map_err(Error::from)?;
        }
    }
}

fn parse_chunk_size(line: &str) -> Result<u64, Error> {
    // an empty or space-led line is not a size
    if !line.bytes().next().map_or(false, |b| b.is_ascii_hexdigit()) {
        return Err(HttpError::ChunkFormat.into());
    }

    let mut raw = Vec::with_capacity(line.len() + HTTP_LINE_BREAK.len());
    raw.extend_from_slice(line.as_bytes());
    raw.extend_from_slice(HTTP_LINE_BREAK);

    match httparse::parse_chunk_size(&raw) {
        Ok(httparse::Status::Complete((_, size))) => Ok(size),
        _ => Err(HttpError::ChunkFormat.into()),
    }
}

/// Body framing chosen from a message head.
#[derive(Debug, Clone)]
pub enum BodyDecoder {
    Empty,
    Length(LengthDecoder),
    Chunked(ChunkedDecoder),
}

impl BodyDecoder {
    /// Read some body bytes from `io`, `Ok(0)` once the body is finished.
    pub fn read_from<R: BufRead + ?Sized>(&mut self, io: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BodyDecoder::Empty => Ok(0),
            BodyDecoder::Length(d) => d.read(io, buf),
            BodyDecoder::Chunked(d) => d.read(io, buf),
        }
    }

    /// Bytes left if known up front, `None` for an unfinished chunked body.
    pub fn remaining(&self) -> Option<u64> {
        match self {
            BodyDecoder::Empty => Some(0),
            BodyDecoder::Length(d) => Some(d.remaining()),
            BodyDecoder::Chunked(d) if d.is_finished() => Some(0),
            BodyDecoder::Chunked(_) => None,
        }
    }

    /// Whether the whole body has been consumed.
    #[inline]
    pub fn is_finished(&self) -> bool { self.remaining() == Some(0) }

    /// Trailers of a chunked body.
    pub fn trailers(&self) -> Option<&Headers> {
        match self {
            BodyDecoder::Chunked(d) => Some(d.trailers()),
            _ => None,
        }
    }

    /// Read and discard the rest of the body, returns the number of
    /// discarded bytes.
    pub fn drain<R: BufRead + ?Sized>(&mut self, io: &mut R) -> io::Result<u64> {
        let mut buf = [0u8; 0x1000];
        let mut total = 0;
        loop {
            match self.read_from(io, &mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => total += n as u64,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Readable view of a message body.
pub struct Body<'a, R: ?Sized> {
    io: &'a mut R,
    decoder: &'a mut BodyDecoder,
}

impl<'a, R: BufRead + ?Sized> Body<'a, R> {
    #[inline]
    pub fn new(io: &'a mut R, decoder: &'a mut BodyDecoder) -> Self { Self { io, decoder } }

    /// Bytes left if known up front.
    #[inline]
    pub fn remaining(&self) -> Option<u64> { self.decoder.remaining() }

    #[inline]
    pub fn is_finished(&self) -> bool { self.decoder.is_finished() }

    /// Trailers of a chunked body, complete once the body is read to the end.
    #[inline]
    pub fn trailers(&self) -> Option<&Headers> { self.decoder.trailers() }

    /// Discard up to `n` bytes, returns the number of skipped bytes,
    /// which is less than `n` only if the body ends first.
    pub fn skip(&mut self, n: u64) -> io::Result<u64> {
        io::copy(&mut self.by_ref().take(n), &mut io::sink())
    }

    /// Drain whatever is left, so that the source is positioned
    /// at the next message.
    pub fn close(self) -> io::Result<()> { self.decoder.drain(self.io).map(|_| ()) }
}

impl<'a, R: BufRead + ?Sized> Read for Body<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.decoder.read_from(self.io, buf) }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::BufReader;
    use crate::http::ChunkedEncoder;
    use rand::prelude::*;

    fn chunked() -> BodyDecoder { BodyDecoder::Chunked(ChunkedDecoder::new(&Config::new())) }

    fn read_all<R: BufRead>(io: &mut R, decoder: &mut BodyDecoder) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        Body::new(io, decoder).read_to_end(&mut out)?;
        Ok(out)
    }

    fn expect_http(e: io::Error, expected: HttpError) {
        match Error::from(e) {
            Error::Http(e) => assert_eq!(e, expected),
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn length_body_stops_at_length() {
        for cap in 1..=16 {
            let mut io = BufReader::with_capacity(cap, &b"helloNEXT"[..]);
            let mut decoder = BodyDecoder::Length(LengthDecoder::new(5));

            assert_eq!(read_all(&mut io, &mut decoder).unwrap(), b"hello");
            assert!(decoder.is_finished());

            let mut rest = Vec::new();
            io.read_to_end(&mut rest).unwrap();
            assert_eq!(rest, b"NEXT");
        }
    }

    #[test]
    fn length_body_premature_eof() {
        let mut io = BufReader::new(&b"ab"[..]);
        let mut decoder = BodyDecoder::Length(LengthDecoder::new(5));
        let mut body = Body::new(&mut io, &mut decoder);

        let mut buf = [0u8; 16];
        assert_eq!(body.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(body.remaining(), Some(3));

        let e = body.read(&mut buf).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn length_body_close_skips_rest() {
        let mut io = BufReader::new(&b"0123456789NEXT"[..]);
        let mut decoder = BodyDecoder::Length(LengthDecoder::new(10));
        let mut body = Body::new(&mut io, &mut decoder);

        let mut buf = [0u8; 3];
        body.read_exact(&mut buf).unwrap();
        assert_eq!(body.skip(2).unwrap(), 2);
        body.close().unwrap();

        let mut rest = Vec::new();
        io.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"NEXT");
    }

    #[test]
    fn chunked_wikipedia() {
        for cap in 1..=32 {
            let mut io = BufReader::with_capacity(cap, &b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\nNEXT"[..]);
            let mut decoder = chunked();

            assert_eq!(read_all(&mut io, &mut decoder).unwrap(), b"Wikipedia");
            assert!(decoder.is_finished());

            let mut rest = Vec::new();
            io.read_to_end(&mut rest).unwrap();
            assert_eq!(rest, b"NEXT");
        }
    }

    #[test]
    fn chunked_extensions_and_trailers() {
        let data = b"3;name=value\r\nabc\r\nA\r\n0123456789\r\n0\r\nx-sum: 13\r\nx-more: yes\r\n\r\n";
        let mut io = BufReader::new(&data[..]);
        let mut decoder = chunked();

        assert_eq!(read_all(&mut io, &mut decoder).unwrap(), b"abc0123456789");
        let trailers = decoder.trailers().unwrap();
        assert_eq!(trailers.get("x-sum"), Some("13"));
        assert_eq!(trailers.get("X-More"), Some("yes"));
    }

    #[test]
    fn chunked_bad_size() {
        for data in [&b"zz\r\nabc\r\n0\r\n\r\n"[..], &b"\r\n"[..], &b" 4\r\nWiki\r\n0\r\n\r\n"[..]] {
            let mut io = BufReader::new(data);
            let e = read_all(&mut io, &mut chunked()).unwrap_err();
            expect_http(e, HttpError::ChunkFormat);
        }
    }

    #[test]
    fn chunked_missing_crlf() {
        let mut io = BufReader::new(&b"4\r\nWikiXX5\r\npedia\r\n0\r\n\r\n"[..]);
        let e = read_all(&mut io, &mut chunked()).unwrap_err();
        expect_http(e, HttpError::ChunkFormat);
    }

    #[test]
    fn chunked_premature_eof() {
        for data in [&b"4\r\nWi"[..], &b"4\r\nWiki\r\n"[..], &b"4\r\nWiki\r\n0\r\n"[..]] {
            let mut io = BufReader::new(data);
            let e = read_all(&mut io, &mut chunked()).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
        }
    }

    #[test]
    fn chunked_close_drains() {
        let mut io = BufReader::with_capacity(3, &b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\nNEXT"[..]);
        let mut decoder = chunked();
        let mut body = Body::new(&mut io, &mut decoder);

        let mut buf = [0u8; 2];
        body.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"Wi");
        assert_eq!(body.remaining(), None);
        body.close().unwrap();
        assert!(decoder.is_finished());

        let mut rest = Vec::new();
        io.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"NEXT");
    }

    #[test]
    fn chunked_round_trip() {
        let mut rng = thread_rng();
        for _ in 0..64 {
            let len: usize = rng.gen_range(0..4096);
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

            // re-chunk at random boundaries
            let mut encoder = ChunkedEncoder::new(Vec::new());
            let mut offset = 0;
            while offset < data.len() {
                let n = rng.gen_range(1..=data.len() - offset);
                io::Write::write_all(&mut encoder, &data[offset..offset + n]).unwrap();
                offset += n;
            }
            let wire = encoder.finish().unwrap();

            let mut io = BufReader::with_capacity(rng.gen_range(1..64), &wire[..]);
            assert_eq!(read_all(&mut io, &mut chunked()).unwrap(), data);
        }
    }
}
