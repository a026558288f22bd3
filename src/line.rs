//! CRLF line reader.
//!
//! Lines are terminated by exactly `\r\n`. A `\r` followed by anything else,
//! or a bare `\n`, is a [`HttpError::MalformedLine`].
//!
//! Reaching end-of-stream before any byte of a line is read is not an error:
//! it is reported as `Ok(None)`, which the http reader takes as a cleanly
//! closed connection. End-of-stream in the middle of a line is an error.

use std::io::{BufRead, ErrorKind};

use crate::error::{Error, HttpError};

/// CRLF-delimited line reading over a buffered byte source.
pub trait ReadLine: BufRead {
    /// Read one line without its CRLF. Returns `Ok(None)` if the stream
    /// ends exactly at a line boundary.
    fn read_crlf_line(&mut self, max_len: usize) -> Result<Option<String>, Error>;
}

impl<R: BufRead + ?Sized> ReadLine for R {
    fn read_crlf_line(&mut self, max_len: usize) -> Result<Option<String>, Error> {
        let mut line: Vec<u8> = Vec::new();
        let mut cr = false;

        loop {
            let buf = match self.fill_buf() {
                Ok(buf) => buf,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            // EOF ?
            if buf.is_empty() {
                if line.is_empty() && !cr {
                    return Ok(None);
                }
                return Err(HttpError::MalformedLine.into());
            }

            let mut used = 0;
            let mut complete = false;

            for &b in buf {
                used += 1;

                if cr {
                    if b != b'\n' {
                        return Err(HttpError::MalformedLine.into());
                    }
                    complete = true;
                    break;
                }

                match b {
                    b'\r' => cr = true,
                    b'\n' => return Err(HttpError::MalformedLine.into()),
                    b => {
                        if line.len() >= max_len {
                            return Err(HttpError::LineTooLong.into());
                        }
                        line.push(b)
                    }
                }
            }

            self.consume(used);

            if complete {
                return String::from_utf8(line)
                    .map(Some)
                    .map_err(|_| HttpError::MalformedLine.into());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{BufReader, Read};

    fn reader(data: &[u8], cap: usize) -> BufReader<&[u8]> { BufReader::with_capacity(cap, data) }

    fn expect_http(r: Result<Option<String>, Error>, expected: HttpError) {
        match r {
            Err(Error::Http(e)) => assert_eq!(e, expected),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_lines() {
        for cap in 1..=32 {
            let mut r = reader(b"GET / HTTP/1.1\r\nhost: x\r\n\r\nrest", cap);

            assert_eq!(r.read_crlf_line(1024).unwrap().unwrap(), "GET / HTTP/1.1");
            assert_eq!(r.read_crlf_line(1024).unwrap().unwrap(), "host: x");
            assert_eq!(r.read_crlf_line(1024).unwrap().unwrap(), "");

            // the reader is left at the first byte after the line
            let mut rest = String::new();
            r.read_to_string(&mut rest).unwrap();
            assert_eq!(rest, "rest");
        }
    }

    #[test]
    fn clean_eof() {
        let mut r = reader(b"", 8);
        assert!(r.read_crlf_line(1024).unwrap().is_none());

        let mut r = reader(b"a\r\n", 8);
        assert_eq!(r.read_crlf_line(1024).unwrap().unwrap(), "a");
        assert!(r.read_crlf_line(1024).unwrap().is_none());
    }

    #[test]
    fn eof_inside_line() {
        expect_http(reader(b"abc", 8).read_crlf_line(1024), HttpError::MalformedLine);
        expect_http(reader(b"abc\r", 8).read_crlf_line(1024), HttpError::MalformedLine);
        expect_http(reader(b"\r", 1).read_crlf_line(1024), HttpError::MalformedLine);
    }

    #[test]
    fn reject_bare_cr_lf() {
        for cap in 1..=8 {
            expect_http(reader(b"ab\rc\r\n", cap).read_crlf_line(1024), HttpError::MalformedLine);
            expect_http(reader(b"ab\nc\r\n", cap).read_crlf_line(1024), HttpError::MalformedLine);
        }
    }

    #[test]
    fn reject_long_line() {
        let data = format!("{}\r\n", "x".repeat(100));
        expect_http(reader(data.as_bytes(), 16).read_crlf_line(99), HttpError::LineTooLong);
        assert_eq!(reader(data.as_bytes(), 16).read_crlf_line(100).unwrap().unwrap().len(), 100);
    }
}
