//! Message heads and the connection-level reader.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, ErrorKind};

use log::trace;

use super::{Body, BodyDecoder, ChunkedDecoder, LengthDecoder, Headers};
use super::header_names::{CONTENT_LENGTH, TRANSFER_ENCODING, COOKIE};
use super::uri;

use crate::line::ReadLine;
use crate::config::Config;
use crate::error::{Error, HttpError};

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    pub const fn as_str(&self) -> &'static str {
        use Method::*;
        match self {
            Get => "GET",
            Head => "HEAD",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Connect => "CONNECT",
            Options => "OPTIONS",
            Trace => "TRACE",
            Patch => "PATCH",
        }
    }
}

impl TryFrom<&str> for Method {
    type Error = HttpError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use Method::*;
        let method = match value {
            "GET" => Get,
            "HEAD" => Head,
            "POST" => Post,
            "PUT" => Put,
            "DELETE" => Delete,
            "CONNECT" => Connect,
            "OPTIONS" => Options,
            "TRACE" => Trace,
            "PATCH" => Patch,
            _ => return Err(HttpError::Method),
        };
        Ok(method)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Parsed request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Raw request-target, path and query.
    pub target: String,
    pub version: String,
    pub headers: Headers,
}

impl Request {
    /// Path part of the target, not decoded.
    #[inline]
    pub fn path(&self) -> &str { uri::split_target(&self.target).0 }

    /// Raw query string, empty if the target has none.
    #[inline]
    pub fn query(&self) -> &str { uri::split_target(&self.target).1 }

    /// Decoded, non-empty path segments.
    pub fn path_segments(&self) -> Result<Vec<String>, HttpError> { uri::path_segments(self.path()) }

    /// Decoded query pairs, in order, duplicates kept.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, HttpError> { uri::query_pairs(self.query()) }

    /// Decoded query pairs, the first occurrence of a key wins.
    pub fn query_map(&self) -> Result<HashMap<String, String>, HttpError> {
        let mut map = HashMap::new();
        for (key, value) in self.query_pairs()? {
            map.entry(key).or_insert(value);
        }
        Ok(map)
    }

    /// `name=value` pairs of the cookie header.
    pub fn cookies(&self) -> Vec<(&str, &str)> {
        self.headers
            .get(COOKIE)
            .map(|cookie| {
                cookie
                    .split(';')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(|c| c.split_once('=').unwrap_or((c, "")))
                    .map(|(n, v)| (n.trim(), v.trim()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Parsed response head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
}

impl Response {
    /// 1xx, 204 and 304 responses never carry a body.
    #[inline]
    pub const fn has_body(&self) -> bool {
        !matches!(self.status, 100..=199 | 204 | 304)
    }
}

fn check_version(version: &str) -> Result<(), HttpError> {
    match version {
        "HTTP/1.1" | "HTTP/1.0" => Ok(()),
        _ => Err(HttpError::Version),
    }
}

// METHOD SP request-target SP version
fn parse_request_line(line: &str) -> Result<(Method, &str, &str), HttpError> {
    let mut parts = line.split(' ');

    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v), None) if !t.is_empty() => (m, t, v),
        _ => return Err(HttpError::StartLine),
    };

    let method = Method::try_from(method)?;
    check_version(version)?;

    Ok((method, target, version))
}

// version SP status-code SP [ reason-phrase ]
fn parse_status_line(line: &str) -> Result<(&str, u16, &str), HttpError> {
    let mut parts = line.splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    check_version(version)?;

    let code = parts.next().unwrap_or_default();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::StartLine);
    }
    let status = code.parse().map_err(|_| HttpError::StartLine)?;

    Ok((version, status, parts.next().unwrap_or_default()))
}

fn content_length(headers: &Headers) -> Result<Option<u64>, HttpError> {
    let value = match headers.get(CONTENT_LENGTH) {
        Some(v) => v,
        None => return Ok(None),
    };

    // digits only: no sign, no spaces
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::InvalidContentLength);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| HttpError::InvalidContentLength)
}

fn is_chunked(headers: &Headers) -> bool {
    headers
        .get(TRANSFER_ENCODING)
        .and_then(|te| te.rsplit(',').next())
        .map_or(false, |last| last.trim().eq_ignore_ascii_case("chunked"))
}

fn body_decoder(headers: &Headers, config: &Config) -> Result<BodyDecoder, HttpError> {
    if let Some(length) = content_length(headers)? {
        return Ok(BodyDecoder::Length(LengthDecoder::new(length)));
    }

    if is_chunked(headers) {
        return Ok(BodyDecoder::Chunked(ChunkedDecoder::new(config)));
    }

    Ok(BodyDecoder::Empty)
}

/// Reads consecutive messages from one connection.
///
/// Any parse error leaves the source at an unknown position,
/// the connection should be dropped.
pub struct HttpReader<R> {
    io: R,
    body: BodyDecoder,
    config: Config,
}

impl<R> HttpReader<R> {
    /// Constructor, with default limits.
    #[inline]
    pub fn new(io: R) -> Self { Self::with_config(io, Config::new()) }

    #[inline]
    pub fn with_config(io: R, config: Config) -> Self {
        Self {
            io,
            body: BodyDecoder::Empty,
            config,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &R { &self.io }

    #[inline]
    pub fn get_mut(&mut self) -> &mut R { &mut self.io }

    /// Return the underlying source, including anything it has buffered
    /// beyond the last message head.
    #[inline]
    pub fn into_inner(self) -> R { self.io }
}

impl<R: BufRead> HttpReader<R> {
    /// Parse the next request head.
    /// Returns `Ok(None)` if the connection is closed before it starts.
    pub fn read_request(&mut self) -> Result<Option<Request>, Error> {
        let line = match self.next_start_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        let (method, target, version) = parse_request_line(&line)?;
        let headers = self.read_headers()?;
        self.body = body_decoder(&headers, &self.config)?;

        trace!("http: request {} {}, body {:?}", method, target, self.body.remaining());

        Ok(Some(Request {
            method,
            target: target.to_string(),
            version: version.to_string(),
            headers,
        }))
    }

    /// Parse the next response head.
    /// Returns `Ok(None)` if the connection is closed before it starts.
    pub fn read_response(&mut self) -> Result<Option<Response>, Error> {
        let line = match self.next_start_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        let (version, status, reason) = parse_status_line(&line)?;
        let headers = self.read_headers()?;

        let response = Response {
            version: version.to_string(),
            status,
            reason: reason.to_string(),
            headers,
        };

        self.body = if response.has_body() {
            body_decoder(&response.headers, &self.config)?
        } else {
            BodyDecoder::Empty
        };

        trace!("http: response {}, body {:?}", status, self.body.remaining());

        Ok(Some(response))
    }

    /// Body of the most recent message.
    #[inline]
    pub fn body(&mut self) -> Body<'_, R> { Body::new(&mut self.io, &mut self.body) }

    /// Drain the unread part of the current body, returns the number of
    /// discarded bytes.
    pub fn finish_body(&mut self) -> Result<u64, Error> {
        let n = self.body.drain(&mut self.io)?;
        if n != 0 {
            trace!("http: discarded {} unread body bytes", n);
        }
        Ok(n)
    }

    fn next_start_line(&mut self) -> Result<Option<String>, Error> {
        // keep the source aligned with the next message
        self.finish_body()?;
        self.io.read_crlf_line(self.config.max_line_len)
    }

    fn read_headers(&mut self) -> Result<Headers, Error> {
        let mut headers = Headers::new();
        let mut count = 0;

        loop {
            let line = self
                .io
                .read_crlf_line(self.config.max_line_len)?
                .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "connection closed inside a message head"))?;

            if line.is_empty() {
                return Ok(headers);
            }

            count += 1;
            if count > self.config.max_headers {
                return Err(HttpError::Header.into());
            }

            headers.insert_line(&line)?;
        }
    }
}
