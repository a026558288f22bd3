//! Header set.

use std::io::{Write, Result};

use super::{HTTP_HEADER_SP, HTTP_LINE_BREAK};
use crate::error::HttpError;

/// Ordered header set with case-insensitive lookup.
///
/// Inserting a name that is already present replaces its value in place,
/// so serialization keeps the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert a header, returns the replaced value if the name was present.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Get the value of a header, name is case insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    /// Remove a header, returns its value if present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(idx).1)
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parse `name: value` and insert it.
    pub(crate) fn insert_line(&mut self, line: &str) -> std::result::Result<(), HttpError> {
        let (name, value) = line.split_once(':').ok_or(HttpError::Header)?;

        // no whitespace allowed between name and colon,
        // which also rejects obsolete line folding
        if name.is_empty() || !name.bytes().all(is_token) {
            return Err(HttpError::Header);
        }

        self.insert(name, value.trim_matches(|c: char| c == ' ' || c == '\t'));
        Ok(())
    }

    /// Write every header as `name: value CRLF`, in order.
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        for (name, value) in self.iter() {
            w.write_all(name.as_bytes())?;
            w.write_all(HTTP_HEADER_SP)?;
            w.write_all(value.as_bytes())?;
            w.write_all(HTTP_LINE_BREAK)?;
        }
        Ok(())
    }
}

// ref: https://datatracker.ietf.org/doc/html/rfc7230#section-3.2.6
#[inline]
const fn is_token(b: u8) -> bool {
    matches!(b,
        b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
        | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/html");

        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
        assert!(headers.get("content-length").is_none());
    }

    #[test]
    fn last_write_wins() {
        let mut headers = Headers::new();
        headers.insert_line("a: 1").unwrap();
        headers.insert_line("b: 2").unwrap();
        headers.insert_line("A: 3").unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("a"), Some("3"));

        let order: Vec<_> = headers.iter().collect();
        assert_eq!(order, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn parse_lines() {
        let mut headers = Headers::new();
        headers.insert_line("host:www.example.com").unwrap();
        headers.insert_line("x-empty:").unwrap();
        headers.insert_line("x-pad: \t padded \t").unwrap();

        assert_eq!(headers.get("host"), Some("www.example.com"));
        assert_eq!(headers.get("x-empty"), Some(""));
        assert_eq!(headers.get("x-pad"), Some("padded"));

        for bad in ["no colon", ": value", "name : value", " folded: x", "na me: x"] {
            assert_eq!(headers.insert_line(bad), Err(HttpError::Header));
        }
    }

    #[test]
    fn encode_in_order() {
        let mut headers = Headers::new();
        headers.insert("Upgrade", "websocket");
        headers.insert("Connection", "Upgrade");

        let mut buf = Vec::new();
        headers.encode(&mut buf).unwrap();
        assert_eq!(buf, b"Upgrade: websocket\r\nConnection: Upgrade\r\n");
    }

    #[test]
    fn remove_header() {
        let mut headers = Headers::new();
        headers.insert("a", "1");
        assert_eq!(headers.remove("A"), Some("1".to_string()));
        assert!(headers.is_empty());
        assert!(headers.remove("a").is_none());
    }
}
