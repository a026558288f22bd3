//! Request-target decoding.
//!
//! Stateless helpers: split a target into path and query, then
//! percent-decode path segments and query pairs.

use crate::error::HttpError;

/// Split a request-target at the first `?`.
/// The query is empty if there is none.
#[inline]
pub fn split_target(target: &str) -> (&str, &str) { target.split_once('?').unwrap_or((target, "")) }

#[inline]
const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode(s: &str, plus_as_space: bool) -> Result<String, HttpError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_value);
                let lo = bytes.get(i + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                    _ => return Err(HttpError::PercentEncoding),
                }
                i += 3;
            }
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| HttpError::PercentEncoding)
}

/// Decode `%XX` escapes.
#[inline]
pub fn percent_decode(s: &str) -> Result<String, HttpError> { decode(s, false) }

/// Split a path on `/` and decode each segment.
/// Empty segments, such as the one before the leading `/`, are skipped.
pub fn path_segments(path: &str) -> Result<Vec<String>, HttpError> {
    path.split('/')
        .filter(|seg| !seg.is_empty())
        .map(percent_decode)
        .collect()
}

/// Split a query on `&` into decoded `key=value` pairs, `+` stands for a space.
/// A pair without `=` has an empty value. Duplicate keys are all kept, in order.
pub fn query_pairs(query: &str) -> Result<Vec<(String, String)>, HttpError> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(key, true)?, decode(value, true)?))
        })
        .collect()
}
