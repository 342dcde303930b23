//! Incremental HTTP/1.1 request parsing.
//!
//! [`parse_http_request`] works on whatever bytes the connection has buffered
//! so far and reports [`ParseError::Incomplete`] until a whole request,
//! body included, is available.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::http::request::{Method, Request};

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidMethod => "unsupported method",
            ParseError::InvalidHeader => "malformed header field",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::Incomplete => "incomplete request",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for ParseError {}

struct RequestLine<'a> {
    method: Method,
    target: &'a str,
    version: &'a str,
}

/// Parses one request off the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, so pipelined
/// requests can be drained one at a time.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let head_len = buf
        .windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .ok_or(ParseError::Incomplete)?;

    let head = std::str::from_utf8(&buf[..head_len]).map_err(|_| ParseError::InvalidRequest)?;
    let (line, fields) = head.split_once("\r\n").unwrap_or((head, ""));

    let line = parse_request_line(line)?;
    let headers = parse_headers(fields)?;

    let body_start = head_len + HEAD_TERMINATOR.len();
    let body_end = body_start + content_length(&headers)?;
    let body = buf.get(body_start..body_end).ok_or(ParseError::Incomplete)?;

    let (path, query) = split_target(line.target);
    let request = Request {
        method: line.method,
        path,
        query,
        version: line.version.to_string(),
        headers,
        body: body.to_vec(),
    };
    Ok((request, body_end))
}

/// Splits a request target at `?`.
///
/// The path is percent-decoded for routing; malformed escapes are kept
/// verbatim. The query stays raw and is decoded per key on access.
pub fn split_target(target: &str) -> (String, Option<String>) {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (target, None),
    };
    let path = percent_decode_str(path).decode_utf8_lossy().into_owned();
    (path, query)
}

fn parse_request_line(line: &str) -> Result<RequestLine<'_>, ParseError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequest);
    };

    if !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }
    let method = Method::from_str(method).ok_or(ParseError::InvalidMethod)?;

    Ok(RequestLine { method, target, version })
}

fn parse_headers(fields: &str) -> Result<HashMap<String, String>, ParseError> {
    fields
        .split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseError::InvalidHeader);
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn content_length(headers: &HashMap<String, String>) -> Result<usize, ParseError> {
    match headers.iter().find(|(k, _)| k.eq_ignore_ascii_case("Content-Length")) {
        Some((_, v)) => v.parse().map_err(|_| ParseError::InvalidContentLength),
        None => Ok(0),
    }
}
