use thiserror::Error;

use crate::http::headers::find_crlf;
use crate::http::request::RequestLine;

/// The only protocol version this parser accepts.
pub const SUPPORTED_VERSION: &str = "1.1";

/// Errors raised while decoding a request. All of them are fatal for the
/// request being parsed; a short buffer is never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequest(String),

    #[error("invalid or non-uppercase method: {0:?}")]
    UnsupportedMethod(String),

    #[error("invalid request target path: {0:?}")]
    InvalidTarget(String),

    #[error("unsupported protocol version: expected 1.1, got {0}")]
    ProtocolVersion(String),

    #[error("malformed header: {0:?}")]
    MalformedHeader(String),

    #[error("incorrect content length: {0:?}")]
    IncorrectContentLength(String),

    #[error("content length exceeded: expected {expected} bytes, got {actual}")]
    ContentLengthExceeded { expected: usize, actual: usize },
}

/// Token characters allowed in header names (RFC 9110 `tchar`).
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
}

/// Methods are uppercase tokens, e.g. `GET` or `M-SEARCH`.
fn is_method(method: &[u8]) -> bool {
    !method.is_empty() && method.iter().all(|&b| is_token_char(b) && !b.is_ascii_lowercase())
}

/// Parses the request line at the start of `data`.
///
/// Returns `Ok(None)` when no CRLF has arrived yet. On success returns the
/// parsed line along with the number of bytes consumed, CRLF included.
/// The grammar is checked on raw bytes; a target holding non-UTF-8 bytes is
/// accepted and stored lossily.
pub fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let line_end = match find_crlf(data) {
        Some(idx) => idx,
        None => return Ok(None),
    };
    let line = &data[..line_end];

    let parts: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
    let [method, target, protocol] = parts.as_slice() else {
        return Err(ParseError::MalformedRequest(lossy(line)));
    };

    if !is_method(method) {
        return Err(ParseError::UnsupportedMethod(lossy(method)));
    }

    if !target.starts_with(b"/") {
        return Err(ParseError::InvalidTarget(lossy(target)));
    }

    let version = parse_version(protocol)?;
    if version != SUPPORTED_VERSION {
        return Err(ParseError::ProtocolVersion(version));
    }

    let request_line = RequestLine {
        method: lossy(method),
        target: lossy(target),
        version,
    };

    Ok(Some((request_line, line_end + 2)))
}

/// Extracts `<digits>.<digits>` from `HTTP/<digits>.<digits>`.
fn parse_version(protocol: &[u8]) -> Result<String, ParseError> {
    let invalid = || ParseError::ProtocolVersion(lossy(protocol));

    let version = protocol.strip_prefix(b"HTTP/").ok_or_else(invalid)?;
    let dot = version.iter().position(|&b| b == b'.').ok_or_else(invalid)?;
    let (major, minor) = (&version[..dot], &version[dot + 1..]);

    let all_digits = |s: &[u8]| !s.is_empty() && s.iter().all(|b| b.is_ascii_digit());
    if !all_digits(major) || !all_digits(minor) {
        return Err(invalid());
    }

    Ok(lossy(version))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
