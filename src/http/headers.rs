//! Header field storage and the incremental header line parser.

use std::collections::HashMap;
use std::fmt;

use crate::http::parser::{is_token_char, ParseError};

const CRLF: &[u8] = b"\r\n";

/// HTTP header fields keyed by lowercase name.
///
/// A name that appears more than once while parsing keeps a single entry
/// whose values are joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the next header line from `data`.
    ///
    /// Returns the number of bytes consumed and whether the header section
    /// has ended. When `data` does not yet hold a full line, nothing is
    /// consumed and no error is reported; call again once more bytes are
    /// available.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::headers::Headers;
    /// let mut headers = Headers::new();
    /// let (consumed, done) = headers.parse(b"Host: localhost:42069\r\n\r\n").unwrap();
    ///
    /// assert_eq!(consumed, 23);
    /// assert!(!done);
    /// assert_eq!(headers.get("HOST"), Some("localhost:42069"));
    /// ```
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let line_end = match find_crlf(data) {
            Some(idx) => idx,
            None => return Ok((0, false)),
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let (name, value) = parse_field_line(&data[..line_end])?;

        self.append(name, value);
        Ok((line_end + CRLF.len(), false))
    }

    /// Looks up a header value. The name is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(|v| v.as_str())
    }

    /// Sets a header, replacing any existing value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.fields.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Removes a header, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
        fields.into_iter()
    }

    fn append(&mut self, name: String, value: String) {
        match self.fields.get_mut(&name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Headers:\n- (none)");
        }
        f.write_str("Headers:\n")?;
        for (name, value) in self.iter() {
            writeln!(f, "- {}: {}", name, value)?;
        }
        Ok(())
    }
}

/// Renders a lowercase header name in its conventional wire form,
/// e.g. `content-type` becomes `Content-Type`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

fn trim_blank(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

/// Splits `Name: Value` into a lowercase name and a trimmed value.
///
/// The name must be a token; the value may hold any bytes and is stored
/// lossily when it is not UTF-8.
fn parse_field_line(line: &[u8]) -> Result<(String, String), ParseError> {
    let trimmed = trim_blank(line);
    let malformed = || ParseError::MalformedHeader(String::from_utf8_lossy(trimmed).into_owned());

    let colon = trimmed.iter().position(|&b| b == b':').ok_or_else(malformed)?;
    let (name, value) = (&trimmed[..colon], &trimmed[colon + 1..]);
    if name.is_empty() || !name.iter().all(|&b| is_token_char(b)) {
        return Err(malformed());
    }

    Ok((
        String::from_utf8_lossy(name).to_ascii_lowercase(),
        String::from_utf8_lossy(trim_blank(value)).into_owned(),
    ))
}
