use crate::http::headers::Headers;
use crate::http::parser::{parse_request_line, ParseError};

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Uppercase method token, e.g. `GET`
    pub method: String,
    /// Request target, always starting with `/`
    pub target: String,
    /// Protocol version without the `HTTP/` prefix
    pub version: String,
}

/// Progress of a [`Request`] through the parser.
///
/// States only ever move forward:
///
/// ```text
/// Initialized → ParsingHeaders → ParsingBody → Done
///                      └──────────────────────↗
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl ParserState {
    /// Whether the parser may move from `self` to `next` in one step.
    pub fn can_transition_to(self, next: ParserState) -> bool {
        use ParserState::*;
        matches!(
            (self, next),
            (Initialized, ParsingHeaders)
                | (ParsingHeaders, ParsingBody)
                | (ParsingHeaders, Done)
                | (ParsingBody, Done)
        )
    }
}

/// An HTTP request, built up in place as bytes arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    state: ParserState,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            state: ParserState::Initialized,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Retrieves a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Advances the parser by at most one state transition.
    ///
    /// `data` is everything received so far that has not been consumed yet.
    /// Returns how many bytes of it were consumed; `0` means more input is
    /// needed (or the request is already done). The caller drops the
    /// consumed prefix before calling again.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => match parse_request_line(data)? {
                Some((request_line, consumed)) => {
                    self.request_line = request_line;
                    self.advance(ParserState::ParsingHeaders);
                    Ok(consumed)
                }
                None => Ok(0),
            },

            ParserState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse(data)?;
                if done {
                    match self.content_length()? {
                        Some(len) if len > 0 => self.advance(ParserState::ParsingBody),
                        _ => self.advance(ParserState::Done),
                    }
                }
                Ok(consumed)
            }

            ParserState::ParsingBody => {
                let expected = self.content_length()?.unwrap_or(0);
                self.body.extend_from_slice(data);

                if self.body.len() > expected {
                    return Err(ParseError::ContentLengthExceeded {
                        expected,
                        actual: self.body.len(),
                    });
                }
                if self.body.len() == expected {
                    self.advance(ParserState::Done);
                }
                Ok(data.len())
            }

            ParserState::Done => Ok(0),
        }
    }

    /// Runs [`Request::parse`] repeatedly over `data` until no further
    /// progress is possible, returning the total number of bytes consumed.
    pub fn parse_all(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        while !self.is_done() {
            let consumed = self.parse(&data[total..])?;
            if consumed == 0 {
                break;
            }
            total += consumed;
        }
        Ok(total)
    }

    /// Declared body length, read from the headers each time it is needed.
    ///
    /// `None` when the header is absent; an error unless the value is
    /// `1*DIGIT` and fits a `usize`.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        let Some(raw) = self.headers.get("content-length") else {
            return Ok(None);
        };
        let incorrect = || ParseError::IncorrectContentLength(raw.to_string());

        let digits = raw.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(incorrect());
        }
        digits.parse::<usize>().map(Some).map_err(|_| incorrect())
    }

    fn advance(&mut self, next: ParserState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal parser transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(from = ?self.state, to = ?next, "parser state transition");
        self.state = next;
    }
}
