use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::{canonical_name, Headers};
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Progress of a [`ResponseWriter`] through one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Start,
    StatusWritten,
    HeadersWritten,
    BodyWritten,
    ChunkedInProgress,
    Done,
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("response writer called out of order: cannot {operation} in state {state:?}")]
    InvalidWriterState {
        operation: &'static str,
        state: WriterState,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes one response to a sink, in order.
///
/// The accepted call sequences are:
///
/// ```text
/// status → headers → body*
/// status → headers → chunk* → chunked_body_done
/// status → headers → chunk* → trailers
/// ```
///
/// A call made out of sequence fails with
/// [`WriterError::InvalidWriterState`] and writes nothing.
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::Start,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriterError> {
        self.expect("write status line", &[WriterState::Start])?;

        let line = format!("{} {} {}\r\n", HTTP_VERSION, status.as_u16(), status.reason_phrase());
        self.sink.write_all(line.as_bytes()).await?;

        self.state = WriterState::StatusWritten;
        Ok(())
    }

    /// Writes every header line followed by the blank line ending the
    /// header section.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriterError> {
        self.expect("write headers", &[WriterState::StatusWritten])?;

        let mut buf = serialize_fields(headers);
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;

        self.state = WriterState::HeadersWritten;
        Ok(())
    }

    /// Writes raw body bytes. May be called any number of times.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriterError> {
        self.expect("write body", &[WriterState::HeadersWritten, WriterState::BodyWritten])?;

        self.sink.write_all(body).await?;

        self.state = WriterState::BodyWritten;
        Ok(body.len())
    }

    /// Writes one chunk: `<hex len>\r\n<bytes>\r\n`.
    ///
    /// An empty `chunk` produces `0\r\n\r\n`, which a client reads as the end
    /// of the body; use [`ResponseWriter::write_chunked_body_done`] instead.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriterError> {
        self.expect(
            "write chunked body",
            &[WriterState::HeadersWritten, WriterState::ChunkedInProgress],
        )?;

        let mut buf = Vec::with_capacity(chunk.len() + 12);
        buf.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        buf.extend_from_slice(chunk);
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;

        self.state = WriterState::ChunkedInProgress;
        Ok(chunk.len())
    }

    /// Writes the terminating zero-length chunk with no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, WriterError> {
        self.expect(
            "finish chunked body",
            &[WriterState::HeadersWritten, WriterState::ChunkedInProgress],
        )?;

        const TERMINATOR: &[u8] = b"0\r\n\r\n";
        self.sink.write_all(TERMINATOR).await?;

        self.state = WriterState::Done;
        Ok(TERMINATOR.len())
    }

    /// Writes the terminating zero-length chunk followed by trailer fields.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriterError> {
        self.expect(
            "write trailers",
            &[WriterState::HeadersWritten, WriterState::ChunkedInProgress],
        )?;

        let mut buf = b"0\r\n".to_vec();
        buf.extend_from_slice(&serialize_fields(trailers));
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;

        self.state = WriterState::Done;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriterError> {
        self.sink.flush().await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn expect(&self, operation: &'static str, allowed: &[WriterState]) -> Result<(), WriterError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            tracing::debug!(operation, state = ?self.state, "response writer misuse");
            Err(WriterError::InvalidWriterState {
                operation,
                state: self.state,
            })
        }
    }
}

fn serialize_fields(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, value) in headers.iter() {
        buf.extend_from_slice(canonical_name(name).as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}
