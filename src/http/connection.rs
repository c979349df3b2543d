use std::sync::Arc;

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::ParseError;
use crate::http::request::{ParserState, Request};
use crate::http::writer::{ResponseWriter, WriterState};
use crate::server::handler::{Handler, HandlerError};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("HTTP parse error: {0}")]
    Parse(#[from] ParseError),

    /// The peer closed the stream after sending part of a request.
    #[error("connection closed before request completed (stopped in {state:?})")]
    Incomplete {
        state: ParserState,
        request: Box<Request>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads one request from `reader`.
///
/// Bytes are read into a `buffer_size` scratch buffer, accumulated, and fed
/// to the parser until the request is complete. Returns `Ok(None)` when the
/// stream ends before any byte arrives.
pub async fn read_request<R>(reader: &mut R, buffer_size: usize) -> Result<Option<Request>, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut pending = BytesMut::with_capacity(buffer_size);
    let mut scratch = vec![0u8; buffer_size.max(1)];
    let mut received = 0usize;

    loop {
        let n = reader.read(&mut scratch).await?;

        if n == 0 {
            if received == 0 {
                return Ok(None);
            }
            return Err(ReadError::Incomplete {
                state: request.state(),
                request: Box::new(request),
            });
        }

        received += n;
        pending.extend_from_slice(&scratch[..n]);

        let consumed = request.parse_all(&pending)?;
        pending.advance(consumed);

        if request.is_done() {
            if !pending.is_empty() {
                tracing::debug!(discarded = pending.len(), "ignoring bytes after complete request");
            }
            return Ok(Some(request));
        }
    }
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Closed,
}

/// Serves exactly one request over `stream`.
pub struct Connection<S, H> {
    stream: S,
    handler: Arc<H>,
    read_buffer_size: usize,
    state: ConnectionState,
}

impl<S, H> Connection<S, H>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    pub fn new(stream: S, handler: Arc<H>, read_buffer_size: usize) -> Self {
        Self {
            stream,
            handler,
            read_buffer_size,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match read_request(&mut self.stream, self.read_buffer_size).await {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(ReadError::Parse(e)) => {
                            tracing::warn!(error = %e, "rejecting malformed request");
                            let mut writer = ResponseWriter::new(&mut self.stream);
                            HandlerError::bad_request(format!("{}\n", e))
                                .render(&mut writer)
                                .await?;
                            writer.flush().await?;
                            ConnectionState::Closed
                        }
                        Err(e @ ReadError::Incomplete { .. }) => {
                            tracing::debug!(error = %e, "dropping truncated request");
                            ConnectionState::Closed
                        }
                        Err(e) => return Err(e.into()),
                    };
                }

                ConnectionState::Processing(req) => {
                    self.respond(&req).await?;
                }

                ConnectionState::Closed => break,
            }
        }

        self.stream.shutdown().await?;
        Ok(())
    }

    async fn respond(&mut self, req: &Request) -> anyhow::Result<()> {
        tracing::info!(method = req.method(), target = req.target(), "handling request");

        let mut writer = ResponseWriter::new(&mut self.stream);

        if let Err(err) = self.handler.handle(&mut writer, req).await {
            if writer.state() == WriterState::Start {
                tracing::info!(
                    status = err.status.as_u16(),
                    message = %err.message,
                    "handler returned error"
                );
                err.render(&mut writer).await?;
            } else {
                tracing::warn!(
                    status = err.status.as_u16(),
                    message = %err.message,
                    state = ?writer.state(),
                    "handler failed after response started"
                );
            }
        }

        writer.flush().await?;
        Ok(())
    }
}
