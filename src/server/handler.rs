use std::future::Future;

use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::response::{default_headers, StatusCode};
use crate::http::writer::{ResponseWriter, WriterError};

/// A failure reported by a [`Handler`], rendered as a minimal plain-text
/// response when nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InternalServerError, message)
    }

    /// Writes status line, default headers and the message as body.
    pub async fn render<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), WriterError>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_status_line(self.status).await?;
        writer.write_headers(&default_headers(self.message.len())).await?;
        writer.write_body(self.message.as_bytes()).await?;
        Ok(())
    }
}

impl From<WriterError> for HandlerError {
    fn from(err: WriterError) -> Self {
        HandlerError::internal(err.to_string())
    }
}

/// Application logic invoked once per fully parsed request.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}
