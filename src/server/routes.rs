//! Demo routes served by the `rawhttp` binary.

use tokio::io::AsyncWrite;

use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::response::{default_headers, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::handler::{Handler, HandlerError};

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const SERVER_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const SUCCESS_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

/// Upper bound on `/stream/<n>`.
pub const MAX_STREAM_CHUNKS: usize = 100;

/// Routes:
///
/// - `/yourproblem` → 400 page
/// - `/myproblem` → 500 page
/// - `/stream/<n>` → `n` chunks sent with chunked encoding, then trailers
/// - anything else → 200 page
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoHandler;

impl Handler for DemoHandler {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = request.target();

        if let Some(count) = target.strip_prefix("/stream/") {
            let count: usize = count
                .parse()
                .map_err(|_| HandlerError::bad_request(format!("invalid chunk count: {}\n", count)))?;
            if count > MAX_STREAM_CHUNKS {
                return Err(HandlerError::bad_request(format!(
                    "chunk count must be at most {}\n",
                    MAX_STREAM_CHUNKS
                )));
            }
            return stream_chunks(writer, count).await;
        }

        let (status, page) = match target {
            "/yourproblem" => (StatusCode::BadRequest, BAD_REQUEST_PAGE),
            "/myproblem" => (StatusCode::InternalServerError, SERVER_ERROR_PAGE),
            _ => (StatusCode::Ok, SUCCESS_PAGE),
        };

        let mut headers = default_headers(page.len());
        headers.set("Content-Type", "text/html");

        writer.write_status_line(status).await?;
        writer.write_headers(&headers).await?;
        writer.write_body(page.as_bytes()).await?;
        Ok(())
    }
}

async fn stream_chunks<W>(writer: &mut ResponseWriter<W>, count: usize) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    writer.write_status_line(StatusCode::Ok).await?;
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for i in 0..count {
        let chunk = format!("chunk {}\n", i);
        total += writer.write_chunked_body(chunk.as_bytes()).await?;
    }

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", total.to_string());
    writer.write_trailers(&trailers).await?;
    Ok(())
}
