//! HTTP/1.1 protocol implementation.
//!
//! Requests are decoded incrementally: bytes may arrive in any split, and the
//! parser picks up where it left off on every call. Responses are written
//! through a writer that refuses out-of-order calls.
//!
//! # Architecture
//!
//! - **`headers`**: header storage and the one-line-at-a-time header parser
//! - **`parser`**: request-line grammar and the parse error taxonomy
//! - **`request`**: the request being built and its parser state machine
//! - **`connection`**: the read loop and the per-connection state machine
//! - **`response`**: status codes and default response headers
//! - **`writer`**: the ordered response writer, including chunked bodies
//!
//! # Request Parser State Machine
//!
//! ```text
//!        ┌─────────────────┐
//!        │   Initialized   │ ← Wait for the request line
//!        └────────┬────────┘
//!                 │ CRLF found, line valid
//!                 ▼
//!        ┌─────────────────┐
//!        │ ParsingHeaders  │ ← One header line per call
//!        └────────┬────────┘
//!                 │ Blank line
//!                 ├─ No Content-Length (or 0) → Done
//!                 ▼
//!        ┌─────────────────┐
//!        │   ParsingBody   │ ← Accumulate until Content-Length bytes
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │      Done       │
//!        └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rawhttp::http::connection::read_request;
//! use rawhttp::http::response::{default_headers, StatusCode};
//! use rawhttp::http::writer::ResponseWriter;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:42069").await?;
//!     let (mut socket, _addr) = listener.accept().await?;
//!
//!     if let Some(req) = read_request(&mut socket, 1024).await? {
//!         let body = format!("you asked for {}\n", req.target());
//!         let mut writer = ResponseWriter::new(&mut socket);
//!         writer.write_status_line(StatusCode::Ok).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body.as_bytes()).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
