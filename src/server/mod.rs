//! Connection acceptance and the application-facing handler interface.

pub mod handler;
pub mod listener;
pub mod routes;

pub use handler::{Handler, HandlerError};
pub use listener::{CloseHandle, Server};
