//! rawhttp - HTTP/1.1 over raw TCP
//!
//! Incremental request parsing and an ordered response writer, plus a small
//! tokio server around them.

pub mod config;
pub mod http;
pub mod server;
