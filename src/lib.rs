//! # httpweave
//!
//! A **strict, incremental HTTP/1.x message parser** implemented as a byte
//! driven state machine, designed for use both as a Rust library and as a
//! CLI tool.
//!
//! httpweave processes HTTP requests and responses incrementally
//! (byte-by-byte or in arbitrarily-sized chunks) against a fixed 8192-byte
//! scratch buffer — there is no heap allocation anywhere in the parser
//! itself. Structural elements are reported through a [`Hooks`]
//! implementation as they are recognized, rather than collected into an
//! owned value, so the crate's core never buffers a message.
//!
//! ## Quick start — one-shot parsing
//!
//! ```rust
//! use httpweave::parse_request;
//!
//! let raw = b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let message = parse_request(raw).expect("valid request");
//! assert_eq!(message.method.as_deref(), Some("GET"));
//! assert_eq!(message.uri.as_deref(), Some("/hello"));
//! ```
//!
//! ## Quick start — incremental parsing with your own hooks
//!
//! ```rust
//! use httpweave::{Hooks, NoopHooks, Parser, ParserType};
//!
//! let mut parser = Parser::new(ParserType::Request);
//! let mut hooks = NoopHooks;
//!
//! parser.feed(&mut hooks, b"GET / HTTP/1.1\r\n");
//! assert!(!parser.is_complete());
//!
//! parser.feed(&mut hooks, b"Host: example.com\r\n\r\n");
//! assert!(parser.is_complete());
//! ```

mod classify;
mod error;
mod hooks;
mod output;
mod parser;
mod token;
mod types;

use std::fmt;

pub use error::ParserError;
pub use hooks::{HookResult, Hooks, NoopHooks};
pub use output::{format_debug, format_headers_only, format_json, Collector, HttpMessage};
pub use parser::{Parser, SCRATCH_BUF_SIZE};
pub use token::{HttpMethod, Scheme};
pub use types::{Header, HttpVersion, ParserType};

/// Why a one-shot [`parse_request`]/[`parse_response`] call failed.
///
/// The core [`Parser`] never returns a `Result` from [`Parser::feed`] —
/// its external contract is a plain consumed-byte count, with errors
/// queried separately via [`Parser::error`] — but a helper promising a
/// *complete* message in one call needs to distinguish "malformed" from
/// "well-formed so far, but truncated", so this wraps both outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotError {
    /// The input parsed validly but ended before the message did.
    Incomplete,
    /// The parser reported a concrete error.
    Parser(ParserError),
}

impl fmt::Display for OneShotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneShotError::Incomplete => f.write_str("httpweave_error_incomplete"),
            OneShotError::Parser(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for OneShotError {}

impl From<ParserError> for OneShotError {
    fn from(e: ParserError) -> Self {
        OneShotError::Parser(e)
    }
}

fn parse_complete(typ: ParserType, data: &[u8]) -> Result<HttpMessage, OneShotError> {
    let mut parser = Parser::new(typ);
    let mut collector = Collector::new();
    parser.feed(&mut collector, data);

    let err = parser.error();
    if !err.is_none() {
        return Err(err.into());
    }
    if !parser.is_complete() {
        return Err(OneShotError::Incomplete);
    }
    Ok(collector.take_message())
}

/// Parse a **complete** HTTP request from a byte slice in one call.
///
/// This is a convenience wrapper around [`Parser`] and [`Collector`]. For
/// incremental or streaming use, drive a `Parser` with your own [`Hooks`]
/// implementation directly.
///
/// # Errors
///
/// Returns [`OneShotError`] if the data is malformed, or well-formed but
/// incomplete.
pub fn parse_request(data: &[u8]) -> Result<HttpMessage, OneShotError> {
    parse_complete(ParserType::Request, data)
}

/// Parse a **complete** HTTP response from a byte slice in one call. See
/// [`parse_request`] for the request-side equivalent.
///
/// # Errors
///
/// Returns [`OneShotError`] if the data is malformed, or well-formed but
/// incomplete.
pub fn parse_response(data: &[u8]) -> Result<HttpMessage, OneShotError> {
    parse_complete(ParserType::Response, data)
}
