//! Callback dispatch: the parser's only way of reporting what it has seen.
//!
//! The wire format's hook table is a record of optional callbacks, tried
//! here as a plain trait with no-op default methods — a caller implements
//! only the hooks it cares about. Each hook returns a [`HookResult`]; an
//! `Err` return aborts parsing immediately with [`ParserError::User`],
//! mirroring a non-zero return from the hook table this was distilled from.
//!
//! [`ParserError::User`]: crate::error::ParserError::User

use crate::parser::Parser;

/// `Ok(())` lets parsing continue; `Err(())` aborts it with `ParserError::User`.
pub type HookResult = Result<(), ()>;

/// Callbacks the parser drives while consuming a message. Every method
/// defaults to a no-op, so implementors only override what they need.
#[allow(unused_variables)]
pub trait Hooks {
    /// Fires once the first byte of a new message has been recognized.
    fn on_msg_begin(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// The fully accumulated request method token.
    fn method(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// An absolute-form URI's scheme component (`http`, `https`, ...).
    fn scheme(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// An absolute-form URI's host component.
    fn host(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// The value of a `Host` header, fired alongside `hdr_val` whenever
    /// that header is seen — independent of the URI's own `host` hook,
    /// since an origin-form request target carries no host at all.
    fn hostname(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// An absolute-form URI's port component, as the raw decimal digits.
    fn port(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// The path component of the request target.
    fn path(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// The query-string component of the request target, when present.
    fn args(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// The complete, unparsed request target, exactly as it appeared on
    /// the wire.
    fn uri(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// Fires once the request/status line is complete, before any headers.
    fn on_hdrs_begin(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// A header name, delivered before its matching `hdr_val`.
    fn hdr_key(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// A header value, delivered after its matching `hdr_key`.
    fn hdr_val(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// Fires once the header block's terminating blank line is consumed.
    fn on_hdrs_complete(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// A slice of body bytes, for `Content-Length` and chunked bodies
    /// alike; may fire many times for one body.
    fn body(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        Ok(())
    }

    /// Fires when a new chunk's size line has been parsed.
    fn on_new_chunk(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// Fires once a chunk's data and trailing CRLF have been consumed.
    fn on_chunk_complete(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// Fires at the terminating zero-length chunk's size line, before any
    /// trailer fields are read.
    fn on_chunks_complete(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }

    /// Fires once the entire message is complete.
    fn on_msg_complete(&mut self, p: &Parser) -> HookResult {
        Ok(())
    }
}

/// A [`Hooks`] implementation that observes nothing. Useful when only the
/// accessor surface on [`Parser`] matters, e.g. while probing whether a
/// buffer contains a complete message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl Hooks for NoopHooks {}
