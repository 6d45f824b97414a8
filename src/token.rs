//! Recognition of the fixed token sets the wire format uses: request
//! methods, URI schemes and the small set of headers the parser gives
//! semantic meaning to.
//!
//! Each recognizer takes a complete accumulated token (already bounds- and
//! byte-checked by the state machine) and matches it against its candidate
//! set in one step. The match expressions below are discriminated by the
//! compiler on slice length before content, the same two-phase comparison
//! the wire format's token tables describe, without hand-unrolling it.

use std::fmt;

/// Request methods recognized on the wire, plus `Unknown` for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Mkcol,
    Copy,
    Move,
    Options,
    Propfind,
    Proppatch,
    Lock,
    Unlock,
    Trace,
    Connect,
    Patch,
    #[default]
    Unknown,
}

impl HttpMethod {
    pub fn recognize(token: &[u8]) -> HttpMethod {
        match token {
            b"GET" => HttpMethod::Get,
            b"HEAD" => HttpMethod::Head,
            b"POST" => HttpMethod::Post,
            b"PUT" => HttpMethod::Put,
            b"DELETE" => HttpMethod::Delete,
            b"MKCOL" => HttpMethod::Mkcol,
            b"COPY" => HttpMethod::Copy,
            b"MOVE" => HttpMethod::Move,
            b"OPTIONS" => HttpMethod::Options,
            b"PROPFIND" => HttpMethod::Propfind,
            b"PROPPATCH" => HttpMethod::Proppatch,
            b"LOCK" => HttpMethod::Lock,
            b"UNLOCK" => HttpMethod::Unlock,
            b"TRACE" => HttpMethod::Trace,
            b"CONNECT" => HttpMethod::Connect,
            b"PATCH" => HttpMethod::Patch,
            _ => HttpMethod::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Mkcol => "MKCOL",
            HttpMethod::Copy => "COPY",
            HttpMethod::Move => "MOVE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Propfind => "PROPFIND",
            HttpMethod::Proppatch => "PROPPATCH",
            HttpMethod::Lock => "LOCK",
            HttpMethod::Unlock => "UNLOCK",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A valid method character is an uppercase letter or underscore — the
/// wire format has no lowercase or WebDAV-extension methods outside the
/// fixed set above.
#[inline]
pub(crate) fn is_method_char(ch: u8) -> bool {
    ch.is_ascii_uppercase() || ch == b'_'
}

/// URI schemes recognized in absolute-form request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    #[default]
    None,
    Ftp,
    Http,
    Https,
    Nfs,
    Unknown,
}

impl Scheme {
    pub fn recognize(token: &[u8]) -> Scheme {
        match token {
            b"ftp" => Scheme::Ftp,
            b"http" => Scheme::Http,
            b"https" => Scheme::Https,
            b"nfs" => Scheme::Nfs,
            _ => Scheme::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::None => "",
            Scheme::Ftp => "ftp",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Nfs => "nfs",
            Scheme::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The small set of headers the parser attaches semantics to. Every other
/// header name still reaches `hdr_key`/`hdr_val` hooks unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum HeaderEval {
    #[default]
    None,
    Host,
    Connection,
    ProxyConnection,
    ContentLength,
    TransferEncoding,
    ContentType,
}

impl HeaderEval {
    /// Classifies a header name case-insensitively against the six headers
    /// the parser treats specially.
    pub(crate) fn classify(name: &[u8]) -> HeaderEval {
        if name.eq_ignore_ascii_case(b"host") {
            HeaderEval::Host
        } else if name.eq_ignore_ascii_case(b"connection") {
            HeaderEval::Connection
        } else if name.eq_ignore_ascii_case(b"proxy-connection") {
            HeaderEval::ProxyConnection
        } else if name.eq_ignore_ascii_case(b"content-length") {
            HeaderEval::ContentLength
        } else if name.eq_ignore_ascii_case(b"transfer-encoding") {
            HeaderEval::TransferEncoding
        } else if name.eq_ignore_ascii_case(b"content-type") {
            HeaderEval::ContentType
        } else {
            HeaderEval::None
        }
    }
}

/// Why [`decode_decimal_u64`] rejected a token — distinguished so a caller
/// can tell a malformed `Content-Length` (`invalid_header`) from one that
/// overflows capacity (`too_big`), per the taxonomy's two different error
/// kinds for the same header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecimalError {
    Empty,
    NonDigit,
    /// Either more than 20 digits, or the value itself overflows `u64` —
    /// `u64::MAX` is exactly 20 digits, so a 21-digit string is already
    /// guaranteed to overflow and is rejected without multiplying it out.
    Overflow,
}

/// Decodes an unsigned decimal token (used for `Content-Length`).
pub(crate) fn decode_decimal_u64(token: &[u8]) -> Result<u64, DecimalError> {
    if token.is_empty() {
        return Err(DecimalError::Empty);
    }
    if token.len() > 20 {
        return Err(DecimalError::Overflow);
    }
    let mut value: u64 = 0;
    for &b in token {
        if !b.is_ascii_digit() {
            return Err(DecimalError::NonDigit);
        }
        let digit = (b - b'0') as u64;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or(DecimalError::Overflow)?;
    }
    Ok(value)
}
