//! Stable, named parser error taxonomy.
//!
//! Every variant maps to a canonical `httpweave_error_<name>` identifier
//! string, independent of target endianness or build configuration, so a
//! caller can log or match on the error by name rather than by enum
//! discriminant.

use std::fmt;

/// Why a [`crate::parser::Parser`] stopped making progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserError {
    /// No error; parsing is proceeding or has completed normally.
    #[default]
    None,
    /// A token exceeded the 8192-byte scratch buffer.
    TooBig,
    /// The request method is not a recognized token.
    InvalidMethod,
    /// The request line is malformed.
    InvalidRequestLine,
    /// An absolute-form URI's scheme is not recognized or malformed.
    InvalidSchema,
    /// The status line (response) is malformed.
    InvalidProtocol,
    /// The HTTP version token is malformed.
    InvalidVersion,
    /// A header line is malformed.
    InvalidHeader,
    /// A chunk-size line is malformed or overflowed.
    InvalidChunkSize,
    /// Chunk data framing (missing trailing CRLF) is malformed.
    InvalidChunk,
    /// The parser's internal state is inconsistent (should be unreachable).
    InvalidState,
    /// A hook returned a non-`Ok` result, aborting the parse.
    User,
    /// Any other failure not covered by a more specific variant.
    Unknown,
}

impl ParserError {
    /// The full set of variants, in the stable order the taxonomy defines.
    pub const ALL: [ParserError; 13] = [
        ParserError::None,
        ParserError::TooBig,
        ParserError::InvalidMethod,
        ParserError::InvalidRequestLine,
        ParserError::InvalidSchema,
        ParserError::InvalidProtocol,
        ParserError::InvalidVersion,
        ParserError::InvalidHeader,
        ParserError::InvalidChunkSize,
        ParserError::InvalidChunk,
        ParserError::InvalidState,
        ParserError::User,
        ParserError::Unknown,
    ];

    /// The canonical `httpweave_error_<name>` identifier for this error.
    pub fn as_str(self) -> &'static str {
        match self {
            ParserError::None => "httpweave_error_none",
            ParserError::TooBig => "httpweave_error_too_big",
            ParserError::InvalidMethod => "httpweave_error_invalid_method",
            ParserError::InvalidRequestLine => "httpweave_error_invalid_requestline",
            ParserError::InvalidSchema => "httpweave_error_invalid_schema",
            ParserError::InvalidProtocol => "httpweave_error_invalid_protocol",
            ParserError::InvalidVersion => "httpweave_error_invalid_version",
            ParserError::InvalidHeader => "httpweave_error_invalid_header",
            ParserError::InvalidChunkSize => "httpweave_error_invalid_chunk_size",
            ParserError::InvalidChunk => "httpweave_error_invalid_chunk",
            ParserError::InvalidState => "httpweave_error_invalid_state",
            ParserError::User => "httpweave_error_user",
            ParserError::Unknown => "httpweave_error_unknown",
        }
    }

    /// Looks up the canonical identifier string for a raw numeric code, the
    /// way a caller holding only an integer error code would. Returns the
    /// `no_such_error` sentinel for codes outside the taxonomy.
    pub fn name_for_code(code: u8) -> &'static str {
        match ParserError::ALL.get(code as usize) {
            Some(err) => err.as_str(),
            None => "httpweave_error_no_such_error",
        }
    }

    /// Whether this value represents the absence of an error.
    pub fn is_none(self) -> bool {
        matches!(self, ParserError::None)
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ParserError {}
