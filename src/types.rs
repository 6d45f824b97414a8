use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// ParserType
// ---------------------------------------------------------------------------

/// Which grammar a [`crate::parser::Parser`] is driving: a request
/// (`METHOD target HTTP/x.y`) or a response (`HTTP/x.y status reason`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserType {
    Request,
    Response,
}

// ---------------------------------------------------------------------------
// HttpVersion
// ---------------------------------------------------------------------------

/// An HTTP protocol version, as a major/minor pair. The wire grammar
/// allows any single-digit major/minor pair (`HTTP/2.0` parses
/// structurally even though this crate never speaks the HTTP/2 frame
/// format), so the version is carried as plain digits rather than a
/// closed set of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_10: HttpVersion = HttpVersion { major: 1, minor: 0 };
    pub const HTTP_11: HttpVersion = HttpVersion { major: 1, minor: 1 };

    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

impl Serialize for HttpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// A single header field, as buffered by the CLI collector. The core
/// parser never constructs this type — it only ever hands `hdr_key` and
/// `hdr_val` hooks borrowed byte slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}
