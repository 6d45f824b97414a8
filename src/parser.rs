//! The incremental byte-driven HTTP/1.x state machine.
//!
//! [`Parser::feed`] consumes an arbitrary slice of bytes — a full message,
//! a single byte, or anything in between — and drives a [`Hooks`]
//! implementation as it recognizes structural elements. The parser never
//! grows a heap buffer: tokens accumulate in a fixed 8192-byte scratch
//! array indexed by byte offsets, and body/chunk data is handed to hooks
//! directly from the caller's slice without being copied anywhere.

use std::any::Any;
use std::fmt;

use crate::classify::unhex;
use crate::error::ParserError;
use crate::hooks::{HookResult, Hooks};
use crate::token::{decode_decimal_u64, is_method_char, DecimalError, HeaderEval, HttpMethod, Scheme};
use crate::types::ParserType;

/// Size of the fixed scratch buffer tokens (method, URI, header name/value)
/// accumulate into. Exceeding it is a [`ParserError::TooBig`], not a growth
/// event — there is no heap allocation on this path.
pub const SCRATCH_BUF_SIZE: usize = 8192;

/// RFC 9110 `tchar`: the characters a header field name may contain.
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

/// RFC 9110 `field-content`: printable ASCII, tab, or any obs-text byte.
fn is_field_content_byte(b: u8) -> bool {
    b == b'\t' || (0x20..=0x7e).contains(&b) || b >= 0x80
}

fn trim_trailing_ows(value: &[u8]) -> &[u8] {
    let end = value.iter().rposition(|&b| b != b' ' && b != b'\t').map_or(0, |i| i + 1);
    &value[..end]
}

fn is_chunked_encoding(value: &[u8]) -> bool {
    trim_trailing_ows(value).eq_ignore_ascii_case(b"chunked")
}

/// The effect a classified header has on parser state, computed from a
/// borrowed value slice and applied afterwards — splitting it this way
/// avoids holding a borrow of `self.buf` across the `&mut self` writes it
/// produces.
enum HeaderEffect {
    None,
    ContentLength(u64),
    Close,
    KeepAlive,
    Multipart,
}

fn compute_header_effect(heval: HeaderEval, value: &[u8]) -> Result<HeaderEffect, ParserError> {
    match heval {
        HeaderEval::ContentLength => match decode_decimal_u64(value) {
            Ok(n) => Ok(HeaderEffect::ContentLength(n)),
            Err(DecimalError::Overflow) => Err(ParserError::TooBig),
            Err(DecimalError::Empty) | Err(DecimalError::NonDigit) => Err(ParserError::InvalidHeader),
        },
        HeaderEval::Connection => {
            let v = trim_trailing_ows(value);
            if v.eq_ignore_ascii_case(b"close") {
                Ok(HeaderEffect::Close)
            } else if v.eq_ignore_ascii_case(b"keep-alive") {
                Ok(HeaderEffect::KeepAlive)
            } else {
                Ok(HeaderEffect::None)
            }
        }
        HeaderEval::ContentType => {
            if value.len() >= 9 && value[..9].eq_ignore_ascii_case(b"multipart") {
                Ok(HeaderEffect::Multipart)
            } else {
                Ok(HeaderEffect::None)
            }
        }
        HeaderEval::ProxyConnection | HeaderEval::Host | HeaderEval::TransferEncoding | HeaderEval::None => {
            Ok(HeaderEffect::None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Method,
    SpacesBeforeUri,
    Schema,
    SchemaSlash,
    SchemaSlashSlash,
    Host,
    HostIpv6,
    HostDone,
    Port,
    UriPath,
    VersionLiteral,
    MajorDigit,
    VersionDot,
    MinorDigit,
    VersionTrailingSpace,
    StatusCode,
    StatusText,
    AlmostDone,
    HdrlineStart,
    HdrlineHdrKey,
    HdrlineHdrSpaceBeforeVal,
    HdrlineHdrVal,
    HdrlineHdrAlmostDone,
    HdrlineHdrDone,
    HdrlineAlmostDone,
    ChunkSize,
    ChunkSizeAlmostDone,
    ChunkData,
    ChunkDataCr,
    ChunkDataLf,
    BodyRead,
}

/// An incremental HTTP/1.x request or response parser.
///
/// A `Parser` is constructed once for a connection and fed bytes as they
/// arrive; it restarts itself at message boundaries (including after a
/// `1xx` informational response), so pipelined messages on a persistent
/// connection can all be driven through the same instance without an
/// explicit [`Parser::reset`] between them.
pub struct Parser {
    typ: ParserType,
    state: State,

    buf: [u8; SCRATCH_BUF_SIZE],
    buf_idx: usize,

    scheme_offset: Option<usize>,
    host_offset: Option<usize>,
    port_offset: Option<usize>,
    path_offset: Option<usize>,
    path_end: Option<usize>,
    args_offset: Option<usize>,

    method: HttpMethod,
    scheme: Scheme,
    major: u8,
    minor: u8,
    version_progress: u8,

    status: u16,
    status_digits: u8,

    heval: HeaderEval,
    multipart: bool,
    chunked: bool,
    keep_alive_flag: bool,
    close_flag: bool,
    trailing: bool,
    message_complete: bool,

    content_len: u64,
    orig_content_len: u64,
    content_length_seen: bool,
    chunk_len: u64,
    chunk_size_digits: u8,

    bytes_read: u64,
    total_bytes_read: u64,

    error: ParserError,
    userdata: Option<Box<dyn Any>>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("typ", &self.typ)
            .field("state", &self.state)
            .field("method", &self.method)
            .field("status", &self.status)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Parser {
    /// Builds a fresh parser driving either the request or response
    /// grammar. The two grammars share almost all states but diverge at
    /// the version line (a request target precedes it; a response status
    /// code follows it).
    pub fn new(typ: ParserType) -> Self {
        Parser {
            typ,
            state: State::Start,
            buf: [0u8; SCRATCH_BUF_SIZE],
            buf_idx: 0,
            scheme_offset: None,
            host_offset: None,
            port_offset: None,
            path_offset: None,
            path_end: None,
            args_offset: None,
            method: HttpMethod::Unknown,
            scheme: Scheme::None,
            major: 0,
            minor: 0,
            version_progress: 0,
            status: 0,
            status_digits: 0,
            heval: HeaderEval::None,
            multipart: false,
            chunked: false,
            keep_alive_flag: false,
            close_flag: false,
            trailing: false,
            message_complete: false,
            content_len: 0,
            orig_content_len: 0,
            content_length_seen: false,
            chunk_len: 0,
            chunk_size_digits: 0,
            bytes_read: 0,
            total_bytes_read: 0,
            error: ParserError::None,
            userdata: None,
        }
    }

    /// Reinitializes the parser to `Start`, preserving its grammar
    /// (request vs. response) but discarding everything else, including
    /// `total_bytes_read` and any stored userdata.
    pub fn reset(&mut self) {
        let typ = self.typ;
        *self = Parser::new(typ);
    }

    // -- accessors ----------------------------------------------------------

    pub fn parser_type(&self) -> ParserType {
        self.typ
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    pub fn is_multipart(&self) -> bool {
        self.multipart
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length_seen.then_some(self.orig_content_len)
    }

    pub fn error(&self) -> ParserError {
        self.error
    }

    pub fn is_complete(&self) -> bool {
        self.message_complete
    }

    /// Whether header hooks currently firing belong to chunked trailers
    /// rather than the message's main header block.
    pub fn in_trailers(&self) -> bool {
        self.trailing
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn total_bytes_read(&self) -> u64 {
        self.total_bytes_read
    }

    /// Whether the connection may be reused for another message, per the
    /// usual HTTP/1.x rule: `>= 1.1` keeps the connection open unless a
    /// `Connection: close` was seen; `< 1.1` closes it unless
    /// `Connection: keep-alive` was seen.
    pub fn should_keep_alive(&self) -> bool {
        if (self.major, self.minor) >= (1, 1) {
            !self.close_flag
        } else {
            self.keep_alive_flag
        }
    }

    pub fn set_userdata<D: Any>(&mut self, data: D) {
        self.userdata = Some(Box::new(data));
    }

    pub fn userdata<D: Any>(&self) -> Option<&D> {
        self.userdata.as_ref().and_then(|b| b.downcast_ref())
    }

    pub fn userdata_mut<D: Any>(&mut self) -> Option<&mut D> {
        self.userdata.as_mut().and_then(|b| b.downcast_mut())
    }

    pub fn take_userdata(&mut self) -> Option<Box<dyn Any>> {
        self.userdata.take()
    }

    // -- the state machine ---------------------------------------------------

    /// Feeds `data` to the parser, driving `hooks` as structural elements
    /// are recognized.
    ///
    /// Returns the number of bytes consumed. On success that is always
    /// `data.len()`; on failure it is the 1-based index of the offending
    /// byte, and [`Parser::error`] holds the reason. Once an error has been
    /// set, further calls return `0` until [`Parser::reset`] is called.
    pub fn feed<H: Hooks>(&mut self, hooks: &mut H, data: &[u8]) -> usize {
        if !self.error.is_none() {
            return 0;
        }

        self.bytes_read = 0;
        let mut i = 0usize;

        while i < data.len() {
            match self.state {
                State::BodyRead => {
                    let avail = (data.len() - i) as u64;
                    let to_read = self.content_len.min(avail) as usize;
                    if to_read > 0 {
                        let chunk = &data[i..i + to_read];
                        if hooks.body(self, chunk).is_err() {
                            self.error = ParserError::User;
                            self.bytes_read += to_read as u64;
                            self.total_bytes_read += to_read as u64;
                            return i + to_read;
                        }
                        i += to_read;
                        self.bytes_read += to_read as u64;
                        self.total_bytes_read += to_read as u64;
                        self.content_len -= to_read as u64;
                    }
                    if self.content_len == 0 {
                        if hooks.on_msg_complete(self).is_err() {
                            self.error = ParserError::User;
                            return i;
                        }
                        self.message_complete = true;
                        self.state = State::Start;
                    }
                    continue;
                }
                State::ChunkData => {
                    let avail = (data.len() - i) as u64;
                    let to_read = self.chunk_len.min(avail) as usize;
                    if to_read > 0 {
                        let chunk = &data[i..i + to_read];
                        if hooks.body(self, chunk).is_err() {
                            self.error = ParserError::User;
                            self.bytes_read += to_read as u64;
                            self.total_bytes_read += to_read as u64;
                            return i + to_read;
                        }
                        i += to_read;
                        self.bytes_read += to_read as u64;
                        self.total_bytes_read += to_read as u64;
                        self.chunk_len -= to_read as u64;
                    }
                    if self.chunk_len == 0 {
                        self.state = State::ChunkDataCr;
                    }
                    continue;
                }
                _ => {}
            }

            let ch = data[i];
            i += 1;
            self.bytes_read += 1;
            self.total_bytes_read += 1;

            macro_rules! push {
                ($b:expr) => {{
                    if self.buf_idx >= SCRATCH_BUF_SIZE {
                        self.error = ParserError::TooBig;
                        return i;
                    }
                    self.buf[self.buf_idx] = $b;
                    self.buf_idx += 1;
                }};
            }

            macro_rules! fail {
                ($e:expr) => {{
                    self.error = $e;
                    return i;
                }};
            }

            macro_rules! call {
                ($hook:ident $(, $arg:expr )*) => {{
                    if hooks.$hook(self $(, $arg)*).is_err() {
                        self.error = ParserError::User;
                        return i;
                    }
                }};
            }

            macro_rules! emit_uri {
                () => {{
                    let path_off = self.path_offset.unwrap_or(0);
                    let path_end = self.path_end.unwrap_or(self.buf_idx);
                    call!(path, &self.buf[path_off..path_end]);
                    if let Some(args_off) = self.args_offset {
                        call!(args, &self.buf[args_off..self.buf_idx]);
                    }
                    call!(uri, &self.buf[..self.buf_idx]);
                    self.buf_idx = 0;
                }};
            }

            macro_rules! finish_header_value {
                () => {{
                    let value_end = self.buf_idx;
                    let effect = match compute_header_effect(self.heval, &self.buf[..value_end]) {
                        Ok(e) => e,
                        Err(e) => fail!(e),
                    };
                    if self.heval == HeaderEval::TransferEncoding
                        && is_chunked_encoding(&self.buf[..value_end])
                    {
                        self.chunked = true;
                    }
                    if self.heval == HeaderEval::Host {
                        call!(hostname, &self.buf[..value_end]);
                    }
                    call!(hdr_val, &self.buf[..value_end]);
                    match effect {
                        HeaderEffect::None => {}
                        HeaderEffect::ContentLength(n) => {
                            if self.content_length_seen && self.orig_content_len != n {
                                fail!(ParserError::InvalidHeader);
                            }
                            self.content_len = n;
                            self.orig_content_len = n;
                            self.content_length_seen = true;
                        }
                        HeaderEffect::Close => self.close_flag = true,
                        HeaderEffect::KeepAlive => self.keep_alive_flag = true,
                        HeaderEffect::Multipart => self.multipart = true,
                    }
                    self.buf_idx = 0;
                }};
            }

            match self.state {
                State::Start => {
                    self.buf_idx = 0;
                    self.method = HttpMethod::Unknown;
                    self.scheme = Scheme::None;
                    self.major = 0;
                    self.minor = 0;
                    self.version_progress = 0;
                    self.status = 0;
                    self.status_digits = 0;
                    self.heval = HeaderEval::None;
                    self.multipart = false;
                    self.chunked = false;
                    self.keep_alive_flag = false;
                    self.close_flag = false;
                    self.content_len = 0;
                    self.orig_content_len = 0;
                    self.content_length_seen = false;
                    self.chunk_len = 0;
                    self.chunk_size_digits = 0;
                    self.scheme_offset = None;
                    self.host_offset = None;
                    self.port_offset = None;
                    self.path_offset = None;
                    self.path_end = None;
                    self.args_offset = None;

                    match ch {
                        b'\r' | b'\n' => {}
                        c if is_method_char(c) => match self.typ {
                            ParserType::Request => {
                                push!(c);
                                self.message_complete = false;
                                self.state = State::Method;
                                call!(on_msg_begin);
                            }
                            ParserType::Response => {
                                if c == b'H' {
                                    self.version_progress = 1;
                                    self.message_complete = false;
                                    self.state = State::VersionLiteral;
                                    call!(on_msg_begin);
                                } else {
                                    fail!(ParserError::InvalidProtocol);
                                }
                            }
                        },
                        _ => fail!(match self.typ {
                            ParserType::Request => ParserError::InvalidRequestLine,
                            ParserType::Response => ParserError::InvalidProtocol,
                        }),
                    }
                }

                State::Method => match ch {
                    b' ' => {
                        self.method = HttpMethod::recognize(&self.buf[..self.buf_idx]);
                        call!(method, &self.buf[..self.buf_idx]);
                        self.buf_idx = 0;
                        self.state = State::SpacesBeforeUri;
                    }
                    c if is_method_char(c) => push!(c),
                    _ => fail!(ParserError::InvalidMethod),
                },

                State::SpacesBeforeUri => match ch {
                    b' ' => {}
                    b'/' => {
                        self.path_offset = Some(self.buf_idx);
                        push!(ch);
                        self.state = State::UriPath;
                    }
                    c if c.is_ascii_alphabetic() => {
                        self.scheme_offset = Some(self.buf_idx);
                        push!(c);
                        self.state = State::Schema;
                    }
                    _ => fail!(ParserError::InvalidRequestLine),
                },

                State::Schema => match ch {
                    b':' => {
                        let off = self.scheme_offset.unwrap_or(0);
                        self.scheme = Scheme::recognize(&self.buf[off..self.buf_idx]);
                        call!(scheme, &self.buf[off..self.buf_idx]);
                        push!(ch);
                        self.state = State::SchemaSlash;
                    }
                    c if c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.') => push!(c),
                    _ => fail!(ParserError::InvalidSchema),
                },

                State::SchemaSlash => {
                    if ch == b'/' {
                        push!(ch);
                        self.state = State::SchemaSlashSlash;
                    } else {
                        fail!(ParserError::InvalidSchema);
                    }
                }

                State::SchemaSlashSlash => {
                    if ch == b'/' {
                        push!(ch);
                        self.host_offset = Some(self.buf_idx);
                        self.state = State::Host;
                    } else {
                        fail!(ParserError::InvalidSchema);
                    }
                }

                State::Host => match ch {
                    b'[' => {
                        push!(ch);
                        self.state = State::HostIpv6;
                    }
                    b':' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        push!(ch);
                        self.port_offset = Some(self.buf_idx);
                        self.state = State::Port;
                    }
                    b' ' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(b'/');
                        emit_uri!();
                        self.version_progress = 0;
                        self.state = State::VersionLiteral;
                    }
                    b'/' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(ch);
                        self.state = State::UriPath;
                    }
                    c if c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.') => push!(c),
                    _ => fail!(ParserError::InvalidSchema),
                },

                State::HostIpv6 => match ch {
                    b']' => {
                        push!(ch);
                        self.state = State::HostDone;
                    }
                    c if c.is_ascii_hexdigit() || matches!(c, b':' | b'.') => push!(c),
                    _ => fail!(ParserError::InvalidSchema),
                },

                State::HostDone => match ch {
                    b':' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        push!(ch);
                        self.port_offset = Some(self.buf_idx);
                        self.state = State::Port;
                    }
                    b' ' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(b'/');
                        emit_uri!();
                        self.version_progress = 0;
                        self.state = State::VersionLiteral;
                    }
                    b'/' => {
                        let off = self.host_offset.unwrap_or(0);
                        call!(host, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(ch);
                        self.state = State::UriPath;
                    }
                    _ => fail!(ParserError::InvalidSchema),
                },

                State::Port => match ch {
                    c if c.is_ascii_digit() => push!(c),
                    b' ' => {
                        let off = self.port_offset.unwrap_or(0);
                        call!(port, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(b'/');
                        emit_uri!();
                        self.version_progress = 0;
                        self.state = State::VersionLiteral;
                    }
                    b'/' => {
                        let off = self.port_offset.unwrap_or(0);
                        call!(port, &self.buf[off..self.buf_idx]);
                        self.path_offset = Some(self.buf_idx);
                        push!(ch);
                        self.state = State::UriPath;
                    }
                    _ => fail!(ParserError::InvalidSchema),
                },

                State::UriPath => match ch {
                    b' ' => {
                        emit_uri!();
                        self.version_progress = 0;
                        self.state = State::VersionLiteral;
                    }
                    b'\r' => {
                        emit_uri!();
                        self.major = 0;
                        self.minor = 9;
                        self.state = State::AlmostDone;
                    }
                    b'\n' => {
                        emit_uri!();
                        self.major = 0;
                        self.minor = 9;
                        call!(on_hdrs_begin);
                        self.state = State::HdrlineStart;
                    }
                    b'?' => {
                        if self.args_offset.is_none() {
                            self.path_end = Some(self.buf_idx);
                            push!(ch);
                            self.args_offset = Some(self.buf_idx);
                        } else {
                            push!(ch);
                        }
                    }
                    b'/' | b'.' | b'%' | b'#' => push!(ch),
                    c if crate::classify::is_usual(c) => push!(c),
                    _ => fail!(ParserError::InvalidRequestLine),
                },

                State::VersionLiteral => {
                    const LIT: &[u8] = b"HTTP/";
                    if self.version_progress == 0 && ch == b'\r' {
                        self.major = 0;
                        self.minor = 9;
                        self.state = State::AlmostDone;
                    } else if self.version_progress == 0 && ch == b'\n' {
                        self.major = 0;
                        self.minor = 9;
                        call!(on_hdrs_begin);
                        self.state = State::HdrlineStart;
                    } else if ch == LIT[self.version_progress as usize] {
                        self.version_progress += 1;
                        if self.version_progress as usize == LIT.len() {
                            self.version_progress = 0;
                            self.state = State::MajorDigit;
                        }
                    } else {
                        fail!(self.version_line_error());
                    }
                }

                State::MajorDigit => {
                    if ch == b'\n' {
                        fail!(self.bare_lf_version_error());
                    } else if ch.is_ascii_digit() {
                        self.major = ch - b'0';
                        self.state = State::VersionDot;
                    } else {
                        fail!(self.version_line_error());
                    }
                }

                State::VersionDot => {
                    if ch == b'\n' {
                        fail!(self.bare_lf_version_error());
                    } else if ch == b'.' {
                        self.state = State::MinorDigit;
                    } else {
                        fail!(self.version_line_error());
                    }
                }

                State::MinorDigit => {
                    if ch == b'\n' {
                        fail!(self.bare_lf_version_error());
                    } else if ch.is_ascii_digit() {
                        self.minor = ch - b'0';
                        match self.typ {
                            ParserType::Request => self.state = State::VersionTrailingSpace,
                            ParserType::Response => {
                                self.status = 0;
                                self.status_digits = 0;
                                self.state = State::StatusCode;
                            }
                        }
                    } else {
                        fail!(self.version_line_error());
                    }
                }

                State::VersionTrailingSpace => match ch {
                    b' ' => {}
                    b'\r' => self.state = State::AlmostDone,
                    b'\n' => fail!(self.bare_lf_version_error()),
                    _ => fail!(ParserError::InvalidVersion),
                },

                State::StatusCode => match ch {
                    b' ' if self.status_digits == 0 => {}
                    b' ' if self.status_digits == 3 => self.state = State::StatusText,
                    c if c.is_ascii_digit() && self.status_digits < 3 => {
                        self.status = self.status * 10 + (c - b'0') as u16;
                        self.status_digits += 1;
                    }
                    b'\r' if self.status_digits == 3 => self.state = State::AlmostDone,
                    _ => fail!(ParserError::InvalidProtocol),
                },

                State::StatusText => {
                    if ch == b'\r' {
                        self.state = State::AlmostDone;
                    }
                }

                State::AlmostDone => {
                    if ch == b'\n' {
                        call!(on_hdrs_begin);
                        self.state = State::HdrlineStart;
                    } else {
                        fail!(match self.typ {
                            ParserType::Request => ParserError::InvalidRequestLine,
                            ParserType::Response => ParserError::InvalidProtocol,
                        });
                    }
                }

                State::HdrlineStart => {
                    self.buf_idx = 0;
                    match ch {
                        b'\r' => self.state = State::HdrlineAlmostDone,
                        b'\n' => {
                            if self.finalize_headers(hooks).is_err() {
                                fail!(ParserError::User);
                            }
                        }
                        c if is_tchar(c) => {
                            push!(c);
                            self.state = State::HdrlineHdrKey;
                        }
                        _ => fail!(ParserError::InvalidHeader),
                    }
                }

                State::HdrlineHdrKey => match ch {
                    b':' => {
                        self.heval = HeaderEval::classify(&self.buf[..self.buf_idx]);
                        call!(hdr_key, &self.buf[..self.buf_idx]);
                        self.buf_idx = 0;
                        self.state = State::HdrlineHdrSpaceBeforeVal;
                    }
                    c if is_tchar(c) => push!(c),
                    _ => fail!(ParserError::InvalidHeader),
                },

                State::HdrlineHdrSpaceBeforeVal => match ch {
                    b' ' | b'\t' => {}
                    b'\r' => self.state = State::HdrlineHdrAlmostDone,
                    c if is_field_content_byte(c) => {
                        push!(c);
                        self.state = State::HdrlineHdrVal;
                    }
                    _ => fail!(ParserError::InvalidHeader),
                },

                State::HdrlineHdrVal => match ch {
                    b'\r' => self.state = State::HdrlineHdrAlmostDone,
                    c if is_field_content_byte(c) => push!(c),
                    _ => fail!(ParserError::InvalidHeader),
                },

                State::HdrlineHdrAlmostDone => {
                    if ch == b'\n' {
                        self.state = State::HdrlineHdrDone;
                    } else {
                        fail!(ParserError::InvalidHeader);
                    }
                }

                State::HdrlineHdrDone => match ch {
                    b'\t' => {
                        push!(b' ');
                        self.state = State::HdrlineHdrVal;
                    }
                    b'\n' => fail!(ParserError::InvalidHeader),
                    b'\r' => {
                        finish_header_value!();
                        self.state = State::HdrlineAlmostDone;
                    }
                    c if is_tchar(c) => {
                        finish_header_value!();
                        push!(c);
                        self.state = State::HdrlineHdrKey;
                    }
                    _ => fail!(ParserError::InvalidHeader),
                },

                State::HdrlineAlmostDone => {
                    if ch == b'\n' {
                        if self.finalize_headers(hooks).is_err() {
                            fail!(ParserError::User);
                        }
                    } else {
                        fail!(ParserError::InvalidHeader);
                    }
                }

                State::ChunkSize => {
                    let v = unhex(ch);
                    if v >= 0 {
                        match self
                            .chunk_len
                            .checked_mul(16)
                            .and_then(|x| x.checked_add(v as u64))
                        {
                            Some(n) => {
                                self.chunk_len = n;
                                self.chunk_size_digits += 1;
                            }
                            None => fail!(ParserError::InvalidChunkSize),
                        }
                    } else if ch == b'\r' {
                        if self.chunk_size_digits == 0 {
                            fail!(ParserError::InvalidChunkSize);
                        }
                        self.state = State::ChunkSizeAlmostDone;
                    } else {
                        fail!(ParserError::InvalidChunkSize);
                    }
                }

                State::ChunkSizeAlmostDone => {
                    if ch != b'\n' {
                        fail!(ParserError::InvalidChunkSize);
                    }
                    self.chunk_size_digits = 0;
                    if self.chunk_len == 0 {
                        call!(on_chunks_complete);
                        self.trailing = true;
                        self.state = State::HdrlineStart;
                    } else {
                        call!(on_new_chunk);
                        self.state = State::ChunkData;
                    }
                }

                State::ChunkDataCr => {
                    if ch != b'\r' {
                        fail!(ParserError::InvalidChunk);
                    }
                    self.state = State::ChunkDataLf;
                }

                State::ChunkDataLf => {
                    if ch != b'\n' {
                        fail!(ParserError::InvalidChunk);
                    }
                    call!(on_chunk_complete);
                    self.chunk_len = 0;
                    self.chunk_size_digits = 0;
                    self.state = State::ChunkSize;
                }

                State::ChunkData | State::BodyRead => unreachable!("handled by the bulk path above"),
            }

            if !self.error.is_none() {
                return i;
            }
        }

        i
    }

    fn version_line_error(&self) -> ParserError {
        match self.typ {
            ParserType::Request => ParserError::InvalidVersion,
            ParserType::Response => ParserError::InvalidProtocol,
        }
    }

    /// A bare LF where a version digit was expected is a request-line (or
    /// status-line) structural error, distinct from a malformed version
    /// token — the grammar itself was abandoned, not just its version part.
    fn bare_lf_version_error(&self) -> ParserError {
        match self.typ {
            ParserType::Request => ParserError::InvalidRequestLine,
            ParserType::Response => ParserError::InvalidProtocol,
        }
    }

    fn finalize_headers<H: Hooks>(&mut self, hooks: &mut H) -> HookResult {
        if self.trailing {
            self.trailing = false;
            hooks.on_msg_complete(self)?;
            self.message_complete = true;
            self.state = State::Start;
            return Ok(());
        }

        hooks.on_hdrs_complete(self)?;

        if self.typ == ParserType::Response && (100..200).contains(&self.status) {
            self.state = State::Start;
        } else if self.chunked {
            self.chunk_len = 0;
            self.chunk_size_digits = 0;
            self.state = State::ChunkSize;
        } else if self.content_len > 0 {
            self.state = State::BodyRead;
        } else {
            hooks.on_msg_complete(self)?;
            self.message_complete = true;
            self.state = State::Start;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoopHooks;

    fn feed_all(p: &mut Parser, data: &[u8]) -> usize {
        let mut hooks = NoopHooks;
        p.feed(&mut hooks, data)
    }

    #[test]
    fn minimal_get_request() {
        let mut p = Parser::new(ParserType::Request);
        let n = feed_all(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(n, 19);
        assert!(p.error().is_none());
        assert!(p.is_complete());
        assert_eq!(p.method(), HttpMethod::Get);
        assert_eq!((p.major(), p.minor()), (1, 1));
    }

    #[test]
    fn byte_by_byte_feed_matches_whole_buffer_feed() {
        let msg = b"POST /x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let mut whole = Parser::new(ParserType::Request);
        feed_all(&mut whole, msg);
        assert!(whole.error().is_none());
        assert!(whole.is_complete());

        let mut incremental = Parser::new(ParserType::Request);
        let mut hooks = NoopHooks;
        for &b in msg {
            let consumed = incremental.feed(&mut hooks, &[b]);
            assert_eq!(consumed, 1);
        }
        assert!(incremental.error().is_none());
        assert!(incremental.is_complete());
        assert_eq!(incremental.content_length(), Some(3));
    }

    #[test]
    fn http_09_request_has_no_version() {
        let mut p = Parser::new(ParserType::Request);
        let n = feed_all(&mut p, b"GET /old\r\n\r\n");
        assert_eq!(n, 12);
        assert!(p.error().is_none());
        assert_eq!((p.major(), p.minor()), (0, 9));
    }

    #[test]
    fn too_big_token_errors() {
        let mut p = Parser::new(ParserType::Request);
        let mut long_path = vec![b'/'];
        long_path.extend(std::iter::repeat(b'a').take(SCRATCH_BUF_SIZE + 1));
        let mut req = b"GET ".to_vec();
        req.extend_from_slice(&long_path);
        req.extend_from_slice(b" HTTP/1.1\r\n\r\n");
        feed_all(&mut p, &req);
        assert_eq!(p.error(), ParserError::TooBig);
    }

    #[test]
    fn content_length_overflow_is_too_big() {
        let mut p = Parser::new(ParserType::Request);
        feed_all(
            &mut p,
            b"POST / HTTP/1.1\r\nContent-Length: 99999999999999999999\r\n\r\n",
        );
        assert_eq!(p.error(), ParserError::TooBig);
    }

    #[test]
    fn obs_fold_is_tolerated() {
        let mut p = Parser::new(ParserType::Request);
        let mut collector = crate::output::Collector::new();
        let raw = b"GET / HTTP/1.1\r\nX-Folded: one\r\n\ttwo\r\n\r\n";
        let n = p.feed(&mut collector, raw);
        assert!(p.error().is_none(), "error: {:?}", p.error());
        assert!(p.is_complete());
        let msg = collector.take_message();
        assert_eq!(msg.header_value("X-Folded"), Some("one two"));
        assert_eq!(n, raw.len());
    }

    #[test]
    fn obs_fold_requires_tab_not_space() {
        let mut p = Parser::new(ParserType::Request);
        feed_all(&mut p, b"GET / HTTP/1.1\r\nX-Folded: one\r\n two\r\n\r\n");
        assert_eq!(p.error(), ParserError::InvalidHeader);
    }
}
