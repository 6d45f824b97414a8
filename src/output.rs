//! A CLI-facing hook implementation that buffers a parsed message into a
//! serializable struct, and the formatters that render it.
//!
//! The core parser never buffers or allocates on the heap; this module is
//! the one place in the crate that does, because a CLI has to print
//! *something* once parsing finishes. Library users who want to stream
//! should implement [`Hooks`] directly instead of going through [`Collector`].

use serde::Serialize;

use crate::hooks::{HookResult, Hooks};
use crate::parser::Parser;
use crate::types::{Header, HttpVersion, ParserType};

/// A fully buffered request or response, ready to serialize.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpMessage {
    pub method: Option<String>,
    pub uri: Option<String>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub version: Option<HttpVersion>,
    pub status: Option<u16>,
    pub headers: Vec<Header>,
    pub trailers: Vec<Header>,
    pub body: Option<String>,
    pub chunked: bool,
    pub multipart: bool,
}

impl HttpMessage {
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn header_values<'a>(&'a self, name: &str) -> Vec<&'a str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }
}

/// Collects a single message into an [`HttpMessage`] by implementing
/// [`Hooks`]. Call [`Collector::take_message`] once the driving
/// [`Parser`] reports [`Parser::is_complete`] to get the buffered result
/// and reset the collector for the next message on the same connection.
#[derive(Debug, Default)]
pub struct Collector {
    message: HttpMessage,
    body_buf: Vec<u8>,
    pending_header_name: Option<String>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the buffered message, leaving the collector ready for the
    /// next one — useful when driving a persistent connection through a
    /// single `Parser` across multiple messages.
    pub fn take_message(&mut self) -> HttpMessage {
        std::mem::take(&mut self.message)
    }
}

impl Hooks for Collector {
    fn on_msg_begin(&mut self, _p: &Parser) -> HookResult {
        self.message = HttpMessage::default();
        self.body_buf.clear();
        self.pending_header_name = None;
        Ok(())
    }

    fn method(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.method = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn scheme(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.scheme = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn host(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.host = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    /// Only fills `host` from the `Host` header when the URI itself didn't
    /// already supply one (origin-form requests carry no URI host).
    fn hostname(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        if self.message.host.is_none() {
            self.message.host = Some(String::from_utf8_lossy(data).into_owned());
        }
        Ok(())
    }

    fn port(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.port = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn path(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.path = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn args(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.query = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn uri(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.message.uri = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn hdr_key(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.pending_header_name = Some(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn hdr_val(&mut self, p: &Parser, data: &[u8]) -> HookResult {
        let name = self.pending_header_name.take().unwrap_or_default();
        let value = String::from_utf8_lossy(data).into_owned();
        let header = Header { name, value };
        if p.in_trailers() {
            self.message.trailers.push(header);
        } else {
            self.message.headers.push(header);
        }
        Ok(())
    }

    fn on_hdrs_complete(&mut self, p: &Parser) -> HookResult {
        self.message.version = Some(HttpVersion::new(p.major(), p.minor()));
        if p.parser_type() == ParserType::Response {
            self.message.status = Some(p.status());
        }
        self.message.chunked = p.is_chunked();
        self.message.multipart = p.is_multipart();
        Ok(())
    }

    fn body(&mut self, _p: &Parser, data: &[u8]) -> HookResult {
        self.body_buf.extend_from_slice(data);
        Ok(())
    }

    fn on_msg_complete(&mut self, _p: &Parser) -> HookResult {
        if !self.body_buf.is_empty() {
            self.message.body = Some(String::from_utf8_lossy(&self.body_buf).into_owned());
        }
        Ok(())
    }
}

/// Serialize an [`HttpMessage`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(message: &HttpMessage, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(message).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(message).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render an [`HttpMessage`] in a human-readable debug format.
pub fn format_debug(message: &HttpMessage) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== HTTP Message ===\n");
    if let Some(method) = &message.method {
        out.push_str(&format!("Method:  {method}\n"));
        out.push_str(&format!("URI:     {}\n", message.uri.as_deref().unwrap_or("")));
    }
    if let Some(status) = message.status {
        out.push_str(&format!("Status:  {status}\n"));
    }
    if let Some(version) = &message.version {
        out.push_str(&format!("Version: {version}\n"));
    }

    out.push_str(&format!("\n--- Headers ({}) ---\n", message.headers.len()));
    for header in &message.headers {
        out.push_str(&format!("  {}: {}\n", header.name, header.value));
    }

    if !message.trailers.is_empty() {
        out.push_str(&format!("\n--- Trailers ({}) ---\n", message.trailers.len()));
        for trailer in &message.trailers {
            out.push_str(&format!("  {}: {}\n", trailer.name, trailer.value));
        }
    }

    match &message.body {
        Some(body) => {
            out.push_str(&format!("\n--- Body ({} bytes) ---\n", body.len()));
            out.push_str(body);
            out.push('\n');
        }
        None => out.push_str("\n--- No Body ---\n"),
    }

    out.push_str("====================\n");
    out
}

/// Render only the request/status line and headers (no body).
pub fn format_headers_only(message: &HttpMessage) -> String {
    let mut out = String::with_capacity(64 + message.headers.len() * 40);

    if let (Some(method), Some(uri), Some(version)) =
        (&message.method, &message.uri, &message.version)
    {
        out.push_str(&format!("{method} {uri} {version}\n"));
    } else if let (Some(version), Some(status)) = (&message.version, message.status) {
        out.push_str(&format!("{version} {status}\n"));
    }

    for header in &message.headers {
        out.push_str(&format!("{}: {}\n", header.name, header.value));
    }

    out
}
