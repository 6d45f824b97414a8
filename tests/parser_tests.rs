use httpweave::{
    format_debug, format_headers_only, format_json, parse_request, parse_response, Collector,
    HookResult, Hooks, HttpMethod, NoopHooks, OneShotError, Parser, ParserType, Scheme,
};

// =========================================================================
// Request-line parsing
// =========================================================================

#[test]
fn simple_get_request() {
    let raw = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.method.as_deref(), Some("GET"));
    assert_eq!(msg.uri.as_deref(), Some("/"));
    assert_eq!(msg.version.unwrap().to_string(), "HTTP/1.1");
    assert_eq!(msg.headers.len(), 1);
    assert_eq!(msg.header_value("Host"), Some("example.com"));
    assert!(msg.body.is_none());
}

#[test]
fn get_with_query_string() {
    let raw =
        b"GET /api/users?page=1&limit=10 HTTP/1.1\r\nHost: api.example.com\r\nAccept: application/json\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.uri.as_deref(), Some("/api/users?page=1&limit=10"));
    assert_eq!(msg.path.as_deref(), Some("/api/users"));
    assert_eq!(msg.query.as_deref(), Some("page=1&limit=10"));
    assert_eq!(msg.header_value("Accept"), Some("application/json"));
}

#[test]
fn http_10_version() {
    let raw = b"GET /legacy HTTP/1.0\r\nHost: old.example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.version.unwrap().to_string(), "HTTP/1.0");
}

#[test]
fn all_standard_methods() {
    let methods = [
        ("GET", HttpMethod::Get),
        ("HEAD", HttpMethod::Head),
        ("POST", HttpMethod::Post),
        ("PUT", HttpMethod::Put),
        ("DELETE", HttpMethod::Delete),
        ("CONNECT", HttpMethod::Connect),
        ("OPTIONS", HttpMethod::Options),
        ("TRACE", HttpMethod::Trace),
        ("PATCH", HttpMethod::Patch),
        ("PROPPATCH", HttpMethod::Proppatch),
    ];

    for (name, expected) in methods {
        let raw = format!("{name} / HTTP/1.1\r\nHost: h\r\n\r\n");
        assert_eq!(HttpMethod::recognize(name.as_bytes()), expected);
        let msg = parse_request(raw.as_bytes()).unwrap_or_else(|e| panic!("method {name}: {e}"));
        assert_eq!(msg.method.as_deref(), Some(name));
    }
}

#[test]
fn absolute_form_uri_decomposition() {
    let raw = b"GET http://example.com:8080/path?q=1 HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.scheme.as_deref(), Some("http"));
    assert_eq!(msg.host.as_deref(), Some("example.com"));
    assert_eq!(msg.port.as_deref(), Some("8080"));
    assert_eq!(msg.path.as_deref(), Some("/path"));
    assert_eq!(msg.query.as_deref(), Some("q=1"));
}

#[test]
fn origin_form_host_comes_from_host_header() {
    let raw = b"GET /path HTTP/1.1\r\nHost: origin.example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.host.as_deref(), Some("origin.example.com"));
}

#[test]
fn http_09_request_has_no_headers_or_version() {
    let raw = b"GET /legacy\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.version.unwrap().to_string(), "HTTP/0.9");
    assert_eq!(msg.path.as_deref(), Some("/legacy"));
    assert!(msg.headers.is_empty());
}

// =========================================================================
// Header parsing
// =========================================================================

#[test]
fn multiple_headers() {
    let raw = b"GET / HTTP/1.1\r\n\
        Host: example.com\r\n\
        Accept: text/html\r\n\
        Accept-Language: en-US\r\n\
        User-Agent: httpweave/1.0\r\n\
        Connection: keep-alive\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.headers.len(), 5);
    assert_eq!(msg.header_value("Host"), Some("example.com"));
    assert_eq!(msg.header_value("User-Agent"), Some("httpweave/1.0"));
}

#[test]
fn header_value_ows_is_trimmed_by_leading_space_skip() {
    let raw = b"GET / HTTP/1.1\r\nHost:   example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.header_value("Host"), Some("example.com"));
}

#[test]
fn empty_header_value() {
    let raw = b"GET / HTTP/1.1\r\nHost: example.com\r\nX-Empty:\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.header_value("X-Empty"), Some(""));
}

#[test]
fn case_insensitive_header_lookup() {
    let raw = b"GET / HTTP/1.1\r\nhost: example.com\r\ncontent-type: text/plain\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.header_value("Host"), Some("example.com"));
    assert_eq!(msg.header_value("CONTENT-TYPE"), Some("text/plain"));
}

#[test]
fn duplicate_header_values() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.header_values("Set-Cookie"), vec!["a=1", "b=2"]);
}

#[test]
fn obs_fold_is_tolerated() {
    // A tab-prefixed continuation line folds into the prior header's
    // value with the fold itself collapsed to a single space.
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\nX-Folded: one\r\n\ttwo\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.header_value("X-Folded"), Some("one two"));
}

// =========================================================================
// Body parsing (Content-Length)
// =========================================================================

#[test]
fn post_with_content_length_body() {
    let body = "name=John&age=30";
    let raw = format!(
        "POST /submit HTTP/1.1\r\n\
         Host: example.com\r\n\
         Content-Length: {}\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\r\n\
         {}",
        body.len(),
        body
    );
    let msg = parse_request(raw.as_bytes()).expect("should parse");
    assert_eq!(msg.method.as_deref(), Some("POST"));
    assert_eq!(msg.body.as_deref(), Some(body));
}

#[test]
fn content_length_zero_yields_no_body() {
    let raw = b"POST /empty HTTP/1.1\r\nHost: h\r\nContent-Length: 0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert!(msg.body.is_none());
}

#[test]
fn duplicate_identical_content_lengths_accepted() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 3\r\nContent-Length: 3\r\n\r\nabc";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("abc"));
}

#[test]
fn content_type_multipart_is_detected() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Type: multipart/form-data; boundary=x\r\nContent-Length: 0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert!(msg.multipart);
}

#[test]
fn content_type_multipart_matches_bare_prefix() {
    // The match is a 9-byte prefix, not 10 bytes with a trailing slash.
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Type: multipart\r\nContent-Length: 0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert!(msg.multipart);
}

#[test]
fn content_length_overflow_is_too_big() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 99999999999999999999\r\n\r\n";
    let mut parser = Parser::new(ParserType::Request);
    let mut hooks = NoopHooks;
    parser.feed(&mut hooks, raw);
    assert_eq!(parser.error().to_string(), "httpweave_error_too_big");
}

// =========================================================================
// Chunked transfer encoding
// =========================================================================

#[test]
fn chunked_body_two_chunks() {
    let raw = b"POST /upload HTTP/1.1\r\n\
        Host: example.com\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        5\r\nHello\r\n6\r\n World\r\n0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("Hello World"));
    assert!(msg.chunked);
}

#[test]
fn chunked_single_chunk() {
    let raw = b"POST /data HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        4\r\nRust\r\n0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("Rust"));
}

#[test]
fn chunk_extension_is_rejected() {
    // Chunk extensions are not special-cased: a non-hex, non-CR byte in a
    // chunk-size line is a hard error.
    let raw = b"POST /data HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        5;ext=val\r\nHello\r\n0\r\n\r\n";
    assert!(parse_request(raw).is_err());
}

#[test]
fn chunked_empty_body_zero_only() {
    let raw = b"POST / HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert!(msg.body.is_none());
}

#[test]
fn chunked_hex_sizes() {
    let raw = b"POST / HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        A\r\n0123456789\r\n5\r\nabcde\r\n0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("0123456789abcde"));
}

#[test]
fn chunked_with_trailer_fields() {
    let raw = b"POST / HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        3\r\nabc\r\n0\r\n\
        Trailer-Field: value\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("abc"));
    assert_eq!(msg.trailers.len(), 1);
    assert_eq!(msg.trailers[0].name, "Trailer-Field");
    assert_eq!(msg.trailers[0].value, "value");
}

#[derive(Default)]
struct OrderRecorder {
    events: Vec<&'static str>,
}

impl Hooks for OrderRecorder {
    fn on_chunks_complete(&mut self, _p: &Parser) -> HookResult {
        self.events.push("chunks_complete");
        Ok(())
    }

    fn hdr_key(&mut self, _p: &Parser, _data: &[u8]) -> HookResult {
        self.events.push("hdr_key");
        Ok(())
    }

    fn hdr_val(&mut self, _p: &Parser, _data: &[u8]) -> HookResult {
        self.events.push("hdr_val");
        Ok(())
    }

    fn on_msg_complete(&mut self, _p: &Parser) -> HookResult {
        self.events.push("msg_complete");
        Ok(())
    }
}

#[test]
fn chunks_complete_fires_before_trailers_and_msg_complete() {
    let raw = b"POST / HTTP/1.1\r\n\
        Host: h\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        3\r\nabc\r\n0\r\n\
        Trailer-Field: value\r\n\r\n";
    let mut parser = Parser::new(ParserType::Request);
    let mut recorder = OrderRecorder::default();
    parser.feed(&mut recorder, raw);
    assert!(parser.error().is_none(), "error: {:?}", parser.error());
    // Main headers (Host, Transfer-Encoding) fire first, then chunks_complete
    // at the zero-size chunk line, then the trailer key/value, then msg_complete.
    assert_eq!(
        recorder.events,
        vec![
            "hdr_key",
            "hdr_val",
            "hdr_key",
            "hdr_val",
            "chunks_complete",
            "hdr_key",
            "hdr_val",
            "msg_complete",
        ]
    );
}

#[test]
fn transfer_encoding_takes_precedence_over_content_length() {
    let raw = b"POST / HTTP/1.1\r\n\
        Host: h\r\n\
        Content-Length: 999\r\n\
        Transfer-Encoding: chunked\r\n\r\n\
        3\r\nabc\r\n0\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.body.as_deref(), Some("abc"));
}

// =========================================================================
// Responses
// =========================================================================

#[test]
fn simple_response() {
    let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";
    let msg = parse_response(raw).expect("should parse");
    assert_eq!(msg.status, Some(200));
    assert_eq!(msg.body.as_deref(), Some("ok"));
}

#[test]
fn informational_response_then_final_status() {
    let raw = b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";
    let mut parser = Parser::new(ParserType::Response);
    let mut collector = Collector::new();
    let n = parser.feed(&mut collector, raw);
    assert_eq!(n, raw.len());
    assert!(parser.error().is_none());
    assert!(parser.is_complete());
    let msg = collector.take_message();
    assert_eq!(msg.status, Some(200));
}

#[test]
fn response_tolerates_extra_space_before_status_code() {
    let raw = b"HTTP/1.1  200 OK\r\nContent-Length: 0\r\n\r\n";
    let msg = parse_response(raw).expect("should parse");
    assert_eq!(msg.status, Some(200));
}

#[test]
fn scheme_recognition_via_uri() {
    let raw = b"GET https://example.com/secure HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let msg = parse_request(raw).expect("should parse");
    assert_eq!(msg.scheme.as_deref(), Some("https"));
    assert_eq!(HttpMethod::recognize(b"GET"), HttpMethod::Get);
    assert_eq!(Scheme::recognize(b"https"), Scheme::Https);
}

// =========================================================================
// Incremental (streaming) parsing
// =========================================================================

#[test]
fn incremental_byte_by_byte() {
    let raw = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let mut parser = Parser::new(ParserType::Request);
    let mut hooks = NoopHooks;

    for &byte in raw {
        let consumed = parser.feed(&mut hooks, &[byte]);
        assert_eq!(consumed, 1);
        assert!(parser.error().is_none());
    }
    assert!(parser.is_complete());
}

#[test]
fn incremental_multi_chunk_with_body() {
    let part1 = b"POST /path HTTP/1.1\r\n";
    let part2 = b"Host: example.com\r\n";
    let part3 = b"Content-Length: 5\r\n\r\n";
    let part4 = b"Hello";

    let mut parser = Parser::new(ParserType::Request);
    let mut collector = Collector::new();

    parser.feed(&mut collector, part1);
    assert!(!parser.is_complete());
    parser.feed(&mut collector, part2);
    assert!(!parser.is_complete());
    parser.feed(&mut collector, part3);
    assert!(!parser.is_complete());
    parser.feed(&mut collector, part4);
    assert!(parser.is_complete());

    let msg = collector.take_message();
    assert_eq!(msg.path.as_deref(), Some("/path"));
    assert_eq!(msg.body.as_deref(), Some("Hello"));
}

// =========================================================================
// Bytes-consumed / restartability
// =========================================================================

#[test]
fn bytes_read_sums_to_total_fed() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\n\r\n";
    let mut parser = Parser::new(ParserType::Request);
    let mut hooks = NoopHooks;
    let mut total = 0u64;
    for &byte in raw {
        parser.feed(&mut hooks, &[byte]);
        total += parser.bytes_read();
    }
    assert_eq!(total, raw.len() as u64);
    assert_eq!(parser.total_bytes_read(), raw.len() as u64);
}

#[test]
fn parser_reset_and_reuse() {
    let raw1 = b"GET /a HTTP/1.1\r\nHost: h\r\n\r\n";
    let raw2 = b"POST /b HTTP/1.1\r\nHost: h\r\nContent-Length: 2\r\n\r\nOK";

    let mut parser = Parser::new(ParserType::Request);
    let mut collector = Collector::new();

    parser.feed(&mut collector, raw1);
    assert!(parser.is_complete());
    collector.take_message();

    parser.reset();

    parser.feed(&mut collector, raw2);
    assert!(parser.is_complete());
    let msg = collector.take_message();
    assert_eq!(msg.method.as_deref(), Some("POST"));
    assert_eq!(msg.path.as_deref(), Some("/b"));
    assert_eq!(msg.body.as_deref(), Some("OK"));
}

// =========================================================================
// Error conditions
// =========================================================================

#[test]
fn error_invalid_method() {
    let raw = b"FOOBAR / HTTP/1.1\r\nHost: h\r\n\r\n";
    assert!(parse_request(raw).is_err());
}

#[test]
fn error_invalid_version() {
    let raw = b"GET / HTTP/9.9\r\nHost: h\r\n\r\n";
    // Structurally valid single-digit version; parses fine — the parser
    // does not reject unrecognized version numbers, only malformed ones.
    assert!(parse_request(raw).is_ok());
}

#[test]
fn error_malformed_version_literal() {
    let raw = b"GET / HTTP/1x1\r\nHost: h\r\n\r\n";
    assert!(parse_request(raw).is_err());
}

#[test]
fn error_incomplete_request_no_end() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\n";
    match parse_request(raw) {
        Err(OneShotError::Incomplete) => {}
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn error_incomplete_body() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 100\r\n\r\nshort";
    match parse_request(raw) {
        Err(OneShotError::Incomplete) => {}
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn error_differing_content_lengths() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 3\r\nContent-Length: 5\r\n\r\nabc";
    assert!(parse_request(raw).is_err());
}

#[test]
fn error_non_numeric_content_length() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: abc\r\n\r\n";
    assert!(parse_request(raw).is_err());
}

#[test]
fn error_too_many_digits_content_length() {
    let raw = b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 123456789012345678901\r\n\r\n";
    assert!(parse_request(raw).is_err());
}

// =========================================================================
// Output formatting
// =========================================================================

#[test]
fn json_output_compact() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\n\r\n";
    let msg = parse_request(raw).unwrap();
    let json = format_json(&msg, false);
    assert!(json.contains("\"method\":\"GET\""));
    assert!(json.contains("\"uri\":\"/\""));
}

#[test]
fn json_output_pretty() {
    let raw = b"GET /pretty HTTP/1.1\r\nHost: h\r\n\r\n";
    let msg = parse_request(raw).unwrap();
    let json = format_json(&msg, true);
    assert!(json.contains('\n'));
    assert!(json.contains("  "));
}

#[test]
fn debug_output_contains_sections() {
    let raw = b"GET /test HTTP/1.1\r\nHost: h\r\n\r\n";
    let msg = parse_request(raw).unwrap();
    let dbg = format_debug(&msg);
    assert!(dbg.contains("=== HTTP Message ==="));
    assert!(dbg.contains("Method:  GET"));
    assert!(dbg.contains("--- Headers"));
    assert!(dbg.contains("--- No Body ---"));
}

#[test]
fn headers_only_output() {
    let raw = b"GET /path HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
    let msg = parse_request(raw).unwrap();
    let out = format_headers_only(&msg);
    assert!(out.starts_with("GET /path HTTP/1.1\n"));
    assert!(out.contains("Host: example.com\n"));
    assert!(out.contains("Accept: */*\n"));
}

// =========================================================================
// Edge cases
// =========================================================================

#[test]
fn large_body_content_length() {
    let body = "X".repeat(4096);
    let raw = format!(
        "POST / HTTP/1.1\r\n\
         Host: h\r\n\
         Content-Length: {}\r\n\r\n\
         {}",
        body.len(),
        body
    );
    let msg = parse_request(raw.as_bytes()).unwrap();
    assert_eq!(msg.body.as_deref(), Some(body.as_str()));
}

#[test]
fn many_headers() {
    let mut raw = String::from("GET / HTTP/1.1\r\n");
    for i in 0..100 {
        raw.push_str(&format!("X-Header-{i}: value-{i}\r\n"));
    }
    raw.push_str("\r\n");

    let msg = parse_request(raw.as_bytes()).unwrap();
    assert_eq!(msg.headers.len(), 100);
}

#[test]
fn header_with_obs_text_bytes() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\nX-Custom: hello\x80world\r\n\r\n";
    let msg = parse_request(raw).unwrap();
    let val = msg.header_value("X-Custom").unwrap();
    assert!(val.contains('\u{FFFD}'));
}
