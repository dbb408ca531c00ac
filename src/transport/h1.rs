//! HTTP/1.1 message framing over a raw byte stream.
//!
//! Requests are written byte-by-byte so header order is exactly what the
//! caller asked for. Responses are parsed from the complete buffer received
//! on a `Connection: close` exchange; nothing here touches the network.

use bytes::Bytes;

use crate::client::DEFAULT_PORT;
use crate::encoding::ContentCoding;
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::request::RequestMessage;
use crate::response::ResponseMessage;
use crate::version::HttpVersion;

/// Header block terminator.
const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

/// Serialize a request into the literal bytes of an HTTP/1.1 message.
///
/// Line order: request line, `Host`, `Connection: close`, `Accept-Encoding`
/// (when encodings are accepted), `Content-Length` and body headers (when a
/// body is present), then caller headers in insertion order.
pub fn serialize_request(request: &RequestMessage) -> Result<Vec<u8>> {
    validate_request_line(request)?;
    for (name, value) in request
        .content_headers()
        .iter()
        .chain(request.header_list())
    {
        validate_header_name(name)?;
        validate_header_value(value)?;
    }

    let body = request.body_bytes();
    let mut out = Vec::with_capacity(256 + body.map_or(0, |b| b.len()));

    // Request line: METHOD request-target HTTP/1.1\r\n
    out.extend_from_slice(request.method().as_str().as_bytes());
    out.push(b' ');
    out.extend_from_slice(request.target().as_bytes());
    out.extend_from_slice(b" HTTP/1.1\r\n");

    match request.port() {
        DEFAULT_PORT => write_header(&mut out, "Host", request.host()),
        port => write_header(&mut out, "Host", &format!("{}:{}", request.host(), port)),
    }
    // No pooling: every exchange owns its connection.
    write_header(&mut out, "Connection", "close");

    let accept_encoding = request.accepted_encodings().header_value();
    if let Some(value) = &accept_encoding {
        write_header(&mut out, "Accept-Encoding", value);
    }

    if let Some(body) = body {
        write_header(&mut out, "Content-Length", &body.len().to_string());
        for (name, value) in request.content_headers() {
            write_header(&mut out, name, value);
        }
    }

    for (name, value) in request.header_list() {
        // Framing headers belong to the serializer.
        if name.eq_ignore_ascii_case("host")
            || name.eq_ignore_ascii_case("connection")
            || name.eq_ignore_ascii_case("content-length")
        {
            continue;
        }
        if accept_encoding.is_some() && name.eq_ignore_ascii_case("accept-encoding") {
            continue;
        }
        write_header(&mut out, name, value);
    }

    // End of headers
    out.extend_from_slice(b"\r\n");

    if let Some(body) = body {
        out.extend_from_slice(body);
    }

    Ok(out)
}

fn write_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Parse a complete response buffer.
///
/// `Transfer-Encoding: chunked` bodies are reassembled first, then any
/// `Content-Encoding` is undone on the reassembled bytes.
pub fn parse_response(data: &[u8]) -> Result<ResponseMessage> {
    let delimiter = find_header_end(data).ok_or_else(|| {
        Error::malformed_response(format!(
            "no header terminator in {} bytes of response",
            data.len()
        ))
    })?;
    let body_start = delimiter + HEADER_DELIMITER.len();

    let head = String::from_utf8_lossy(&data[..delimiter]);
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let (version, status, reason) = parse_status_line(status_line)?;
    let headers = parse_header_lines(lines);

    let raw_body = &data[body_start..];
    let body = if headers.get("Transfer-Encoding").map(str::trim) == Some("chunked") {
        decode_chunked(raw_body)?
    } else {
        Bytes::copy_from_slice(raw_body)
    };

    let body = match headers.get("Content-Encoding") {
        Some(token) => {
            let coding = ContentCoding::from_token(token.trim())?;
            // 204/304 and HEAD replies carry the header with no body.
            if body.is_empty() {
                body
            } else {
                coding.decode(&body)?
            }
        }
        None => body,
    };

    Ok(ResponseMessage::new(version, status, reason, headers, body))
}

/// Parse `HTTP/<major>.<minor> <code> <reason>`. The reason may be empty.
fn parse_status_line(line: &str) -> Result<(HttpVersion, u16, String)> {
    let malformed = || Error::MalformedStatusLine(line.to_string());

    let (version, rest) = line.split_once(' ').ok_or_else(malformed)?;
    let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));

    let (major, minor) = version
        .strip_prefix("HTTP/")
        .and_then(|v| v.split_once('.'))
        .ok_or_else(malformed)?;
    let major = parse_digits::<u8>(major).ok_or_else(malformed)?;
    let minor = parse_digits::<u8>(minor).ok_or_else(malformed)?;

    if code.len() != 3 {
        return Err(malformed());
    }
    let status = parse_digits::<u16>(code).ok_or_else(malformed)?;

    Ok((HttpVersion::new(major, minor), status, reason.to_string()))
}

/// `str::parse` accepts a leading `+`; status lines do not.
fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Split header lines at the first `:`. Nameless lines are dropped; a line
/// without a colon is kept as a valueless header.
fn parse_header_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Headers {
    let mut headers = Headers::new();
    for line in lines {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (line.trim(), None),
        };
        if name.is_empty() {
            continue;
        }
        headers.insert(name, value);
    }
    headers
}

/// Reassemble a chunked body.
///
/// Per RFC 9112 Section 7.1:
/// chunked-body = *chunk last-chunk trailer-section CRLF
///
/// Stops at the zero-size chunk; trailers are ignored.
fn decode_chunked(data: &[u8]) -> Result<Bytes> {
    let mut body = Vec::with_capacity(data.len());
    let mut pos = 0;

    loop {
        let rest = &data[pos..];
        let (size, line_end) = match find_chunk_size(rest) {
            Some(parsed) => parsed,
            None if find_crlf(rest).is_some() => {
                return Err(Error::chunk_decode(format!(
                    "invalid chunk size line at offset {}",
                    pos
                )));
            }
            None => {
                return Err(Error::chunk_decode("body ended before the last chunk"));
            }
        };
        pos += line_end;

        if size == 0 {
            return Ok(Bytes::from(body));
        }

        let data_end = pos
            .checked_add(size)
            .ok_or_else(|| Error::chunk_decode("chunk size overflow"))?;
        let chunk_end = data_end
            .checked_add(2)
            .ok_or_else(|| Error::chunk_decode("chunk size overflow"))?;
        if chunk_end > data.len() {
            return Err(Error::chunk_decode(format!(
                "chunk of {} bytes truncated ({} available)",
                size,
                data.len() - pos
            )));
        }
        if &data[data_end..chunk_end] != b"\r\n" {
            return Err(Error::chunk_decode(format!(
                "chunk of {} bytes not followed by CRLF",
                size
            )));
        }

        body.extend_from_slice(&data[pos..data_end]);
        pos = chunk_end;
    }
}

/// Find the start of the header terminator (\r\n\r\n).
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_DELIMITER.len())
        .position(|window| window == HEADER_DELIMITER)
}

/// Parse a chunk size from the buffer, returning (size, end_of_line_position).
fn find_chunk_size(buffer: &[u8]) -> Option<(usize, usize)> {
    let i = find_crlf(buffer)?;
    // Hex size, possibly followed by chunk extensions after ';'
    let line = std::str::from_utf8(&buffer[..i]).ok()?;
    let size_part = line.split(';').next()?.trim();
    if size_part.is_empty() || !size_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let size = usize::from_str_radix(size_part, 16).ok()?;
    Some((size, i + 2))
}

/// Find the first CRLF in a buffer, returning its position.
fn find_crlf(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\r\n")
}

/// Method, target and host end up on the wire unescaped.
fn validate_request_line(request: &RequestMessage) -> Result<()> {
    let target = request.target();
    if target.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err(Error::InvalidRequest(format!(
            "request target contains whitespace or control characters: {:?}",
            target
        )));
    }
    let host = request.host();
    if host.is_empty() {
        return Err(Error::InvalidRequest("empty host".into()));
    }
    if host.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err(Error::InvalidRequest(format!(
            "host contains whitespace or control characters: {:?}",
            host
        )));
    }
    Ok(())
}

/// Validate a header name per RFC 9110 Section 5.1.
///
/// Header names must be tokens: 1*tchar where tchar excludes
/// delimiters, control characters, and whitespace.
fn validate_header_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_header("empty header name"));
    }
    if !name.bytes().all(is_tchar) {
        return Err(Error::invalid_header(format!(
            "invalid character in header name: {:?}",
            name
        )));
    }
    Ok(())
}

/// Check if a byte is a valid token character per RFC 9110.
fn is_tchar(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z'
    )
}

/// Header values must not contain NUL, CR, or LF (prevents header injection).
fn validate_header_value(value: &str) -> Result<()> {
    if value.bytes().any(|b| b == 0 || b == b'\r' || b == b'\n') {
        return Err(Error::invalid_header(
            "invalid character in header value (CR/LF/NUL not allowed)",
        ));
    }
    Ok(())
}
