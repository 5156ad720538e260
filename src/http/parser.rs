use bytes::BytesMut;
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use url::form_urlencoded;

use crate::http::request::{Method, Request, find_header, parse_content_length};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The stream ended before a single header line arrived.
    #[error("malformed request: no header present")]
    NoHeader,
    #[error("malformed request: {0}")]
    Malformed(&'static str),
    #[error("unsupported method: {0}")]
    InvalidMethod(String),
    #[error("header block exceeds limit of {limit} bytes")]
    HeaderTooLarge { limit: usize },
    #[error("body of {length} bytes exceeds limit of {limit}")]
    BodyTooLarge { length: usize, limit: usize },
    #[error("connection closed after {read} of {expected} body bytes")]
    Incomplete { read: usize, expected: usize },
    #[error("timed out reading request")]
    TimedOut,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The `MalformedRequest` kind: no usable header block.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::NoHeader | ParseError::Malformed(_))
    }

    /// Errors caused by what the client sent, worth a 400 before closing.
    /// An empty stream gets nothing back.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ParseError::Malformed(_)
                | ParseError::InvalidMethod(_)
                | ParseError::HeaderTooLarge { .. }
                | ParseError::BodyTooLarge { .. }
        )
    }
}

/// Reads exactly one request off `reader`.
///
/// Header lines are read up to the first blank line (or end of stream), then
/// `Content-Length` bytes of body for methods that carry one. The header block,
/// line terminators included, may not exceed `max_header_bytes`.
pub async fn read_request<R>(
    reader: &mut R,
    max_header_bytes: usize,
    max_body_bytes: usize,
) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let lines = read_header_lines(reader, max_header_bytes).await?;
    let (request_line, header_lines) = lines
        .split_first()
        .ok_or(ParseError::NoHeader)?;

    let (method, target, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in header_lines {
        if let Some((key, value)) = parse_header_line(line) {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    let body = if method.has_body() {
        let content_length = find_header(&headers, "Content-Length")
            .map(parse_content_length)
            .unwrap_or(0);
        read_body(reader, content_length, max_body_bytes).await?
    } else {
        BytesMut::new()
    };

    Ok(Request::assemble(
        method,
        target,
        version.to_string(),
        headers,
        body.freeze(),
    ))
}

async fn read_header_lines<R>(reader: &mut R, limit: usize) -> Result<Vec<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut remaining = limit;

    loop {
        if remaining == 0 {
            return Err(ParseError::HeaderTooLarge { limit });
        }

        let mut line = String::new();
        let n = (&mut *reader)
            .take(remaining as u64)
            .read_line(&mut line)
            .await?;
        if n == 0 {
            break;
        }

        remaining -= n;
        if remaining == 0 && !line.ends_with('\n') {
            return Err(ParseError::HeaderTooLarge { limit });
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.to_string());
    }

    Ok(lines)
}

async fn read_body<R>(reader: &mut R, length: usize, limit: usize) -> Result<BytesMut, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    if length > limit {
        return Err(ParseError::BodyTooLarge { length, limit });
    }

    let mut body = BytesMut::zeroed(length);
    let mut read = 0;
    while read < length {
        let n = reader.read(&mut body[read..]).await?;
        if n == 0 {
            return Err(ParseError::Incomplete { read, expected: length });
        }
        read += n;
    }

    Ok(body)
}

/// Splits the request line into method, target and version.
///
/// The version token is optional and defaults to `HTTP/1.1`.
pub fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::Malformed("empty request line"))?;
    let target = parts
        .next()
        .ok_or(ParseError::Malformed("request line has no target"))?;
    let version = parts.next().unwrap_or("HTTP/1.1");

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::InvalidMethod(method_str.to_string()))?;

    Ok((method, target, version))
}

/// Splits a header line on the first `:`. Lines without one yield `None`.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Decodes `k=v&k2=v2`. Pairs without `=` are dropped; last duplicate wins.
pub fn parse_form(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| pair.contains('='))
        .filter_map(|pair| form_urlencoded::parse(pair.as_bytes()).next())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Query strings decode exactly like form bodies; validity of the raw pairs
/// is checked separately by [`Request::has_malformed_query`].
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    parse_form(raw)
}
