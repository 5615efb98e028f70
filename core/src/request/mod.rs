/*
 * mod.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Tagliacarte, a cross-platform email client.
 *
 * Tagliacarte is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Tagliacarte is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Tagliacarte.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Incremental HTTP/1.1 request parser: request line, headers, body.
//!
//! Drives the same shape as the teacher's `h1::ResponseParser`: a state enum
//! matched on each call, a `find_crlf` scan, and early return with `0`
//! consumed when a line isn't complete yet. The direction is reversed here
//! (parsing a request rather than a response) and the state lives on the
//! value being built (`Request`) rather than on a separate parser object,
//! since this spec's `Request` carries its own parse state.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::buffer::GrowableBuffer;
use crate::config::Config;
use crate::error::ParseError;
use crate::headers::Headers;

/// `{Initialized, ParsingHeaders, ParsingBody, Done}` from the request's
/// private state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// The request line: `METHOD target HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub request_target: String,
    pub http_version: String,
}

/// A request being assembled by the parser. Only meaningful once
/// `state() == RequestState::Done`.
#[derive(Debug, Clone)]
pub struct Request {
    request_line: Option<RequestLine>,
    headers: Headers,
    body: Vec<u8>,
    state: RequestState,
    /// Set once the request line names a `content-length`; `None` means "no
    /// body expected" per §4.2 (absent header and `Content-Length: 0` are
    /// treated identically).
    content_length: Option<usize>,
}

impl Request {
    fn new() -> Self {
        Self {
            request_line: None,
            headers: Headers::new(),
            body: Vec::new(),
            state: RequestState::Initialized,
            content_length: None,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Feed as much of `data` as can be consumed right now. Returns the
    /// number of bytes consumed; stops (without error) when a state needs
    /// more data than `data` holds.
    fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        loop {
            let n = self.parse_single(&data[total..])?;
            if n == 0 {
                return Ok(total);
            }
            total += n;
            if self.state == RequestState::Done {
                return Ok(total);
            }
        }
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            RequestState::Initialized => {
                let crlf = match find_crlf(data) {
                    Some(idx) => idx,
                    None => return Ok(0),
                };
                let line = parse_request_line(&data[..crlf])?;
                self.request_line = Some(line);
                self.state = RequestState::ParsingHeaders;
                Ok(crlf + 2)
            }
            RequestState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse(data)?;
                if done {
                    self.content_length = match self.headers.get("content-length") {
                        Some(v) => {
                            let l: usize = v.parse().map_err(|_| {
                                ParseError::MalformedHeaderField(format!(
                                    "content-length: {v}"
                                ))
                            })?;
                            if l == 0 {
                                None
                            } else {
                                Some(l)
                            }
                        }
                        None => None,
                    };
                    self.state = if self.content_length.is_some() {
                        RequestState::ParsingBody
                    } else {
                        RequestState::Done
                    };
                }
                Ok(consumed)
            }
            RequestState::ParsingBody => {
                let declared = self
                    .content_length
                    .expect("ParsingBody only reached with a positive content-length");
                if data.is_empty() {
                    return Ok(0);
                }
                self.body.extend_from_slice(data);
                if self.body.len() > declared {
                    return Err(ParseError::BodyLongerThanContentLength {
                        declared,
                        received: self.body.len(),
                    });
                }
                if self.body.len() == declared {
                    self.state = RequestState::Done;
                }
                Ok(data.len())
            }
            RequestState::Done => {
                debug_assert!(false, "parse_single called after Done");
                Ok(0)
            }
        }
    }
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

/// Split `line` on single ASCII spaces into exactly 3 parts and validate
/// each, per §4.2 "Request-line parsing".
fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| ParseError::MalformedRequestLine(String::from_utf8_lossy(line).into_owned()))?;
    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() != 3 {
        return Err(ParseError::MalformedRequestLine(text.to_string()));
    }
    let (method, target, version) = (parts[0], parts[1], parts[2]);

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::MalformedRequestLine(text.to_string()));
    }

    let version_parts: Vec<&str> = version.split('/').collect();
    if version_parts.len() != 2 || version_parts[0] != "HTTP" {
        return Err(ParseError::MalformedRequestLine(text.to_string()));
    }
    if version_parts[1] != "1.1" {
        return Err(ParseError::UnsupportedHttpVersion(version_parts[1].to_string()));
    }

    Ok(RequestLine {
        method: method.to_string(),
        request_target: target.to_string(),
        http_version: version_parts[1].to_string(),
    })
}

/// Pull bytes from `source` until a complete `Request` is assembled.
///
/// Mirrors the teacher's `HttpConnection::send_http1` read loop: a fixed
/// read into the buffer's tail, `extend` the filled region, hand the filled
/// slice to the state driver, compact by what it consumed, repeat until the
/// terminal state or EOF.
pub async fn parse_from<R: AsyncRead + Unpin>(
    source: &mut R,
    config: &Config,
) -> Result<Request, ParseError> {
    let mut request = Request::new();
    let mut buffer = GrowableBuffer::with_capacity(config.read_buffer_seed);

    loop {
        buffer.grow_if_full();
        let n = source.read(buffer.tail_mut()).await?;
        buffer.advance_read_to(n);

        let consumed = request.parse(buffer.filled())?;
        buffer.compact(consumed);

        if request.state() == RequestState::Done {
            return Ok(request);
        }

        if n == 0 {
            return Err(ParseError::IncompleteRequest(request.state()));
        }
    }
}

/// Synchronous adapter over `std::io::Read`, used by the chunk-invariance
/// tests so they can feed the parser 1 byte at a time without a Tokio
/// runtime.
pub fn parse_from_reader<R: std::io::Read>(
    source: &mut R,
    config: &Config,
) -> Result<Request, ParseError> {
    let mut request = Request::new();
    let mut buffer = GrowableBuffer::with_capacity(config.read_buffer_seed);

    loop {
        buffer.grow_if_full();
        let n = source.read(buffer.tail_mut())?;
        buffer.advance_read_to(n);

        let consumed = request.parse(buffer.filled())?;
        buffer.compact(consumed);

        if request.state() == RequestState::Done {
            return Ok(request);
        }

        if n == 0 {
            return Err(ParseError::IncompleteRequest(request.state()));
        }
    }
}
