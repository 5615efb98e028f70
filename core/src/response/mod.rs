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

//! Response writer state machine: `StatusLine -> Headers -> Body -> Trailers`.
//!
//! Grounded on `json::writer::JsonWriter`'s `State` enum matched on each
//! `write_*` call, transitioning only after a successful emit — the same
//! shape, turned from a JSON token stream into an HTTP/1.1 wire writer.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::WriterError;
use crate::headers::Headers;

/// `{StatusLine, Headers, Body, Trailers}` from §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
}

impl WriterState {
    fn name(self) -> &'static str {
        match self {
            WriterState::StatusLine => "status-line",
            WriterState::Headers => "headers",
            WriterState::Body => "body",
            WriterState::Trailers => "trailers",
        }
    }
}

/// Status code -> reason phrase, for the codes named in §4.3. Anything else
/// gets an empty reason phrase.
fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Build the default header set for a body of length `len`: `Content-Length`,
/// `Connection: close`, `Content-Type: text/plain`. Handlers may replace,
/// add, or delete any of these before calling `write_headers`.
pub fn default_headers(len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", &len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}

/// Stateful writer over an `AsyncWrite` sink enforcing the legal response
/// sequence. Each write method is only legal in one state; an out-of-order
/// call fails with `WriterError::WriterStateViolation` and emits nothing.
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::StatusLine,
        }
    }

    fn check_state(&self, attempted: &'static str, expected: WriterState) -> Result<(), WriterError> {
        if self.state != expected {
            return Err(WriterError::WriterStateViolation {
                attempted,
                state: self.state.name(),
            });
        }
        Ok(())
    }

    /// Emit `HTTP/1.1 <code> <reason>\r\n`. Legal only in `StatusLine`.
    pub async fn write_status_line(&mut self, code: u16) -> Result<(), WriterError> {
        self.check_state("write_status_line", WriterState::StatusLine)?;
        let mut buf = BytesMut::with_capacity(32);
        buf.put_slice(b"HTTP/1.1 ");
        buf.put_slice(code.to_string().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(reason_phrase(code).as_bytes());
        buf.put_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Emit each `key: value\r\n` line followed by the terminating blank
    /// line. Legal only in `Headers`.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriterError> {
        self.check_state("write_headers", WriterState::Headers)?;
        let mut buf = BytesMut::with_capacity(256);
        for (key, value) in headers.iter() {
            buf.put_slice(key.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Emit `bytes` verbatim. Legal only in `Body`; stays in `Body`.
    pub async fn write_body(&mut self, bytes: &[u8]) -> Result<usize, WriterError> {
        self.check_state("write_body", WriterState::Body)?;
        self.sink.write_all(bytes).await?;
        Ok(bytes.len())
    }

    /// Emit one chunk: `<hex-len>\r\n<bytes>\r\n`, lowercase hex without
    /// leading zeros (except for `0`). Legal only in `Body`; stays in `Body`.
    pub async fn write_chunked_body(&mut self, bytes: &[u8]) -> Result<usize, WriterError> {
        self.check_state("write_chunked_body", WriterState::Body)?;
        let mut buf = BytesMut::with_capacity(bytes.len() + 16);
        buf.put_slice(format!("{:x}\r\n", bytes.len()).as_bytes());
        buf.put_slice(bytes);
        buf.put_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        Ok(bytes.len())
    }

    /// Emit the zero-length chunk line `0\r\n`. Legal only in `Body`;
    /// transitions to `Trailers`.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, WriterError> {
        self.check_state("write_chunked_body_done", WriterState::Body)?;
        self.sink.write_all(b"0\r\n").await?;
        self.state = WriterState::Trailers;
        Ok(0)
    }

    /// Emit trailer field lines followed by the terminating blank line.
    /// Legal only in `Trailers`. The terminating CRLF is always emitted,
    /// even for zero trailers (§9 open-question decision), so the wire form
    /// is always at minimum `0\r\n\r\n`.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriterError> {
        self.check_state("write_trailers", WriterState::Trailers)?;
        let mut buf = BytesMut::with_capacity(128);
        for (key, value) in trailers.iter() {
            buf.put_slice(key.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        Ok(())
    }

    /// Give the sink back, e.g. to inspect an in-memory buffer in tests.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_minimal_ok(body: &[u8]) -> Vec<u8> {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(200).await.unwrap();
        w.write_headers(&default_headers(body.len())).await.unwrap();
        w.write_body(body).await.unwrap();
        w.into_inner()
    }

    #[tokio::test]
    async fn status_line_known_codes() {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(200).await.unwrap();
        assert_eq!(w.into_inner(), b"HTTP/1.1 200 OK\r\n");

        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(400).await.unwrap();
        assert_eq!(w.into_inner(), b"HTTP/1.1 400 Bad Request\r\n");

        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(500).await.unwrap();
        assert_eq!(w.into_inner(), b"HTTP/1.1 500 Internal Server Error\r\n");
    }

    #[tokio::test]
    async fn unknown_code_has_empty_reason() {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(418).await.unwrap();
        assert_eq!(w.into_inner(), b"HTTP/1.1 418 \r\n");
    }

    #[tokio::test]
    async fn default_headers_set_expected_fields() {
        let h = default_headers(5);
        assert_eq!(h.get("content-length"), Some("5"));
        assert_eq!(h.get("connection"), Some("close"));
        assert_eq!(h.get("content-type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn full_response_round_trips_through_writer() {
        let out = write_minimal_ok(b"hi").await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("hi"));
        assert!(text.contains("content-length: 2\r\n"));
    }

    #[tokio::test]
    async fn out_of_order_write_is_rejected_and_emits_nothing() {
        let mut w = ResponseWriter::new(Vec::new());
        let err = w.write_body(b"too soon").await.unwrap_err();
        assert!(matches!(err, WriterError::WriterStateViolation { .. }));
        assert!(w.into_inner().is_empty());
    }

    #[tokio::test]
    async fn chunked_round_trip_matches_literal_scenario() {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(200).await.unwrap();
        w.write_headers(&Headers::new()).await.unwrap();
        w.write_chunked_body(b"hello").await.unwrap();
        w.write_chunked_body(b" world").await.unwrap();
        w.write_chunked_body_done().await.unwrap();
        w.write_trailers(&Headers::new()).await.unwrap();
        let out = w.into_inner();
        assert!(out.ends_with(b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n"));
    }

    #[tokio::test]
    async fn chunked_body_dechunks_back_to_original() {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(200).await.unwrap();
        w.write_headers(&Headers::new()).await.unwrap();
        w.write_chunked_body(b"hel").await.unwrap();
        w.write_chunked_body(b"lo wor").await.unwrap();
        w.write_chunked_body(b"ld").await.unwrap();
        w.write_chunked_body_done().await.unwrap();
        w.write_trailers(&Headers::new()).await.unwrap();
        let out = w.into_inner();

        let body_start = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        let mut rest = &out[body_start..];
        let mut dechunked = Vec::new();
        loop {
            let line_end = rest.windows(2).position(|w| w == b"\r\n").unwrap();
            let len = usize::from_str_radix(std::str::from_utf8(&rest[..line_end]).unwrap(), 16).unwrap();
            rest = &rest[line_end + 2..];
            if len == 0 {
                break;
            }
            dechunked.extend_from_slice(&rest[..len]);
            rest = &rest[len + 2..];
        }
        assert_eq!(dechunked, b"hello world");
    }
}
