/*
 * error.rs
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

//! Errors surfaced by the header store, request parser, and response writer.

use std::fmt;

use crate::request::RequestState;

/// Failure raised while parsing a request off the wire.
#[derive(Debug)]
pub enum ParseError {
    /// The request line did not split into exactly `METHOD SP target SP HTTP/1.1`.
    MalformedRequestLine(String),
    /// A header line violated the field-name/field-value grammar.
    MalformedHeaderField(String),
    /// The request line named an HTTP version other than `1.1`.
    UnsupportedHttpVersion(String),
    /// The stream hit EOF while the parser was still in a non-terminal state.
    IncompleteRequest(RequestState),
    /// The body grew past the declared `Content-Length`.
    BodyLongerThanContentLength { declared: usize, received: usize },
    /// The underlying stream returned an I/O error.
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedRequestLine(line) => {
                write!(f, "malformed request line: {line:?}")
            }
            ParseError::MalformedHeaderField(line) => {
                write!(f, "malformed header field: {line:?}")
            }
            ParseError::UnsupportedHttpVersion(version) => {
                write!(f, "unsupported HTTP version: {version:?}")
            }
            ParseError::IncompleteRequest(state) => {
                write!(f, "incomplete request, stream ended in state {state:?}")
            }
            ParseError::BodyLongerThanContentLength { declared, received } => {
                write!(
                    f,
                    "body longer than Content-Length: declared {declared}, received {received}"
                )
            }
            ParseError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Failure raised by the response writer's state machine.
#[derive(Debug)]
pub enum WriterError {
    /// A write was attempted in a state that does not permit it.
    WriterStateViolation { attempted: &'static str, state: &'static str },
    /// The underlying sink returned an I/O error.
    Io(std::io::Error),
}

impl fmt::Display for WriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterError::WriterStateViolation { attempted, state } => write!(
                f,
                "cannot {attempted} while writer is in state {state}"
            ),
            WriterError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for WriterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriterError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WriterError {
    fn from(e: std::io::Error) -> Self {
        WriterError::Io(e)
    }
}
