/*
 * lib.rs
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

//! HTTP/1.1 server built directly on a TCP byte stream: an incremental
//! request parser, a case-insensitive header store, and a state-machine
//! response writer, wired together by a small Tokio accept loop.
//!
//! No pre-existing HTTP library is used anywhere in this crate — parsing and
//! writing happen on raw bytes, by design (see the crate's design notes).

pub mod buffer;
pub mod config;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use config::Config;
pub use error::{ParseError, WriterError};
pub use headers::Headers;
pub use request::{parse_from, parse_from_reader, Request, RequestLine, RequestState};
pub use response::{default_headers, ResponseWriter};
pub use server::{BoxFuture, Handler, Server};
