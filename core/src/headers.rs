/*
 * headers.rs
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

//! Case-insensitive, comma-folding header store with an incremental line parser.

use std::collections::HashMap;

use crate::error::ParseError;

/// RFC 7230 token characters besides alphanumerics.
const EXTRA_TOKEN_CHARS: &[u8] = b"!#$%&'*+-.^_`|~";

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || EXTRA_TOKEN_CHARS.contains(&b)
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

/// A case-insensitive, multi-valued field map. Duplicate `set` calls for the
/// same key are comma-space folded into one value, per RFC 7230 §3.2.2.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    // Preserves first-insertion order for reproducible iteration in tests and
    // for the response writer, which copies a Headers into its own wire order.
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one field line (or the terminating blank line) from the front of
    /// `data`. Returns `(consumed, done)` on success.
    ///
    /// - No CRLF found: `(0, false)` — caller must supply more data.
    /// - CRLF at offset 0: `(2, true)` — end-of-headers sentinel consumed.
    /// - Otherwise: the line is parsed as `name: value`, stored, and
    ///   `(line_len + 2, false)` is returned.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let crlf = match find_crlf(data) {
            Some(idx) => idx,
            None => return Ok((0, false)),
        };
        if crlf == 0 {
            return Ok((2, true));
        }

        let line = &data[..crlf];
        let colon = line.iter().position(|&b| b == b':').ok_or_else(|| {
            ParseError::MalformedHeaderField(String::from_utf8_lossy(line).into_owned())
        })?;
        let (raw_key, raw_value) = (&line[..colon], &line[colon + 1..]);

        if raw_key.last() == Some(&b' ') {
            return Err(ParseError::MalformedHeaderField(
                String::from_utf8_lossy(line).into_owned(),
            ));
        }

        let key = trim_ascii(raw_key);
        if key.is_empty() || !key.iter().all(|&b| is_token_byte(b)) {
            return Err(ParseError::MalformedHeaderField(
                String::from_utf8_lossy(line).into_owned(),
            ));
        }
        let value = trim_ascii(raw_value);

        let key = std::str::from_utf8(key)
            .map_err(|_| ParseError::MalformedHeaderField(String::from_utf8_lossy(line).into_owned()))?;
        let value = String::from_utf8_lossy(value).into_owned();

        self.set(key, &value);
        Ok((crlf + 2, false))
    }

    /// Lowercase `key`, trim `value`, and comma-fold onto any existing value.
    pub fn set(&mut self, key: &str, value: &str) {
        let key = key.to_ascii_lowercase();
        let value = value.trim_matches(is_ascii_ws as fn(char) -> bool);
        match self.values.get_mut(&key) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                self.order.push(key.clone());
                self.values.insert(key, value.to_string());
            }
        }
    }

    /// Lowercase `key`, trim `value`, overwrite unconditionally.
    pub fn replace(&mut self, key: &str, value: &str) {
        let key = key.to_ascii_lowercase();
        let value = value.trim_matches(is_ascii_ws as fn(char) -> bool);
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn delete(&mut self, key: &str) {
        let key = key.to_ascii_lowercase();
        if self.values.remove(&key).is_some() {
            self.order.retain(|k| k != &key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_lowercase())
    }

    /// Stable, insertion-ordered iteration over `(key, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |k| (k.as_str(), self.values[k].as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_ascii_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b' ' && b != b'\t').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != b' ' && b != b'\t').map(|i| i + 1).unwrap_or(start);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_needs_more_data_without_crlf() {
        let mut h = Headers::new();
        let (n, done) = h.parse(b"Host: localhost").unwrap();
        assert_eq!(n, 0);
        assert!(!done);
    }

    #[test]
    fn parse_end_of_headers_sentinel() {
        let mut h = Headers::new();
        let (n, done) = h.parse(b"\r\nignored").unwrap();
        assert_eq!(n, 2);
        assert!(done);
    }

    #[test]
    fn parse_one_field_line() {
        let mut h = Headers::new();
        let (n, done) = h.parse(b"Host: localhost:42069\r\n\r\n").unwrap();
        assert_eq!(n, "Host: localhost:42069\r\n".len());
        assert!(!done);
        assert_eq!(h.get("host"), Some("localhost:42069"));
    }

    #[test]
    fn case_insensitive_lookup() {
        let mut h = Headers::new();
        h.parse(b"HOST: localhost:42069\r\n").unwrap();
        assert_eq!(h.get("host"), Some("localhost:42069"));
        assert_eq!(h.get("Host"), Some("localhost:42069"));
    }

    #[test]
    fn duplicate_headers_are_comma_folded() {
        let mut h = Headers::new();
        h.set("Accept-Encoding", "gzip");
        h.set("accept-encoding", "brotli");
        assert_eq!(h.get("Accept-Encoding"), Some("gzip, brotli"));
    }

    #[test]
    fn space_before_colon_is_rejected() {
        let mut h = Headers::new();
        let err = h.parse(b"Host : localhost\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderField(_)));
    }

    #[test]
    fn non_ascii_byte_in_field_name_is_rejected() {
        let mut h = Headers::new();
        let line = "H\u{00a9}st: localhost:42069\r\n".as_bytes().to_vec();
        let err = h.parse(&line).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderField(_)));
    }

    #[test]
    fn replace_overwrites_unconditionally() {
        let mut h = Headers::new();
        h.set("Content-Type", "text/plain");
        h.replace("Content-Type", "text/html");
        assert_eq!(h.get("content-type"), Some("text/html"));
    }

    #[test]
    fn delete_removes_entry() {
        let mut h = Headers::new();
        h.set("X-Test", "1");
        h.delete("x-test");
        assert_eq!(h.get("X-Test"), None);
    }
}
