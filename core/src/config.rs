/*
 * config.rs
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

//! Small environment-driven configuration, in the shape of the teacher's
//! `config.rs` free-function-over-environment-state pattern, scaled down:
//! there's no credentials file here, just a listen port and a buffer seed.

const PORT_ENV_VAR: &str = "HTTP_FROM_TCP_PORT";
const DEFAULT_PORT: u16 = 42069;
const DEFAULT_READ_BUFFER_SEED: usize = 8;

/// Server configuration: the listen port and the request parser's initial
/// `GrowableBuffer` capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub read_buffer_seed: usize,
}

impl Config {
    /// Read `HTTP_FROM_TCP_PORT` from the environment, falling back to
    /// `42069` when absent or unparsable as a `u16`.
    pub fn from_env() -> Self {
        let port = std::env::var(PORT_ENV_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            port,
            read_buffer_seed: DEFAULT_READ_BUFFER_SEED,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            read_buffer_seed: DEFAULT_READ_BUFFER_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_parses_valid_port() {
        std::env::set_var(PORT_ENV_VAR, "9001");
        let config = Config::from_env();
        std::env::remove_var(PORT_ENV_VAR);
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn from_env_falls_back_on_absent_var() {
        std::env::remove_var(PORT_ENV_VAR);
        let config = Config::from_env();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn from_env_falls_back_on_unparsable_var() {
        std::env::set_var(PORT_ENV_VAR, "not-a-port");
        let config = Config::from_env();
        std::env::remove_var(PORT_ENV_VAR);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn default_read_buffer_seed_matches_spec() {
        assert_eq!(Config::default().read_buffer_seed, DEFAULT_READ_BUFFER_SEED);
    }
}
