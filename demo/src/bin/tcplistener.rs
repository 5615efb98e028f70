/*
 * tcplistener.rs
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

//! Raw TCP smoke listener: accepts connections on loopback, parses the
//! request line with the core parser, logs it, and never responds.
//!
//! Grounded 1:1 on the original source's `cmd/tcplistener/main.go`.

use http_from_tcp::{parse_from, Config};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    let listener = match TcpListener::bind(("127.0.0.1", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            println!("error starting tcp listener: {e}");
            return;
        }
    };

    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                println!("error accepting new connection: {e}");
                continue;
            }
        };
        println!("Connection accepted: {addr}");

        match parse_from(&mut stream, &config).await {
            Ok(request) => {
                let line = request.request_line().expect("Done state always has a request line");
                println!(
                    "Request line:\n- Method: {}\n- Target: {}\n- Version: {}",
                    line.method, line.request_target, line.http_version
                );
            }
            Err(e) => println!("error parsing request: {e}"),
        }
    }
}
