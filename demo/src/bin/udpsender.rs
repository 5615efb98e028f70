/*
 * udpsender.rs
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

//! Raw UDP line-sender: reads lines from stdin and fires each one at
//! `localhost:42069` over UDP, for manual interactive testing.
//!
//! Grounded 1:1 on the original source's `cmd/udpsender/main.go`.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UdpSocket;

#[tokio::main]
async fn main() {
    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket,
        Err(e) => {
            println!("error binding udp socket: {e}");
            return;
        }
    };
    if let Err(e) = socket.connect("localhost:42069").await {
        println!("error connecting with udp: {e}");
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">");
        let _ = tokio::io::stdout().flush().await;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                println!("error reading from stdin: {e}");
                continue;
            }
        };

        let mut line = line;
        line.push('\n');
        if let Err(e) = socket.send(line.as_bytes()).await {
            println!("error writing to udp conn: {e}");
        }
    }
}
