/*
 * http_integration.rs
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

//! Integration test for the HTTP server: binds the real `Server` on an
//! ephemeral port and drives it over a real `TcpStream`, exercising the
//! accept loop and writer together rather than just the parser in
//! isolation.
//!
//! Placement mirrors the teacher's own `core/tests/http_integration.rs`.

use http_from_tcp::{default_headers, BoxFuture, Config, Request, ResponseWriter, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn serves_minimal_get_end_to_end() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::serve(
        config,
        |writer: &mut ResponseWriter<TcpStream>, _req: Request| -> BoxFuture<'_> {
            Box::pin(async move {
                let body = b"hi";
                writer.write_status_line(200).await.unwrap();
                writer
                    .write_headers(&default_headers(body.len()))
                    .await
                    .unwrap();
                writer.write_body(body).await.unwrap();
            })
        },
    )
    .await
    .unwrap();

    let addr = server.local_addr();
    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8(response).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("hi"));

    server.close().await;
}

#[tokio::test]
async fn malformed_request_yields_400() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::serve(
        config,
        |_writer: &mut ResponseWriter<TcpStream>, _req: Request| -> BoxFuture<'_> {
            Box::pin(async move {})
        },
    )
    .await
    .unwrap();

    let addr = server.local_addr();
    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"NOT A REQUEST\r\n\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8(response).unwrap();
    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    server.close().await;
}

#[tokio::test]
async fn fixed_body_post_round_trips_through_handler() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let server = Server::serve(
        config,
        |writer: &mut ResponseWriter<TcpStream>, req: Request| -> BoxFuture<'_> {
            Box::pin(async move {
                writer.write_status_line(200).await.unwrap();
                writer
                    .write_headers(&default_headers(req.body().len()))
                    .await
                    .unwrap();
                writer.write_body(req.body()).await.unwrap();
            })
        },
    )
    .await
    .unwrap();

    let addr = server.local_addr();
    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"POST /echo HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\n\r\nhowdy")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8(response).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("howdy"));

    server.close().await;
}
