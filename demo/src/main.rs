/*
 * main.rs
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

//! Demo HTTP server: `/` -> 200, `/yourproblem` -> 400, `/myproblem` -> 500,
//! each a static HTML body. Binds on loopback, waits for `SIGINT`/`SIGTERM`,
//! closes the server, and exits.
//!
//! Grounded 1:1 on the original source's `cmd/httpserver/main.go` handler
//! dispatch and HTML bodies, rewritten against `tokio::signal` instead of
//! Go's blocking `os/signal` channel.

use http_from_tcp::{default_headers, BoxFuture, Config, Request, ResponseWriter, Server};
use tokio::net::TcpStream;

const HTML_200: &str = r#"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>"#;

const HTML_400: &str = r#"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>"#;

const HTML_500: &str = r#"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>"#;

async fn write_html_page(writer: &mut ResponseWriter<TcpStream>, code: u16, body: &str) {
    if let Err(e) = writer.write_status_line(code).await {
        eprintln!("[handler] failed writing status line: {e}");
        return;
    }
    let mut headers = default_headers(body.len());
    headers.replace("Content-Type", "text/html");
    if let Err(e) = writer.write_headers(&headers).await {
        eprintln!("[handler] failed writing headers: {e}");
        return;
    }
    if let Err(e) = writer.write_body(body.as_bytes()).await {
        eprintln!("[handler] failed writing body: {e}");
    }
}

fn default_handler<'a>(writer: &'a mut ResponseWriter<TcpStream>, request: Request) -> BoxFuture<'a> {
    Box::pin(async move {
        let target = request
            .request_line()
            .map(|line| line.request_target.as_str())
            .unwrap_or("");

        match target {
            "/yourproblem" => write_html_page(writer, 400, HTML_400).await,
            "/myproblem" => write_html_page(writer, 500, HTML_500).await,
            _ => write_html_page(writer, 200, HTML_200).await,
        }
    })
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = Config::from_env();

    let server = match Server::serve(config, default_handler).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("[server] error starting server: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    println!("[server] listening on port {}", config.port);

    wait_for_shutdown_signal().await;

    server.close().await;
    println!("[server] gracefully stopped");
    std::process::ExitCode::SUCCESS
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
