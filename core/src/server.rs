/*
 * server.rs
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

//! TCP accept loop, per-connection dispatch, and clean shutdown.
//!
//! Grounded on the teacher's only server-shaped code, `oauth/flow.rs`'s
//! `TcpListener::bind(...).await` / `listener.accept().await` / read-request
//! then write-response sequence — generalized here from "handle exactly one
//! connection then return" into a looping accept with a shared shutdown flag.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::ParseError;
use crate::request::{parse_from, Request};
use crate::response::{default_headers, ResponseWriter};

/// A boxed future borrowing the writer for exactly `'a`, the lifetime of the
/// connection-handling call that produced it.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A connection handler: `(writer, request) -> ()`. Implemented for any
/// `Fn` that itself returns the boxed future, so a handler is written as a
/// plain async closure that boxes its own body (`|writer, request|
/// Box::pin(async move { ... })`), matching the teacher's `HttpConnection::
/// send` taking `impl ResponseHandler + Send + 'static` in spirit.
///
/// The single-associated-type shape (`Fn(...) -> Fut, Fut: Future + 'static`)
/// does not work here: a handler's future borrows `writer` for the call's
/// own lifetime `'a`, so its type depends on `'a` and cannot satisfy a
/// `'static` bound. Requiring the `Fn` to hand back `BoxFuture<'a>` directly
/// lets the lifetime flow through instead of being erased too early.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        writer: &'a mut ResponseWriter<TcpStream>,
        request: Request,
    ) -> BoxFuture<'a>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut ResponseWriter<TcpStream>, Request) -> BoxFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(
        &'a self,
        writer: &'a mut ResponseWriter<TcpStream>,
        request: Request,
    ) -> BoxFuture<'a> {
        self(writer, request)
    }
}

/// Owns the listener's lifetime handle: created listening, destroyed via
/// `close()`. One-way `Listening -> Closed` lifecycle.
pub struct Server {
    closed: Arc<AtomicBool>,
    local_addr: std::net::SocketAddr,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Bind `127.0.0.1:<config.port>`, spawn the accept loop, and return
    /// immediately. `config.port == 0` binds an OS-assigned ephemeral port,
    /// readable back via `local_addr()`.
    pub async fn serve<H: Handler>(config: Config, handler: H) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", config.port)).await?;
        let local_addr = listener.local_addr()?;
        let closed = Arc::new(AtomicBool::new(false));
        let handler = Arc::new(handler);

        let accept_task = tokio::spawn(accept_loop(listener, Arc::clone(&closed), config, handler));

        Ok(Self {
            closed,
            local_addr,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }

    /// Set the shutdown flag and wake a blocked `accept().await` with a
    /// best-effort local self-connect (Tokio's `accept` doesn't wake on a
    /// plain flag flip). Idempotent.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        // Self-pipe: the accept loop drops any connection observed after the
        // flag is set, so this wake connection is never dispatched.
        let _ = TcpStream::connect(self.local_addr).await;
        self.accept_task.abort();
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    closed: Arc<AtomicBool>,
    config: Config,
    handler: Arc<H>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                if closed.load(Ordering::SeqCst) {
                    // Woken by close()'s self-connect; nothing to dispatch.
                    continue;
                }
                let handler = Arc::clone(&handler);
                tokio::spawn(handle_connection(stream, config, handler));
            }
            Err(e) => {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                eprintln!("[server] accept error: {e}");
            }
        }
    }
}

async fn handle_connection<H: Handler>(mut stream: TcpStream, config: Config, handler: Arc<H>) {
    let _ = stream.set_nodelay(true);
    let parse_result = parse_from(&mut stream, &config).await;
    let mut writer = ResponseWriter::new(stream);

    match parse_result {
        Ok(request) => {
            handler.call(&mut writer, request).await;
        }
        Err(e) => {
            if let Err(write_err) = write_bad_request(&mut writer, &e).await {
                eprintln!("[conn] failed to write 400 response: {write_err}");
            }
        }
    }
    // `writer` (owning the stream) drops here, closing the socket on every
    // exit path (success, parse error, or the handler simply returning).
}

async fn write_bad_request(
    writer: &mut ResponseWriter<TcpStream>,
    error: &ParseError,
) -> Result<(), crate::error::WriterError> {
    let body = error.to_string();
    writer.write_status_line(400).await?;
    let mut headers = default_headers(body.len());
    headers.replace("Content-Type", "text/plain");
    writer.write_headers(&headers).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}
