//! Core HTTP server implementation.
//!
//! This module implements the connection dispatcher. It is responsible only
//! for networking concerns such as:
//! - accepting TCP connections,
//! - reading raw bytes from the network,
//! - writing raw bytes back to the client.
//!
//! Request parsing, routing and response generation are delegated to the
//! `http` and `handler` modules.
//!
//! ## Request handling flow
//!
//! Every accepted connection is handed to its own `async-std` task and carries
//! exactly one request:
//!
//! 1. Read once from the stream into a buffer of
//!    [`buffer_size`](crate::config::ServerConfig::buffer_size) bytes
//! 2. Parse the bytes into an [`HttpRequest`](crate::http::request::HttpRequest)
//!    (delegated to [`http::parser::parse`](crate::http::parser::parse))
//! 3. Route and run the handler
//!    (delegated to [`handler::handle_request`](crate::handler::handle_request))
//! 4. Serialize and write the response back to the client, then close
//!
//! Any fault along the way is logged and the connection is dropped without a
//! response. The accept loop itself is never affected.
//!
//! Tasks are spawned fire-and-forget with no upper bound on their number, and a
//! client that never sends anything holds its task forever.

use async_std::net::{TcpListener, TcpStream};
use async_std::prelude::*;
use async_std::task;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::handler::router::Router;
use crate::handler::{self, HandlerError};
use crate::http::parser::{self, ParserError};

/// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Faults scoped to a single connection.
#[derive(Debug, Error)]
enum ConnectionError {
    #[error("i/o error while reading request: {0}")]
    Read(#[source] io::Error),

    #[error("connection closed before any data was received")]
    ConnectionClosed,

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("failed to encode response: {0}")]
    Encode(#[source] io::Error),

    #[error("i/o error while writing response: {0}")]
    Write(#[source] io::Error),
}

pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    buffer_size: usize,
}

impl Server {
    /// Binds the listening socket. The router is frozen from here on.
    pub async fn bind(config: &ServerConfig, router: Router) -> io::Result<Self> {
        if config.buffer_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer_size must be greater than zero",
            ));
        }

        let listener = TcpListener::bind(config.socket_addr()).await?;

        Ok(Self {
            listener,
            router: Arc::new(router),
            buffer_size: config.buffer_size,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop forever, spawning one task per connection.
    pub async fn run(self) -> io::Result<()> {
        info!(addr = %self.local_addr()?, routes = self.router.len(), "server listening");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!(%err, "accept failed, retrying");
                    task::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            debug!(%peer, "connection accepted");
            let router = Arc::clone(&self.router);
            let buffer_size = self.buffer_size;

            task::spawn(async move {
                match Self::handle_client(stream, &router, buffer_size).await {
                    Ok(()) => debug!(%peer, "connection closed"),
                    Err(ConnectionError::ConnectionClosed) => {
                        debug!(%peer, "client closed connection without sending a request")
                    }
                    Err(err) => warn!(%peer, %err, "dropping connection"),
                }
            });
        }
    }

    /// Reads one request, serves it and closes the stream by dropping it.
    async fn handle_client(
        mut stream: TcpStream,
        router: &Router,
        buffer_size: usize,
    ) -> Result<(), ConnectionError> {
        let raw = Self::read_request(&mut stream, buffer_size).await?;

        let req = parser::parse(&raw)?;
        debug!(method = %req.method, path = %req.path, "request parsed");

        let response = handler::handle_request(router, req)?;
        let status = response.status;
        let bytes = response.into_bytes().map_err(ConnectionError::Encode)?;

        stream.write_all(&bytes).await.map_err(ConnectionError::Write)?;
        stream.flush().await.map_err(ConnectionError::Write)?;
        debug!(%status, bytes = bytes.len(), "response sent");

        Ok(())
    }

    /// A single read; anything beyond `buffer_size` bytes is never seen.
    async fn read_request(
        stream: &mut TcpStream,
        buffer_size: usize,
    ) -> Result<Vec<u8>, ConnectionError> {
        let mut buffer = vec![0; buffer_size];

        loop {
            match stream.read(&mut buffer).await {
                Ok(0) => return Err(ConnectionError::ConnectionClosed),
                Ok(n) => {
                    buffer.truncate(n);
                    return Ok(buffer);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConnectionError::Read(e)),
            }
        }
    }
}
