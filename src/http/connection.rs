use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::engine::Engine;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 1024;

/// One client connection, driven request by request until it closes.
pub struct Connection {
    stream: TcpStream,
    buffer: Vec<u8>,
    state: ConnectionState,
    engine: Arc<Engine>,
}

pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Rejecting(ParseError),
    Writing { writer: ResponseWriter, keep_alive: bool },
    Closed,
}

enum Inbound {
    Request(Request),
    Malformed(ParseError),
    Eof,
}

impl Connection {
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            engine,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let next = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await? {
                    Inbound::Request(request) => ConnectionState::Dispatching(request),
                    Inbound::Malformed(err) => ConnectionState::Rejecting(err),
                    Inbound::Eof => ConnectionState::Closed,
                },
                ConnectionState::Dispatching(request) => self.dispatch(&request),
                ConnectionState::Rejecting(err) => self.reject(err),
                ConnectionState::Writing { mut writer, keep_alive } => {
                    writer.write_to_stream(&mut self.stream).await?;
                    if keep_alive {
                        ConnectionState::Reading
                    } else {
                        ConnectionState::Closed
                    }
                }
                ConnectionState::Closed => return Ok(()),
            };
            self.state = next;
        }
    }

    /// Runs the engine for `request` and queues its response.
    fn dispatch(&self, request: &Request) -> ConnectionState {
        let mut response = Response::new();
        self.engine.serve(request, &mut response);

        ConnectionState::Writing {
            writer: ResponseWriter::new(&response),
            keep_alive: request.keep_alive(),
        }
    }

    /// Queues a 400 and closes afterwards; the rest of the buffer is unusable.
    fn reject(&mut self, err: ParseError) -> ConnectionState {
        tracing::warn!(error = %err, "Rejecting malformed request");
        self.buffer.clear();

        ConnectionState::Writing {
            writer: ResponseWriter::new(&Response::bad_request()),
            keep_alive: false,
        }
    }

    async fn read_request(&mut self) -> std::io::Result<Inbound> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Inbound::Request(request));
                }
                Err(ParseError::Incomplete) => {}
                Err(err) => return Ok(Inbound::Malformed(err)),
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(pending = self.buffer.len(), "Peer closed mid-request");
                }
                return Ok(Inbound::Eof);
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}
