//! TCP transport speaking RESP to a Redis-compatible server

use super::protocol::{RespCodec, RespValue};
use super::transport::Transport;
use crate::config::ClientConfig;
use crate::error::{RdCmdError, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
}

/// A single lazily opened connection shared behind an async mutex.
///
/// Pipelines write every command before reading any reply.
pub struct TcpTransport {
    config: ClientConfig,
    codec: RespCodec,
    connection: Mutex<Option<Connection>>,
}

impl TcpTransport {
    pub fn new(address: impl Into<String>) -> Self {
        Self::from_config(ClientConfig {
            address: address.into(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            codec: RespCodec::new(),
            connection: Mutex::new(None),
        }
    }

    pub fn address(&self) -> &str {
        &self.config.address
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Open the connection now instead of on first use
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        Ok(())
    }

    pub async fn disconnect(&self) -> Result<()> {
        if let Some(mut conn) = self.connection.lock().await.take() {
            debug!("Disconnecting from {}", self.config.address);
            if let Err(e) = conn.stream.shutdown().await {
                warn!("Error during disconnect: {}", e);
            }
        }
        Ok(())
    }

    async fn open(&self) -> Result<Connection> {
        info!("Connecting to {}", self.config.address);

        let stream = self
            .timed(
                self.config.connect_timeout(),
                "connect",
                TcpStream::connect(&self.config.address),
            )
            .await?
            .map_err(|e| {
                error!("Failed to connect to {}: {}", self.config.address, e);
                RdCmdError::ConnectionError {
                    message: format!("Failed to connect to {}: {e}", self.config.address),
                    address: Some(self.config.address.clone()),
                }
            })?;

        if let Err(e) = stream.set_nodelay(self.config.tcp_nodelay) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        Ok(Connection {
            stream,
            buffer: BytesMut::with_capacity(4096),
        })
    }

    async fn timed<F: Future>(&self, limit: Duration, what: &str, fut: F) -> Result<F::Output> {
        timeout(limit, fut)
            .await
            .map_err(|_| RdCmdError::TimeoutError {
                message: format!("{what} to {} timed out after {limit:?}", self.config.address),
            })
    }

    /// Write all commands, then read one reply per command
    async fn round_trip(&self, commands: &[Vec<String>]) -> Result<Vec<RespValue>> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        let Some(conn) = guard.as_mut() else {
            return Err(RdCmdError::ConnectionError {
                message: "Not connected to server".to_string(),
                address: Some(self.config.address.clone()),
            });
        };

        let result = self.exchange(conn, commands).await;
        if result.is_err() {
            // The stream may hold half a reply; start over next time
            *guard = None;
        }
        result
    }

    async fn exchange(
        &self,
        conn: &mut Connection,
        commands: &[Vec<String>],
    ) -> Result<Vec<RespValue>> {
        let mut out = BytesMut::new();
        for tokens in commands {
            self.codec.encode_command(tokens, &mut out);
        }

        self.timed(
            self.config.write_timeout(),
            "write",
            conn.stream.write_all(&out),
        )
        .await?
        .map_err(|e| self.network_error("Failed to send command", e))?;

        let mut replies = Vec::with_capacity(commands.len());
        while replies.len() < commands.len() {
            replies.push(self.read_reply(conn).await?);
        }
        Ok(replies)
    }

    async fn read_reply(&self, conn: &mut Connection) -> Result<RespValue> {
        loop {
            if let Some(frame) = self.codec.decode(&mut conn.buffer)? {
                debug!("Received reply: {:?}", frame);
                return Ok(frame);
            }

            let read = self
                .timed(
                    self.config.read_timeout(),
                    "read",
                    conn.stream.read_buf(&mut conn.buffer),
                )
                .await?
                .map_err(|e| self.network_error("Failed to read reply", e))?;

            if read == 0 {
                return Err(RdCmdError::ConnectionError {
                    message: "Connection closed by server".to_string(),
                    address: Some(self.config.address.clone()),
                });
            }
        }
    }

    fn network_error(&self, context: &str, e: std::io::Error) -> RdCmdError {
        error!("{}: {}", context, e);
        RdCmdError::NetworkError {
            message: format!("{context}: {e}"),
            address: Some(self.config.address.clone()),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn execute(&self, tokens: &[String]) -> Result<RespValue> {
        debug!("Executing command: {:?}", tokens);
        let mut replies = self.round_trip(&[tokens.to_vec()]).await?;
        replies
            .pop()
            .ok_or_else(|| RdCmdError::protocol("no reply received"))
    }

    async fn execute_pipeline(&self, commands: &[Vec<String>]) -> Result<Vec<RespValue>> {
        if commands.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Executing pipeline of {} commands", commands.len());
        self.round_trip(commands).await
    }
}
