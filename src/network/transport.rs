//! The seam between command dispatch and whatever talks to the store

use super::RespValue;
use crate::commands::{EXPIRE, PEXPIRE};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Executes fully assembled commands against a Redis-compatible store
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run one command and return its raw reply frame
    async fn execute(&self, tokens: &[String]) -> Result<RespValue>;

    /// Run a batch of commands, replies in submission order.
    ///
    /// An `Err` means the batch as a whole failed and no reply can be
    /// attributed to an individual command.
    async fn execute_pipeline(&self, commands: &[Vec<String>]) -> Result<Vec<RespValue>> {
        let mut replies = Vec::with_capacity(commands.len());
        for tokens in commands {
            replies.push(self.execute(tokens).await?);
        }
        Ok(replies)
    }

    /// Set a time-to-live on `key`
    async fn expire(&self, key: &str, ttl: Duration) -> Result<RespValue> {
        self.execute(&expire_tokens(key, ttl)).await
    }
}

/// `EXPIRE key secs`, or `PEXPIRE key ms` when the TTL is not whole seconds
///
/// A non-zero TTL below one millisecond is sent as 1ms; `PEXPIRE key 0`
/// would delete the key.
pub fn expire_tokens(key: &str, ttl: Duration) -> Vec<String> {
    if ttl.subsec_nanos() == 0 {
        vec![EXPIRE.to_string(), key.to_string(), ttl.as_secs().to_string()]
    } else {
        vec![
            PEXPIRE.to_string(),
            key.to_string(),
            ttl.as_millis().max(1).to_string(),
        ]
    }
}
