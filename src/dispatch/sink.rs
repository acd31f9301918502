//! Where assembled commands go: straight to a transport, or into a batch

use crate::network::Transport;
use crate::result::ReplySlot;
use async_trait::async_trait;
use std::time::Duration;

/// Receives assembled commands together with the slot their reply fills
#[async_trait]
pub trait CommandSink: Send {
    async fn submit(&mut self, tokens: Vec<String>, slot: ReplySlot);

    async fn submit_expire(&mut self, key: &str, ttl: Duration, slot: ReplySlot);
}

/// Runs each command immediately and resolves its slot before returning
pub struct DirectSink<'a> {
    transport: &'a dyn Transport,
}

impl<'a> DirectSink<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CommandSink for DirectSink<'_> {
    async fn submit(&mut self, tokens: Vec<String>, slot: ReplySlot) {
        let raw = self.transport.execute(&tokens).await;
        slot.resolve(raw);
    }

    async fn submit_expire(&mut self, key: &str, ttl: Duration, slot: ReplySlot) {
        let raw = self.transport.expire(key, ttl).await;
        slot.resolve(raw);
    }
}
