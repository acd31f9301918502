//! Batched execution
//!
//! Commands queue up with their reply slots and run in one round trip when
//! the caller executes the pipeline. Handles stay unresolved until then.

use super::sink::CommandSink;
use crate::builder::CommandBuilder;
use crate::error::{RdCmdError, Result};
use crate::network::{expire_tokens, Transport};
use crate::result::ReplySlot;
use crate::template::CommandFamily;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
struct Queued {
    tokens: Vec<String>,
    slot: ReplySlot,
}

/// A caller-owned batch of commands
#[derive(Debug, Default)]
pub struct Pipeline {
    queued: Vec<Queued>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Token sequences in submission order
    pub fn commands(&self) -> impl Iterator<Item = &[String]> {
        self.queued.iter().map(|q| q.tokens.as_slice())
    }

    /// Start a command that will be queued into this pipeline
    pub fn cmd<'a>(&'a mut self, family: &'a CommandFamily, name: &str) -> CommandBuilder<'a> {
        CommandBuilder::batched(self, family, name)
    }

    /// Run everything queued so far and resolve every handle.
    ///
    /// When the batch as a whole fails, every handle receives that error.
    /// The pipeline is empty afterwards either way.
    pub async fn exec(&mut self, transport: &dyn Transport) -> Result<usize> {
        let queued = std::mem::take(&mut self.queued);
        if queued.is_empty() {
            return Ok(0);
        }

        let commands: Vec<Vec<String>> = queued.iter().map(|q| q.tokens.clone()).collect();
        debug!("Flushing pipeline of {} commands", commands.len());

        let replies = match transport.execute_pipeline(&commands).await {
            Ok(replies) if replies.len() == queued.len() => replies,
            Ok(replies) => {
                let err = RdCmdError::protocol(format!(
                    "pipeline returned {} replies for {} commands",
                    replies.len(),
                    queued.len()
                ));
                return Err(fail_all(queued, err));
            }
            Err(e) => return Err(fail_all(queued, e)),
        };

        let count = queued.len();
        for (q, reply) in queued.into_iter().zip(replies) {
            q.slot.resolve(Ok(reply));
        }
        Ok(count)
    }

    /// Drop queued commands without running them; their handles never
    /// resolve and keep reporting `NotReady`.
    pub fn discard(&mut self) -> usize {
        let dropped = self.queued.len();
        self.queued.clear();
        dropped
    }
}

fn fail_all(queued: Vec<Queued>, err: RdCmdError) -> RdCmdError {
    warn!("Pipeline of {} commands failed: {}", queued.len(), err);
    for q in queued {
        q.slot.resolve(Err(err.clone()));
    }
    err
}

#[async_trait]
impl CommandSink for Pipeline {
    async fn submit(&mut self, tokens: Vec<String>, slot: ReplySlot) {
        self.queued.push(Queued { tokens, slot });
    }

    async fn submit_expire(&mut self, key: &str, ttl: Duration, slot: ReplySlot) {
        self.queued.push(Queued {
            tokens: expire_tokens(key, ttl),
            slot,
        });
    }
}
