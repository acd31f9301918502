//! Test utilities for rdcmd
//!
//! Environment helpers for config tests and a scripted transport that
//! records every call it receives.

use crate::error::{RdCmdError, Result};
use crate::network::{RespValue, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::Mutex;
use std::time::Duration;

/// Global mutex to ensure all config-related tests run serially
/// This prevents environment variable pollution between tests
pub static GLOBAL_CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

/// Remove all RDCMD_ environment variables and return them for restoration
pub fn clean_rdcmd_env() -> HashMap<String, String> {
    let original: HashMap<String, String> = env::vars()
        .filter(|(key, _)| key.starts_with("RDCMD_"))
        .collect();

    for key in original.keys() {
        env::remove_var(key);
    }

    original
}

/// Helper function to restore environment variables
pub fn restore_env(original_values: HashMap<String, String>) {
    for (key, _) in env::vars() {
        if key.starts_with("RDCMD_") {
            env::remove_var(&key);
        }
    }

    for (key, value) in original_values {
        env::set_var(key, value);
    }
}

/// In-memory transport answering from a queue of scripted replies
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RespValue>>>,
    executed: Mutex<Vec<Vec<String>>>,
    expires: Mutex<Vec<(String, Duration)>>,
    expire_error: Mutex<Option<RdCmdError>>,
    batches: Mutex<usize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Result<RespValue>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn failing_expire(self, err: RdCmdError) -> Self {
        *self.expire_error.lock().unwrap() = Some(err);
        self
    }

    pub fn executed(&self) -> Vec<Vec<String>> {
        self.executed.lock().unwrap().clone()
    }

    pub fn expires(&self) -> Vec<(String, Duration)> {
        self.expires.lock().unwrap().clone()
    }

    pub fn batches(&self) -> usize {
        *self.batches.lock().unwrap()
    }

    fn next_reply(&self) -> Result<RespValue> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RespValue::SimpleString("OK".to_string())))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, tokens: &[String]) -> Result<RespValue> {
        self.executed.lock().unwrap().push(tokens.to_vec());
        self.next_reply()
    }

    async fn execute_pipeline(&self, commands: &[Vec<String>]) -> Result<Vec<RespValue>> {
        *self.batches.lock().unwrap() += 1;
        let mut replies = Vec::with_capacity(commands.len());
        for tokens in commands {
            self.executed.lock().unwrap().push(tokens.clone());
            replies.push(self.next_reply()?);
        }
        Ok(replies)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<RespValue> {
        self.expires.lock().unwrap().push((key.to_string(), ttl));
        match self.expire_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(RespValue::Integer(1)),
        }
    }
}
