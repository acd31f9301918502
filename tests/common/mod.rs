//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::BytesMut;
use rdcmd::network::RespCodec;
use rdcmd::{RdCmdError, RespValue, Result, Transport};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Transport answering from a script and counting every call
#[derive(Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Result<RespValue>>>,
    pub commands: Mutex<Vec<Vec<String>>>,
    pub expires: Mutex<Vec<(String, Duration)>>,
    pub calls: AtomicUsize,
    pub pipelines: AtomicUsize,
    fail_expire: bool,
    fail_pipeline: Option<RdCmdError>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: Result<RespValue>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_failing_expire(mut self) -> Self {
        self.fail_expire = true;
        self
    }

    pub fn with_failing_pipeline(mut self, err: RdCmdError) -> Self {
        self.fail_pipeline = Some(err);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    pub fn expires(&self) -> Vec<(String, Duration)> {
        self.expires.lock().unwrap().clone()
    }

    fn next(&self) -> Result<RespValue> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RespValue::SimpleString("OK".to_string())))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, tokens: &[String]) -> Result<RespValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().unwrap().push(tokens.to_vec());
        self.next()
    }

    async fn execute_pipeline(&self, commands: &[Vec<String>]) -> Result<Vec<RespValue>> {
        self.pipelines.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_pipeline {
            return Err(err.clone());
        }
        let mut replies = Vec::new();
        for tokens in commands {
            self.commands.lock().unwrap().push(tokens.clone());
            replies.push(self.next()?);
        }
        Ok(replies)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<RespValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.expires.lock().unwrap().push((key.to_string(), ttl));
        if self.fail_expire {
            Err(RdCmdError::Server {
                message: "ERR expire rejected".to_string(),
            })
        } else {
            Ok(RespValue::Integer(1))
        }
    }
}

pub fn bulk(s: &str) -> RespValue {
    RespValue::BulkString(Some(s.to_string()))
}

#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    Hash(Vec<(String, String)>),
}

#[derive(Debug, Default)]
pub struct FakeStore {
    entries: HashMap<String, Entry>,
    ttls: HashMap<String, i64>,
    pub log: Vec<Vec<String>>,
}

impl FakeStore {
    fn apply(&mut self, cmd: &[String]) -> RespValue {
        self.log.push(cmd.to_vec());
        let Some(verb) = cmd.first() else {
            return RespValue::Error("ERR empty command".to_string());
        };
        let arg = |i: usize| cmd.get(i).cloned().unwrap_or_default();

        match verb.to_uppercase().as_str() {
            "PING" => RespValue::SimpleString("PONG".to_string()),
            "SET" => {
                self.entries.insert(arg(1), Entry::Str(arg(2)));
                self.ttls.remove(&arg(1));
                RespValue::SimpleString("OK".to_string())
            }
            "SETEX" => {
                let Ok(secs) = arg(2).parse::<i64>() else {
                    return RespValue::Error("ERR value is not an integer".to_string());
                };
                self.entries.insert(arg(1), Entry::Str(arg(3)));
                self.ttls.insert(arg(1), secs);
                RespValue::SimpleString("OK".to_string())
            }
            "GET" => match self.entries.get(&arg(1)) {
                Some(Entry::Str(v)) => bulk(v),
                Some(_) => RespValue::Error("WRONGTYPE".to_string()),
                None => RespValue::BulkString(None),
            },
            "INCRBY" => {
                let by = arg(2).parse::<i64>().unwrap_or(0);
                let current = match self.entries.get(&arg(1)) {
                    Some(Entry::Str(v)) => v.parse::<i64>().unwrap_or(0),
                    _ => 0,
                };
                self.entries
                    .insert(arg(1), Entry::Str((current + by).to_string()));
                RespValue::Integer(current + by)
            }
            "HSET" => {
                let mut added = 0;
                let entry = self
                    .entries
                    .entry(arg(1))
                    .or_insert_with(|| Entry::Hash(Vec::new()));
                if let Entry::Hash(fields) = entry {
                    for pair in cmd[2..].chunks(2) {
                        if pair.len() != 2 {
                            break;
                        }
                        match fields.iter_mut().find(|field| field.0 == pair[0]) {
                            Some(existing) => existing.1 = pair[1].clone(),
                            None => {
                                fields.push((pair[0].clone(), pair[1].clone()));
                                added += 1;
                            }
                        }
                    }
                }
                RespValue::Integer(added)
            }
            "HGETALL" => match self.entries.get(&arg(1)) {
                Some(Entry::Hash(fields)) => RespValue::Array(
                    fields
                        .iter()
                        .flat_map(|(f, v)| [bulk(f), bulk(v)])
                        .collect(),
                ),
                _ => RespValue::Array(Vec::new()),
            },
            "EXPIRE" | "PEXPIRE" => {
                if !self.entries.contains_key(&arg(1)) {
                    return RespValue::Integer(0);
                }
                let Ok(amount) = arg(2).parse::<i64>() else {
                    return RespValue::Error("ERR value is not an integer".to_string());
                };
                // a non-positive TTL deletes the key, as the real store does
                if amount <= 0 {
                    self.entries.remove(&arg(1));
                    self.ttls.remove(&arg(1));
                    return RespValue::Integer(1);
                }
                let secs = if verb.eq_ignore_ascii_case("PEXPIRE") {
                    (amount + 999) / 1000
                } else {
                    amount
                };
                self.ttls.insert(arg(1), secs);
                RespValue::Integer(1)
            }
            "TTL" => {
                if !self.entries.contains_key(&arg(1)) {
                    RespValue::Integer(-2)
                } else {
                    RespValue::Integer(*self.ttls.get(&arg(1)).unwrap_or(&-1))
                }
            }
            other => RespValue::Error(format!("ERR unknown command '{other}'")),
        }
    }
}

/// A tiny RESP server over a shared [`FakeStore`], for end-to-end tests
pub struct FakeServer {
    pub addr: SocketAddr,
    pub store: Arc<Mutex<FakeStore>>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store = Arc::new(Mutex::new(FakeStore::default()));

        let shared = Arc::clone(&store);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve(socket, Arc::clone(&shared)));
            }
        });

        Self { addr, store }
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn log(&self) -> Vec<Vec<String>> {
        self.store.lock().unwrap().log.clone()
    }
}

async fn serve(mut socket: TcpStream, store: Arc<Mutex<FakeStore>>) {
    let codec = RespCodec::new();
    let mut input = BytesMut::with_capacity(4096);

    loop {
        match socket.read_buf(&mut input).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let mut output = BytesMut::new();
        while let Ok(Some(frame)) = codec.decode(&mut input) {
            let cmd: Vec<String> = match frame {
                RespValue::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_text().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            let reply = store.lock().unwrap().apply(&cmd);
            codec.encode(&reply, &mut output);
        }

        if !output.is_empty() && socket.write_all(&output).await.is_err() {
            return;
        }
    }
}
