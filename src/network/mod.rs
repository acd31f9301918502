//! Network layer for talking to a Redis-compatible store
//!
//! This module holds the RESP codec, the transport seam used by dispatch
//! and the TCP implementation of it.

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::TcpTransport;
pub use protocol::{RespCodec, RespValue};
pub use transport::{expire_tokens, Transport};
