//! Named operations shared by most key families
//!
//! Families opt in by declaring the operations, usually through
//! [`with_ttl_commands`].

pub mod ttl;

pub use ttl::with_ttl_commands;

pub const EXPIRE: &str = "EXPIRE";
pub const PEXPIRE: &str = "PEXPIRE";
pub const TTL: &str = "TTL";
