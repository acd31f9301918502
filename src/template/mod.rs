//! Command templates
//!
//! A [`CommandFamily`] groups the operations that share one key template
//! (everything done to a hash, a sorted set, a counter...). Each operation
//! is a [`SubCommand`]: an argument template, default parameters and the
//! policy flags the dispatcher applies after execution.

pub mod assemble;
pub mod substitute;
pub mod value;

pub use assemble::{assemble, AssembledCommand};
pub use substitute::{normalize_whitespace, render_value, replace_placeholders, substitute};
pub use value::{ArgValue, Args};

use crate::error::{RdCmdError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Produces the TTL applied after each invocation
///
/// Evaluated on every call, never cached, so policies may jitter.
#[derive(Clone)]
pub struct ExpirePolicy(Arc<dyn Fn() -> Duration + Send + Sync>);

impl ExpirePolicy {
    pub fn new(f: impl Fn() -> Duration + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A policy that always yields `ttl`
    pub fn fixed(ttl: Duration) -> Self {
        Self::new(move || ttl)
    }

    pub fn ttl(&self) -> Duration {
        (self.0)()
    }
}

impl fmt::Debug for ExpirePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExpirePolicy(..)")
    }
}

/// One operation of a family
#[derive(Debug, Clone)]
pub struct SubCommand {
    /// Wire verb sent instead of the operation name, letting several
    /// operations share one command with different argument layouts.
    pub command_name: Option<String>,
    pub params: String,
    pub default_params: Args,
    /// When false the family key template is sent literally.
    pub use_key: bool,
    /// Keep the "no such entry" error instead of folding it into an
    /// empty result.
    pub preserve_not_found: bool,
    pub expire: Option<ExpirePolicy>,
}

impl Default for SubCommand {
    fn default() -> Self {
        Self {
            command_name: None,
            params: String::new(),
            default_params: Args::new(),
            use_key: true,
            preserve_not_found: false,
            expire: None,
        }
    }
}

impl SubCommand {
    pub fn new(params: impl Into<String>) -> Self {
        Self {
            params: params.into(),
            ..Self::default()
        }
    }

    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.default_params.insert(name, value);
        self
    }

    pub fn without_key(mut self) -> Self {
        self.use_key = false;
        self
    }

    pub fn preserve_not_found(mut self) -> Self {
        self.preserve_not_found = true;
        self
    }

    pub fn expire_with(mut self, f: impl Fn() -> Duration + Send + Sync + 'static) -> Self {
        self.expire = Some(ExpirePolicy::new(f));
        self
    }

    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.expire = Some(ExpirePolicy::fixed(ttl));
        self
    }
}

/// A key template and the operations declared against it
#[derive(Debug, Clone, Default)]
pub struct CommandFamily {
    key: String,
    commands: HashMap<String, SubCommand>,
}

impl CommandFamily {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            commands: HashMap::new(),
        }
    }

    pub fn with_command(mut self, name: impl Into<String>, command: SubCommand) -> Self {
        self.commands.insert(name.into(), command);
        self
    }

    pub fn key_template(&self) -> &str {
        &self.key
    }

    /// Look up an operation; an unknown name means the family was
    /// declared wrong.
    pub fn command(&self, name: &str) -> Result<&SubCommand> {
        self.commands
            .get(name)
            .ok_or_else(|| RdCmdError::UnknownCommand {
                command: name.to_string(),
                family: self.key.clone(),
            })
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
