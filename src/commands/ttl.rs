//! TTL operations (EXPIRE, TTL)

use super::{EXPIRE, TTL};
use crate::builder::CommandBuilder;
use crate::client::Client;
use crate::dispatch::Pipeline;
use crate::template::{Args, CommandFamily, SubCommand};

/// Declare `EXPIRE key {{seconds}}` and `TTL key` on `family`
pub fn with_ttl_commands(family: CommandFamily) -> CommandFamily {
    family
        .with_command(EXPIRE, SubCommand::new("{{seconds}}"))
        .with_command(TTL, SubCommand::new(""))
}

impl Client {
    /// EXPIRE key seconds. Reads back as a boolean: whether the key existed.
    pub fn expire<'a>(&'a self, family: &'a CommandFamily, args: Args) -> CommandBuilder<'a> {
        self.cmd(family, EXPIRE).args(args)
    }

    /// TTL key. Reads back as an integer: seconds left, -1 without
    /// expiry, -2 when the key does not exist.
    pub fn ttl<'a>(&'a self, family: &'a CommandFamily, args: Args) -> CommandBuilder<'a> {
        self.cmd(family, TTL).args(args)
    }
}

impl Pipeline {
    pub fn expire<'a>(&'a mut self, family: &'a CommandFamily, args: Args) -> CommandBuilder<'a> {
        self.cmd(family, EXPIRE).args(args)
    }

    pub fn ttl<'a>(&'a mut self, family: &'a CommandFamily, args: Args) -> CommandBuilder<'a> {
        self.cmd(family, TTL).args(args)
    }
}
