//! Command assembly: family + operation + arguments -> wire tokens

use super::substitute::{normalize_whitespace, render_value, substitute};
use super::value::{ArgValue, Args};
use super::{CommandFamily, SubCommand};
use crate::error::Result;
use tracing::warn;

/// A fully resolved invocation
#[derive(Debug, Clone)]
pub struct AssembledCommand<'f> {
    /// `[verb, key?, ...params, ...trailing]`
    pub tokens: Vec<String>,
    pub key: String,
    pub command: &'f SubCommand,
}

impl AssembledCommand<'_> {
    pub fn verb(&self) -> &str {
        &self.tokens[0]
    }
}

/// Build the token sequence for `name` in `family`.
///
/// Defaults declared on the operation are layered under `args` without
/// modifying it. Trailing values are appended after the templated
/// arguments, one token each. A trailing value with no wire form (a list
/// nested in a list) is left out and logged.
pub fn assemble<'f>(
    family: &'f CommandFamily,
    name: &str,
    args: &Args,
    trailing: &[ArgValue],
) -> Result<AssembledCommand<'f>> {
    let command = family.command(name)?;
    let args = args.layered_over(&command.default_params);

    let params: Vec<String> = if command.params.is_empty() {
        Vec::new()
    } else {
        normalize_whitespace(&command.params)
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(|token| substitute(token, &args))
            .collect()
    };

    let key = if command.use_key {
        substitute(family.key_template(), &args)
    } else {
        family.key_template().to_string()
    };

    let verb = command.command_name.as_deref().unwrap_or(name);

    let mut tokens = Vec::with_capacity(2 + params.len() + trailing.len());
    tokens.push(verb.to_string());
    if !key.is_empty() {
        tokens.push(key.clone());
    }
    tokens.extend(params);
    for (position, value) in trailing.iter().enumerate() {
        match render_value(value) {
            Some(token) => tokens.push(token),
            None => warn!(
                command = verb,
                position,
                "dropping trailing argument with no wire form"
            ),
        }
    }

    Ok(AssembledCommand {
        tokens,
        key,
        command,
    })
}
