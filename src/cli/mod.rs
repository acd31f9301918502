//! Command Line Interface for rdcmd
//!
//! Renders templates offline and runs single commands against a server,
//! printing replies the way redis-cli does.

pub mod commands;

pub use commands::{Cli, Commands};

use crate::client::Client;
use crate::commands::with_ttl_commands;
use crate::error::{RdCmdError, Result};
use crate::network::RespValue;
use crate::result::{Reply, ResultShape, Z};
use crate::template::{assemble, ArgValue, Args, CommandFamily, SubCommand};
use std::collections::HashMap;
use tracing::debug;

/// Run one CLI command and return what should be printed
pub async fn run(command: Commands, client: &Client) -> Result<String> {
    match command {
        Commands::Render {
            key,
            template,
            verb,
            without_key,
            args,
            name,
            trailing,
        } => {
            let mut sub = SubCommand::new(template);
            if let Some(verb) = verb {
                sub = sub.command_name(verb);
            }
            if without_key {
                sub = sub.without_key();
            }
            let family = CommandFamily::new(key).with_command(name.clone(), sub);
            let args: Args = args.into_iter().map(|(n, v)| (n, ArgValue::from(v))).collect();
            let trailing: Vec<ArgValue> = trailing.into_iter().map(ArgValue::from).collect();

            let assembled = assemble(&family, &name, &args, &trailing)?;
            Ok(assembled.tokens.join(" "))
        }
        Commands::Exec { shape, tokens } => {
            let Some((verb, rest)) = tokens.split_first() else {
                return Err(RdCmdError::InternalError {
                    message: "no command given".to_string(),
                    component: Some("cli".to_string()),
                });
            };
            let shape = ResultShape::from_name(&shape);
            debug!("exec {} as {}", verb, shape);

            // Raw tokens go through as trailing values of a keyless operation
            let family = CommandFamily::new("").with_command(verb.clone(), SubCommand::new(""));
            let mut builder = client.cmd(&family, verb);
            for token in rest {
                builder = builder.trailing(token.as_str());
            }
            let reply = builder.resolve(shape).await.result()?;
            Ok(format_reply(&reply))
        }
        Commands::Expire { key, seconds } => {
            let family = key_family();
            let args = Args::new().with("key", key).with("seconds", seconds as i64);
            let set = client.expire(&family, args).int().await.result()?;
            Ok(format!("(integer) {set}"))
        }
        Commands::Ttl { key } => {
            let family = key_family();
            let ttl = client
                .ttl(&family, Args::new().with("key", key))
                .int()
                .await
                .result()?;
            Ok(format!("(integer) {ttl}"))
        }
    }
}

fn key_family() -> CommandFamily {
    with_ttl_commands(CommandFamily::new("{{key}}"))
}

/// Format a decoded reply for display
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::Generic(value) => format_value(value),
        Reply::String(s) => format!("\"{s}\""),
        Reply::Int(i) => format!("(integer) {i}"),
        Reply::Float(f) => format!("(double) {f}"),
        Reply::Bool(b) => format!("(boolean) {b}"),
        Reply::Slice(items) => numbered(items.iter().map(format_value)),
        Reply::StringSlice(items) => numbered(items.iter().map(|s| format!("\"{s}\""))),
        Reply::IntSlice(items) => numbered(items.iter().map(|i| format!("(integer) {i}"))),
        Reply::FloatSlice(items) => numbered(items.iter().map(|f| format!("(double) {f}"))),
        Reply::BoolSlice(items) => numbered(items.iter().map(|b| format!("(boolean) {b}"))),
        Reply::KeyValueSlice(items) => {
            numbered(items.iter().map(|kv| format!("{} => \"{}\"", kv.key, kv.value)))
        }
        Reply::MapStringString(map) => mapping(map, |v| format!("\"{v}\"")),
        Reply::MapStringInt(map) => mapping(map, |v| format!("(integer) {v}")),
        Reply::MapStringValue(map) => mapping(map, format_value),
        Reply::MapStringStringSlice(maps) => {
            numbered(maps.iter().map(|m| mapping(m, |v| format!("\"{v}\""))))
        }
        Reply::MapStringValueSlice(maps) => {
            numbered(maps.iter().map(|m| mapping(m, format_value)))
        }
        Reply::MapStringSliceValue(map) => {
            mapping(map, |items| numbered(items.iter().map(format_value)))
        }
        Reply::MapMapStringValue(map) => mapping(map, |inner| mapping(inner, format_value)),
        Reply::ZSlice(members) => numbered(members.iter().map(format_z)),
        Reply::ZSliceWithKey(popped) => format!(
            "{}\n{}",
            popped.key,
            numbered(popped.members.iter().map(format_z))
        ),
        Reply::ZWithKey(popped) => format!("{} {}", popped.key, format_z(&popped.z)),
    }
}

/// Format a raw reply frame for display
pub fn format_value(value: &RespValue) -> String {
    match value {
        RespValue::SimpleString(s) => s.clone(),
        RespValue::Error(e) => format!("(error) {e}"),
        RespValue::Integer(i) => format!("(integer) {i}"),
        RespValue::BulkString(Some(s)) => format!("\"{s}\""),
        RespValue::BulkString(None) | RespValue::Nil => "(nil)".to_string(),
        RespValue::Array(items) => numbered(items.iter().map(format_value)),
    }
}

fn format_z(z: &Z) -> String {
    format!("\"{}\" ({})", z.member, z.score)
}

fn numbered(items: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = items
        .enumerate()
        .map(|(i, item)| format!("{}) {item}", i + 1))
        .collect();
    if lines.is_empty() {
        "(empty array)".to_string()
    } else {
        lines.join("\n")
    }
}

fn mapping<V>(map: &HashMap<String, V>, render: impl Fn(&V) -> String) -> String {
    if map.is_empty() {
        return "(empty map)".to_string();
    }
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{key}: {}", render(&map[key])))
        .collect::<Vec<_>>()
        .join("\n")
}
