//! Result dispatch
//!
//! One algorithm for both execution modes: assemble, create the handle,
//! hand the command to a sink, then issue the follow-up expire if the
//! operation declares one. The sink decides whether that runs now or when
//! a pipeline is executed.

pub mod pipeline;
pub mod sink;

pub use pipeline::Pipeline;
pub use sink::{CommandSink, DirectSink};

use crate::result::{ReplySlot, ResultHandle, ResultShape};
use crate::template::{assemble, ArgValue, Args, CommandFamily};
use tracing::debug;

/// Assemble `name` from `family` and submit it to `sink`.
///
/// # Panics
///
/// If `family` does not declare `name`. That is a declaration bug, not a
/// runtime condition.
pub async fn dispatch(
    sink: &mut dyn CommandSink,
    family: &CommandFamily,
    name: &str,
    args: &Args,
    trailing: &[ArgValue],
    shape: ResultShape,
) -> ResultHandle {
    let assembled = match assemble(family, name, args, trailing) {
        Ok(assembled) => assembled,
        Err(e) => panic!("invalid command declaration: {e}"),
    };

    debug!(shape = %shape, "dispatching {:?}", assembled.tokens);

    let handle = ResultHandle::new(shape);
    let slot = handle.slot(assembled.verb(), assembled.command.preserve_not_found);
    let ttl = assembled.command.expire.as_ref().map(|policy| policy.ttl());

    sink.submit(assembled.tokens, slot).await;

    if let Some(ttl) = ttl {
        let key = assembled.key;
        sink.submit_expire(&key, ttl, ReplySlot::auxiliary(&key))
            .await;
    }

    handle
}
