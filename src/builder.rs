//! Lazy fluent commands
//!
//! A [`CommandBuilder`] collects arguments and does nothing until one of its
//! terminal accessors is awaited. The first accessor dispatches; every later
//! call reads the same handle.

use crate::dispatch::{dispatch, DirectSink, Pipeline};
use crate::error::RdCmdError;
use crate::network::{RespValue, Transport};
use crate::result::{
    KeyValue, Reply, ResultHandle, ResultShape, ShapeOutput, TypedHandle, Z, ZSliceWithKey,
    ZWithKey,
};
use crate::template::{assemble, ArgValue, Args, CommandFamily};
use std::collections::HashMap;

enum Target<'a> {
    Direct(&'a dyn Transport),
    Batch(&'a mut Pipeline),
}

enum State {
    Pending,
    Resolved(ResultHandle),
}

/// A command bound to a family, an operation and an execution mode
pub struct CommandBuilder<'a> {
    family: &'a CommandFamily,
    name: String,
    args: Args,
    trailing: Vec<ArgValue>,
    target: Target<'a>,
    state: State,
}

impl<'a> CommandBuilder<'a> {
    pub(crate) fn direct(
        transport: &'a dyn Transport,
        family: &'a CommandFamily,
        name: &str,
    ) -> Self {
        Self::with_target(Target::Direct(transport), family, name)
    }

    pub(crate) fn batched(
        pipeline: &'a mut Pipeline,
        family: &'a CommandFamily,
        name: &str,
    ) -> Self {
        Self::with_target(Target::Batch(pipeline), family, name)
    }

    fn with_target(target: Target<'a>, family: &'a CommandFamily, name: &str) -> Self {
        Self {
            family,
            name: name.to_string(),
            args: Args::new(),
            trailing: Vec::new(),
            target,
            state: State::Pending,
        }
    }

    /// Set one named argument. Ignored once the command has been sent.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        if matches!(self.state, State::Pending) {
            self.args.insert(name, value);
        }
        self
    }

    /// Merge a whole argument map; later values win.
    pub fn args(mut self, args: Args) -> Self {
        if matches!(self.state, State::Pending) {
            for (name, value) in args.iter() {
                self.args.insert(name, value.clone());
            }
        }
        self
    }

    /// Append a token after the templated arguments
    pub fn trailing(mut self, value: impl Into<ArgValue>) -> Self {
        if matches!(self.state, State::Pending) {
            self.trailing.push(value.into());
        }
        self
    }

    /// The wire verb this command will be sent as
    pub fn name(&self) -> &str {
        self.family
            .command(&self.name)
            .ok()
            .and_then(|command| command.command_name.as_deref())
            .unwrap_or(self.name.as_str())
    }

    /// The full token sequence, without sending anything.
    ///
    /// # Panics
    ///
    /// If the family does not declare the operation.
    pub fn tokens(&self) -> Vec<String> {
        match assemble(self.family, &self.name, &self.args, &self.trailing) {
            Ok(assembled) => assembled.tokens,
            Err(e) => panic!("invalid command declaration: {e}"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    /// Dispatch under `shape` on first use; afterwards return the same handle
    pub async fn resolve(&mut self, shape: ResultShape) -> ResultHandle {
        if let State::Resolved(handle) = &self.state {
            return handle.clone();
        }

        let handle = match &mut self.target {
            Target::Direct(transport) => {
                let mut sink = DirectSink::new(*transport);
                dispatch(
                    &mut sink,
                    self.family,
                    &self.name,
                    &self.args,
                    &self.trailing,
                    shape,
                )
                .await
            }
            Target::Batch(pipeline) => {
                dispatch(
                    &mut **pipeline,
                    self.family,
                    &self.name,
                    &self.args,
                    &self.trailing,
                    shape,
                )
                .await
            }
        };

        self.state = State::Resolved(handle.clone());
        handle
    }

    /// Resolve as the shape of `T`.
    ///
    /// If an accessor for another shape already ran, the returned handle
    /// reports `ShapeMismatch` and nothing is sent again.
    pub async fn shape<T: ShapeOutput>(&mut self) -> TypedHandle<T> {
        TypedHandle::new(self.resolve(T::SHAPE).await)
    }

    /// Error of the command, resolving it generically if nothing ran yet
    pub async fn err(&mut self) -> Option<RdCmdError> {
        self.resolve(ResultShape::Generic).await.err().cloned()
    }

    /// Value of the command, resolving it generically if nothing ran yet
    pub async fn val(&mut self) -> Reply {
        self.resolve(ResultShape::Generic).await.value()
    }

    pub async fn generic(&mut self) -> TypedHandle<RespValue> {
        self.shape().await
    }

    pub async fn string(&mut self) -> TypedHandle<String> {
        self.shape().await
    }

    pub async fn int(&mut self) -> TypedHandle<i64> {
        self.shape().await
    }

    pub async fn float(&mut self) -> TypedHandle<f64> {
        self.shape().await
    }

    pub async fn boolean(&mut self) -> TypedHandle<bool> {
        self.shape().await
    }

    pub async fn slice(&mut self) -> TypedHandle<Vec<RespValue>> {
        self.shape().await
    }

    pub async fn string_slice(&mut self) -> TypedHandle<Vec<String>> {
        self.shape().await
    }

    pub async fn int_slice(&mut self) -> TypedHandle<Vec<i64>> {
        self.shape().await
    }

    pub async fn float_slice(&mut self) -> TypedHandle<Vec<f64>> {
        self.shape().await
    }

    pub async fn bool_slice(&mut self) -> TypedHandle<Vec<bool>> {
        self.shape().await
    }

    pub async fn key_value_slice(&mut self) -> TypedHandle<Vec<KeyValue>> {
        self.shape().await
    }

    pub async fn map_string_string(&mut self) -> TypedHandle<HashMap<String, String>> {
        self.shape().await
    }

    pub async fn map_string_int(&mut self) -> TypedHandle<HashMap<String, i64>> {
        self.shape().await
    }

    pub async fn map_string_value(&mut self) -> TypedHandle<HashMap<String, RespValue>> {
        self.shape().await
    }

    pub async fn map_string_string_slice(&mut self) -> TypedHandle<Vec<HashMap<String, String>>> {
        self.shape().await
    }

    pub async fn map_string_value_slice(
        &mut self,
    ) -> TypedHandle<Vec<HashMap<String, RespValue>>> {
        self.shape().await
    }

    pub async fn map_string_slice_value(
        &mut self,
    ) -> TypedHandle<HashMap<String, Vec<RespValue>>> {
        self.shape().await
    }

    pub async fn map_map_string_value(
        &mut self,
    ) -> TypedHandle<HashMap<String, HashMap<String, RespValue>>> {
        self.shape().await
    }

    pub async fn z_slice(&mut self) -> TypedHandle<Vec<Z>> {
        self.shape().await
    }

    pub async fn z_slice_with_key(&mut self) -> TypedHandle<ZSliceWithKey> {
        self.shape().await
    }

    pub async fn z_with_key(&mut self) -> TypedHandle<ZWithKey> {
        self.shape().await
    }
}
