//! Result handles filled once per invocation

use super::reply::{Reply, ShapeOutput};
use super::ResultShape;
use crate::error::{RdCmdError, Result};
use crate::network::RespValue;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

#[derive(Debug)]
struct Outcome {
    value: Reply,
    error: Option<RdCmdError>,
}

/// The write side of a handle, consumed by whichever sink runs the command
#[derive(Debug)]
pub struct ReplySlot {
    shape: ResultShape,
    command: String,
    preserve_not_found: bool,
    /// Set for the best-effort expire issued after a primary command
    auxiliary_key: Option<String>,
    cell: Arc<OnceLock<Outcome>>,
}

impl ReplySlot {
    /// Slot for the follow-up expire on `key`; nobody reads it, failures
    /// are only logged.
    pub(crate) fn auxiliary(key: &str) -> Self {
        Self {
            shape: ResultShape::Bool,
            command: crate::commands::EXPIRE.to_string(),
            preserve_not_found: false,
            auxiliary_key: Some(key.to_string()),
            cell: Arc::new(OnceLock::new()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_auxiliary(&self) -> bool {
        self.auxiliary_key.is_some()
    }

    /// Classify, decode and normalize a raw transport result, then publish it.
    ///
    /// A transport failure takes precedence over anything the frame would
    /// decode to. Unless the command preserves it, "no such entry" becomes
    /// a successful zero value.
    pub fn resolve(self, raw: Result<RespValue>) {
        let decoded = raw.and_then(classify).and_then(|frame| self.shape.decode(frame));

        let outcome = match decoded {
            Ok(value) => Outcome { value, error: None },
            Err(e) if e.is_not_found() && !self.preserve_not_found => Outcome {
                value: self.shape.zero(),
                error: None,
            },
            Err(e) => Outcome {
                value: self.shape.zero(),
                error: Some(e),
            },
        };

        if let (Some(key), Some(err)) = (&self.auxiliary_key, &outcome.error) {
            warn!(key = %key, error = %err, "auxiliary expire failed");
        }

        if self.cell.set(outcome).is_err() {
            debug!("reply for '{}' was already resolved", self.command);
        }
    }
}

/// Map top-level nil and error frames onto the error channel
fn classify(frame: RespValue) -> Result<RespValue> {
    match frame {
        RespValue::Error(message) => Err(RdCmdError::Server { message }),
        frame if frame.is_nil() => Err(RdCmdError::NotFound),
        frame => Ok(frame),
    }
}

/// The read side: value and error of one invocation.
///
/// Reading never issues anything; in a pipeline the handle stays empty
/// until the pipeline is executed.
#[derive(Debug, Clone)]
pub struct ResultHandle {
    shape: ResultShape,
    cell: Arc<OnceLock<Outcome>>,
}

impl ResultHandle {
    pub(crate) fn new(shape: ResultShape) -> Self {
        Self {
            shape,
            cell: Arc::new(OnceLock::new()),
        }
    }

    pub(crate) fn slot(&self, command: &str, preserve_not_found: bool) -> ReplySlot {
        ReplySlot {
            shape: self.shape,
            command: command.to_string(),
            preserve_not_found,
            auxiliary_key: None,
            cell: Arc::clone(&self.cell),
        }
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Decoded value, or the shape's zero value when absent or failed
    pub fn value(&self) -> Reply {
        self.cell
            .get()
            .map(|outcome| outcome.value.clone())
            .unwrap_or_else(|| self.shape.zero())
    }

    pub fn err(&self) -> Option<&RdCmdError> {
        self.cell.get().and_then(|outcome| outcome.error.as_ref())
    }

    pub fn result(&self) -> Result<Reply> {
        match self.cell.get() {
            None => Err(RdCmdError::NotReady),
            Some(Outcome { error: Some(e), .. }) => Err(e.clone()),
            Some(Outcome { value, .. }) => Ok(value.clone()),
        }
    }
}

/// A [`ResultHandle`] read back as the Rust type of its shape
#[derive(Debug, Clone)]
pub struct TypedHandle<T> {
    inner: ResultHandle,
    mismatch: Option<RdCmdError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ShapeOutput> TypedHandle<T> {
    /// A handle resolved under another shape reports `ShapeMismatch`
    /// rather than a silent zero value.
    pub fn new(inner: ResultHandle) -> Self {
        let mismatch = (inner.shape() != T::SHAPE).then(|| RdCmdError::ShapeMismatch {
            requested: T::SHAPE,
            resolved: inner.shape(),
        });
        Self {
            inner,
            mismatch,
            _marker: PhantomData,
        }
    }

    pub fn val(&self) -> T {
        if self.mismatch.is_some() {
            return T::default();
        }
        self.inner
            .cell
            .get()
            .and_then(|outcome| T::from_reply(&outcome.value))
            .unwrap_or_default()
    }

    pub fn err(&self) -> Option<&RdCmdError> {
        self.mismatch.as_ref().or_else(|| self.inner.err())
    }

    pub fn result(&self) -> Result<T> {
        if let Some(e) = &self.mismatch {
            return Err(e.clone());
        }
        let reply = self.inner.result()?;
        Ok(T::from_reply(&reply).unwrap_or_default())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    pub fn handle(&self) -> &ResultHandle {
        &self.inner
    }
}
