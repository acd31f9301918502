//! Entry point tying command families to a transport

use crate::builder::CommandBuilder;
use crate::config::ClientConfig;
use crate::dispatch::Pipeline;
use crate::error::Result;
use crate::network::{TcpTransport, Transport};
use crate::result::{ShapeOutput, TypedHandle};
use crate::template::{assemble, ArgValue, Args, CommandFamily};
use std::sync::Arc;

/// Cheap to clone; every clone shares the same transport
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// A client over TCP; the connection opens on first use
    pub fn connect(config: ClientConfig) -> Self {
        Self::new(TcpTransport::from_config(config))
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Start a command that runs as soon as one of its accessors is awaited
    pub fn cmd<'a>(&'a self, family: &'a CommandFamily, name: &str) -> CommandBuilder<'a> {
        CommandBuilder::direct(self.transport.as_ref(), family, name)
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new()
    }

    /// Execute a pipeline built by [`Client::pipeline`]
    pub async fn exec(&self, pipeline: &mut Pipeline) -> Result<usize> {
        pipeline.exec(self.transport.as_ref()).await
    }

    /// The token sequence for an operation, without sending it
    pub fn build_cmd(
        &self,
        family: &CommandFamily,
        name: &str,
        args: &Args,
        trailing: &[ArgValue],
    ) -> Result<Vec<String>> {
        Ok(assemble(family, name, args, trailing)?.tokens)
    }

    /// Run an operation once, decoding into the shape of `T`
    pub async fn execute<T: ShapeOutput>(
        &self,
        family: &CommandFamily,
        name: &str,
        args: Args,
        trailing: &[ArgValue],
    ) -> TypedHandle<T> {
        let mut builder = self.cmd(family, name).args(args);
        for value in trailing {
            builder = builder.trailing(value.clone());
        }
        builder.shape().await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
