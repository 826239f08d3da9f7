//! Push-channel port.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

/// One open push channel.
#[async_trait]
pub trait PushChannel: Send {
    /// Next inbound text message.
    ///
    /// `Some(Err(_))` reports a channel error; `None` means the channel closed.
    /// Either ends the channel's useful life.
    async fn recv(&mut self) -> Option<Result<String>>;

    /// Close the channel, best effort.
    async fn close(&mut self);
}

/// Opens push channels.
#[async_trait]
pub trait PushConnector: Send + Sync {
    async fn connect(&self, url: &Url) -> Result<Box<dyn PushChannel>>;
}
