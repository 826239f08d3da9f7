//! tokio-tungstenite push channel.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::port::{PushChannel, PushConnector};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket push channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

#[async_trait]
impl PushConnector for WebSocketConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn PushChannel>> {
        let (socket, response) = connect_async(url.as_str()).await?;
        info!(%url, status = %response.status(), "WebSocket connected");
        Ok(Box::new(WebSocketChannel { socket }))
    }
}

/// One open WebSocket connection.
pub struct WebSocketChannel {
    socket: Socket,
}

#[async_trait]
impl PushChannel for WebSocketChannel {
    async fn recv(&mut self) -> Option<Result<String>> {
        while let Some(frame) = self.socket.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received text frame");
                    return Some(Ok(text));
                }
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(e) => warn!(error = %e, "Dropping non UTF-8 binary frame"),
                },
                Ok(Message::Ping(data)) => {
                    trace!("Received ping, sending pong");
                    if let Err(e) = self.socket.send(Message::Pong(data)).await {
                        return Some(Err(Error::from(e)));
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!(frame = ?frame, "Received close frame");
                    return None;
                }
                Ok(_) => {}
                Err(e) => return Some(Err(Error::from(e))),
            }
        }
        None
    }

    async fn close(&mut self) {
        if let Err(e) = self.socket.close(None).await {
            debug!(error = %e, "WebSocket close failed");
        }
    }
}
