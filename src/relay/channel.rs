//! clipsync - Relay channel
//!
//! One long-lived duplex connection carrying whole clipboard values as text
//! messages. No framing beyond "one message = one value".

use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::sink::{Sink, SinkExt};
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::frame::{Frame, Inbound};
use super::ConnectionError;
use crate::clipboard::ClipboardValue;

type BoxSink = Pin<Box<dyn Sink<String, Error = ConnectionError> + Send>>;

/// Identifies one relay connection in logs and in the server's peer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Result of one `receive` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A clipboard value sent by the peer
    Message(ClipboardValue),
    /// The connection has ended; every later call returns this again
    Closed,
}

/// Sending half of a relay connection
///
/// Cloning shares the same underlying socket; sends are serialized.
#[derive(Clone)]
pub struct RelaySender {
    id: ConnectionId,
    sink: Arc<Mutex<BoxSink>>,
}

impl RelaySender {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Send one clipboard value
    pub async fn send(&self, value: &ClipboardValue) -> Result<(), ConnectionError> {
        let mut sink = self.sink.lock().await;
        sink.send(value.as_str().to_owned()).await
    }

    /// Send a close frame; later sends fail
    pub async fn close(&self) -> Result<(), ConnectionError> {
        let mut sink = self.sink.lock().await;
        sink.close().await
    }
}

impl fmt::Debug for RelaySender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySender").field("id", &self.id).finish()
    }
}

/// Receiving half of a relay connection
pub struct RelayReceiver {
    id: ConnectionId,
    stream: BoxStream<'static, Result<Inbound, ConnectionError>>,
    closed: bool,
}

impl RelayReceiver {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Wait for the next value
    ///
    /// Read errors, a close frame, and end of stream all end the connection
    /// and yield [`RelayEvent::Closed`].
    pub async fn receive(&mut self) -> RelayEvent {
        if self.closed {
            return RelayEvent::Closed;
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Inbound::Text(text))) => {
                    return RelayEvent::Message(ClipboardValue::from(text));
                }
                Some(Ok(Inbound::Control)) => continue,
                Some(Ok(Inbound::Close)) => {
                    log::info!("[Relay {}] Peer closed the connection", self.id);
                    break;
                }
                Some(Err(e)) => {
                    log::warn!("[Relay {}] {}", self.id, e);
                    break;
                }
                None => {
                    log::info!("[Relay {}] Connection ended", self.id);
                    break;
                }
            }
        }

        self.closed = true;
        RelayEvent::Closed
    }
}

impl fmt::Debug for RelayReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayReceiver")
            .field("id", &self.id)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Adapts a frame sink into a sink of text values
struct TextSink<Si, M> {
    inner: Si,
    _frame: PhantomData<fn(M)>,
}

impl<Si, M, E> Sink<String> for TextSink<Si, M>
where
    Si: Sink<M, Error = E> + Unpin,
    M: Frame,
    E: fmt::Display,
{
    type Error = ConnectionError;

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.inner).poll_ready(cx).map_err(send_error)
    }

    fn start_send(mut self: Pin<&mut Self>, text: String) -> Result<(), Self::Error> {
        Pin::new(&mut self.inner)
            .start_send(M::from_text(text))
            .map_err(send_error)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.inner).poll_flush(cx).map_err(send_error)
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.inner).poll_close(cx).map_err(send_error)
    }
}

fn send_error(e: impl fmt::Display) -> ConnectionError {
    ConnectionError::Send(e.to_string())
}

/// Split a WebSocket-like duplex socket into relay halves
pub fn split<S, M, E>(socket: S) -> (RelaySender, RelayReceiver)
where
    S: Stream<Item = Result<M, E>> + Sink<M, Error = E> + Send + 'static,
    M: Frame + Send + Unpin + 'static,
    E: fmt::Display + Send + 'static,
{
    let id = ConnectionId::new();
    let (sink, stream) = socket.split();

    let sink = TextSink {
        inner: sink,
        _frame: PhantomData,
    };

    let stream = stream
        .map(|item| {
            item.map(Frame::into_inbound)
                .map_err(|e| ConnectionError::Receive(e.to_string()))
        })
        .boxed();

    log::debug!("[Relay {}] Channel opened", id);

    (
        RelaySender {
            id,
            sink: Arc::new(Mutex::new(Box::pin(sink))),
        },
        RelayReceiver {
            id,
            stream,
            closed: false,
        },
    )
}
