// Server-push transports feeding the live channel.
use futures_util::stream::LocalBoxStream;
use futures_util::StreamExt;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use futures::channel::mpsc::UnboundedSender;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Opened,
    Message(String),
}

#[derive(Debug, Error)]
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub enum TransportError {
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("event stream failed: {0}")]
    Stream(String),
    #[error("event stream closed by server")]
    Closed,
}

pub type EventStream = LocalBoxStream<'static, Result<StreamEvent, TransportError>>;

/// Opens one connection per call. Dropping the returned stream closes it.
/// Connection failures surface as an `Err` item, never as a panic.
pub trait EventTransport {
    fn connect(&mut self) -> EventStream;
}

/// What the browser reported on an `EventSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
enum SourceSignal {
    Open,
    Message(Option<String>),
    Error { ready_state: u16 },
}

// Every `error` ends the connection, including the ones fired while the
// browser is already retrying on its own (`readyState == CONNECTING`).
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn stream_item(signal: SourceSignal) -> Result<StreamEvent, TransportError> {
    match signal {
        SourceSignal::Open => Ok(StreamEvent::Opened),
        SourceSignal::Message(data) => Ok(StreamEvent::Message(data.unwrap_or_default())),
        SourceSignal::Error { ready_state } => Err(TransportError::Stream(format!(
            "event source error (readyState {ready_state})"
        ))),
    }
}

/// `EventSource` based transport for the browser.
#[cfg(target_arch = "wasm32")]
pub struct BrowserEventTransport {
    url: String,
}

#[cfg(target_arch = "wasm32")]
impl BrowserEventTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

/// One live `EventSource` with its listeners. Dropping it detaches the
/// listeners and closes the source, so the browser stops retrying.
#[cfg(target_arch = "wasm32")]
struct BrowserConnection {
    source: web_sys::EventSource,
    listeners: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserConnection {
    fn open(url: &str, sender: UnboundedSender<SourceSignal>) -> Result<Self, TransportError> {
        let source = web_sys::EventSource::new(url)
            .map_err(|err| TransportError::Connect(format!("{err:?}")))?;
        let mut connection = Self {
            source,
            listeners: Vec::new(),
        };

        for kind in ["open", "message", "error"] {
            let sender = sender.clone();
            let source = connection.source.clone();
            let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let signal = match kind {
                    "open" => SourceSignal::Open,
                    "message" => SourceSignal::Message(
                        event
                            .dyn_ref::<web_sys::MessageEvent>()
                            .and_then(|message| message.data().as_string()),
                    ),
                    _ => SourceSignal::Error {
                        ready_state: source.ready_state(),
                    },
                };
                let _ = sender.unbounded_send(signal);
            }) as Box<dyn FnMut(web_sys::Event)>);

            connection
                .source
                .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
                .map_err(|err| TransportError::Connect(format!("{err:?}")))?;
            connection.listeners.push((kind, callback));
        }
        Ok(connection)
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for BrowserConnection {
    fn drop(&mut self) {
        for (kind, callback) in &self.listeners {
            let _ = self
                .source
                .remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
        }
        self.source.close();
    }
}

#[cfg(target_arch = "wasm32")]
impl EventTransport for BrowserEventTransport {
    fn connect(&mut self) -> EventStream {
        use futures_util::stream;

        let (sender, receiver) = futures::channel::mpsc::unbounded();
        let connection = match BrowserConnection::open(&self.url, sender) {
            Ok(connection) => connection,
            Err(err) => return stream::once(async move { Err(err) }).boxed_local(),
        };

        // The connection travels with the stream so dropping the stream closes it.
        stream::unfold((connection, receiver), |(connection, mut receiver)| async move {
            let signal = receiver.next().await?;
            Some((stream_item(signal), (connection, receiver)))
        })
        .boxed_local()
    }
}

/// Streaming HTTP transport for the desktop shell.
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpEventTransport {
    url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpEventTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[cfg(not(target_arch = "wasm32"))]
enum HttpPhase {
    Connecting(String),
    Streaming {
        body: LocalBoxStream<'static, reqwest::Result<Vec<u8>>>,
        parser: super::sse::SseParser,
        pending: std::collections::VecDeque<String>,
    },
    Done,
}

#[cfg(not(target_arch = "wasm32"))]
async fn open_event_stream(url: &str) -> Result<reqwest::Response, TransportError> {
    let response = crate::utils::HTTP_CLIENT
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| TransportError::Connect(e.to_string()))?;
    if !response.status().is_success() {
        return Err(TransportError::Connect(format!(
            "server responded with {}",
            response.status()
        )));
    }
    Ok(response)
}

#[cfg(not(target_arch = "wasm32"))]
impl EventTransport for HttpEventTransport {
    fn connect(&mut self) -> EventStream {
        futures_util::stream::unfold(HttpPhase::Connecting(self.url.clone()), |phase| async move {
            match phase {
                HttpPhase::Connecting(url) => match open_event_stream(&url).await {
                    Ok(response) => {
                        let body = response
                            .bytes_stream()
                            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                            .boxed_local();
                        let next = HttpPhase::Streaming {
                            body,
                            parser: super::sse::SseParser::new(),
                            pending: Default::default(),
                        };
                        Some((Ok(StreamEvent::Opened), next))
                    }
                    Err(err) => Some((Err(err), HttpPhase::Done)),
                },
                HttpPhase::Streaming {
                    mut body,
                    mut parser,
                    mut pending,
                } => loop {
                    if let Some(payload) = pending.pop_front() {
                        let next = HttpPhase::Streaming {
                            body,
                            parser,
                            pending,
                        };
                        return Some((Ok(StreamEvent::Message(payload)), next));
                    }
                    match body.next().await {
                        Some(Ok(chunk)) => pending.extend(parser.feed(&chunk)),
                        Some(Err(err)) => {
                            let err = TransportError::Stream(err.to_string());
                            return Some((Err(err), HttpPhase::Done));
                        }
                        None => return Some((Err(TransportError::Closed), HttpPhase::Done)),
                    }
                },
                HttpPhase::Done => None,
            }
        })
        .boxed_local()
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformTransport = BrowserEventTransport;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformTransport = HttpEventTransport;
