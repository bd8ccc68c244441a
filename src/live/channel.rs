use super::field::{decode, DisplayUpdate};
use super::transport::{EventTransport, StreamEvent};
use futures_util::StreamExt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Consumer of decoded field updates. Must be idempotent per call and must
/// never call back into the channel.
pub trait DisplayDispatcher {
    fn dispatch(&mut self, update: DisplayUpdate);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Reconnecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent<'a> {
    Opened,
    Message(&'a str),
    Error,
    TimerElapsed,
}

/// What the driver has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Tear the current connection down and wake the channel after `after`.
    Reconnect { after: Duration },
    /// Open a fresh connection.
    Connect,
}

#[derive(Debug)]
pub struct LiveChannel {
    state: ChannelState,
    reconnect_delay: Duration,
    reconnects: u64,
}

impl LiveChannel {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ChannelState::Connecting,
            reconnect_delay,
            reconnects: 0,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Number of reconnects scheduled so far.
    #[cfg(test)]
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    pub fn handle<D>(&mut self, event: ChannelEvent<'_>, dispatcher: &mut D) -> Option<Action>
    where
        D: DisplayDispatcher + ?Sized,
    {
        use ChannelState::*;

        match (self.state, event) {
            (Reconnecting, ChannelEvent::TimerElapsed) => {
                self.state = Connecting;
                debug!(attempt = self.reconnects, "reconnecting to event stream");
                Some(Action::Connect)
            }
            // leftovers from a torn-down connection
            (Reconnecting, _) => {
                debug!("dropping event from closed connection");
                None
            }
            (Connecting | Open, ChannelEvent::TimerElapsed) => None,
            (Connecting | Open, ChannelEvent::Opened) => {
                self.open();
                None
            }
            (Connecting | Open, ChannelEvent::Message(payload)) => {
                self.open();
                for update in decode(payload) {
                    debug!(field = %update.field(), "dispatching display update");
                    dispatcher.dispatch(update);
                }
                None
            }
            (Connecting | Open, ChannelEvent::Error) => {
                self.state = Reconnecting;
                self.reconnects += 1;
                warn!(
                    delay_ms = self.reconnect_delay.as_millis() as u64,
                    "event stream failed, scheduling reconnect"
                );
                Some(Action::Reconnect {
                    after: self.reconnect_delay,
                })
            }
        }
    }

    fn open(&mut self) {
        if self.state != ChannelState::Open {
            info!("event stream open");
            self.state = ChannelState::Open;
        }
    }
}

/// Drive `channel` over `transport` for as long as the future is polled.
///
/// `sleep` provides the reconnect timer. Only one connection exists at any
/// time: the previous stream is dropped before the delay starts.
pub async fn run<T, D, S, F>(
    channel: &mut LiveChannel,
    transport: &mut T,
    dispatcher: &mut D,
    mut sleep: S,
) where
    T: EventTransport,
    D: DisplayDispatcher,
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    loop {
        let mut stream = transport.connect();

        let delay = loop {
            let action = match stream.next().await {
                Some(Ok(StreamEvent::Opened)) => channel.handle(ChannelEvent::Opened, dispatcher),
                Some(Ok(StreamEvent::Message(data))) => {
                    channel.handle(ChannelEvent::Message(&data), dispatcher)
                }
                Some(Err(err)) => {
                    warn!("event stream error: {err}");
                    channel.handle(ChannelEvent::Error, dispatcher)
                }
                None => channel.handle(ChannelEvent::Error, dispatcher),
            };
            if let Some(Action::Reconnect { after }) = action {
                break after;
            }
        };
        drop(stream);

        sleep(delay).await;
        if channel.handle(ChannelEvent::TimerElapsed, dispatcher) != Some(Action::Connect) {
            warn!(state = ?channel.state(), "reconnect timer fired in unexpected state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::field::DisplayField;
    use crate::live::transport::{EventStream, TransportError};
    use futures::stream;
    use futures::FutureExt;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(5000);

    #[derive(Default)]
    struct Recorder(Vec<DisplayUpdate>);

    impl DisplayDispatcher for Recorder {
        fn dispatch(&mut self, update: DisplayUpdate) {
            self.0.push(update);
        }
    }

    #[test]
    fn starts_connecting_and_opens() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        assert_eq!(channel.state(), ChannelState::Connecting);
        assert_eq!(channel.handle(ChannelEvent::Opened, &mut rec), None);
        assert_eq!(channel.state(), ChannelState::Open);
    }

    #[test]
    fn dispatches_fields_in_order_and_nothing_else() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Opened, &mut rec);
        channel.handle(ChannelEvent::Message(r#"{"title":"A","listeners":0}"#), &mut rec);

        let pairs: Vec<_> = rec.0.iter().map(|u| (u.field().key(), u.clone())).collect();
        assert_eq!(
            pairs,
            vec![
                ("title", DisplayUpdate::Title(Some("A".to_string()))),
                ("listeners", DisplayUpdate::Listeners(0)),
            ]
        );
    }

    #[test]
    fn message_before_open_implies_open() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Message(r#"{"author":"X"}"#), &mut rec);
        assert_eq!(channel.state(), ChannelState::Open);
        assert_eq!(rec.0, vec![DisplayUpdate::Author(Some("X".to_string()))]);
    }

    #[test]
    fn malformed_message_dispatches_nothing() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Opened, &mut rec);
        channel.handle(ChannelEvent::Message("{oops"), &mut rec);
        channel.handle(ChannelEvent::Message(""), &mut rec);
        assert!(rec.0.is_empty());
        assert_eq!(channel.state(), ChannelState::Open);
    }

    #[test]
    fn error_schedules_exactly_one_reconnect() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Opened, &mut rec);

        assert_eq!(
            channel.handle(ChannelEvent::Error, &mut rec),
            Some(Action::Reconnect { after: DELAY })
        );
        assert_eq!(channel.state(), ChannelState::Reconnecting);

        // a second error from the dead connection must not schedule again
        assert_eq!(channel.handle(ChannelEvent::Error, &mut rec), None);
        assert_eq!(channel.reconnects(), 1);

        assert_eq!(
            channel.handle(ChannelEvent::TimerElapsed, &mut rec),
            Some(Action::Connect)
        );
        assert_eq!(channel.state(), ChannelState::Connecting);
    }

    #[test]
    fn error_while_connecting_also_reconnects() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        assert_eq!(
            channel.handle(ChannelEvent::Error, &mut rec),
            Some(Action::Reconnect { after: DELAY })
        );
    }

    #[test]
    fn stale_messages_are_ignored_while_reconnecting() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Error, &mut rec);
        channel.handle(ChannelEvent::Message(r#"{"title":"late"}"#), &mut rec);
        channel.handle(ChannelEvent::Opened, &mut rec);
        assert!(rec.0.is_empty());
        assert_eq!(channel.state(), ChannelState::Reconnecting);
    }

    #[test]
    fn reconnects_without_ceiling() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        for attempt in 1..=1000u64 {
            assert_eq!(
                channel.handle(ChannelEvent::Error, &mut rec),
                Some(Action::Reconnect { after: DELAY })
            );
            assert_eq!(channel.reconnects(), attempt);
            assert_eq!(
                channel.handle(ChannelEvent::TimerElapsed, &mut rec),
                Some(Action::Connect)
            );
        }
    }

    #[test]
    fn idle_timer_is_ignored() {
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        channel.handle(ChannelEvent::Opened, &mut rec);
        assert_eq!(channel.handle(ChannelEvent::TimerElapsed, &mut rec), None);
        assert_eq!(channel.state(), ChannelState::Open);
    }

    struct ScriptedTransport {
        sessions: VecDeque<Vec<Result<StreamEvent, TransportError>>>,
        connects: usize,
    }

    impl ScriptedTransport {
        fn new(sessions: Vec<Vec<Result<StreamEvent, TransportError>>>) -> Self {
            Self {
                sessions: sessions.into(),
                connects: 0,
            }
        }
    }

    impl EventTransport for ScriptedTransport {
        fn connect(&mut self) -> EventStream {
            self.connects += 1;
            match self.sessions.pop_front() {
                Some(events) => stream::iter(events).boxed_local(),
                // stays connected and silent forever
                None => stream::pending().boxed_local(),
            }
        }
    }

    fn message(payload: &str) -> Result<StreamEvent, TransportError> {
        Ok(StreamEvent::Message(payload.to_string()))
    }

    #[test]
    fn driver_reconnects_after_each_failure() {
        let mut transport = ScriptedTransport::new(vec![
            vec![Ok(StreamEvent::Opened), message(r#"{"title":"one"}"#)],
            vec![Err(TransportError::Connect("refused".to_string()))],
            vec![
                Ok(StreamEvent::Opened),
                message(r#"{"listeners":3}"#),
                Err(TransportError::Stream("reset".to_string())),
                message(r#"{"title":"never"}"#),
            ],
            vec![Ok(StreamEvent::Opened), message(r#"{"subtitle":null}"#)],
        ]);
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();
        let delays = Rc::new(RefCell::new(Vec::new()));

        let sleeps = delays.clone();
        let pending = run(&mut channel, &mut transport, &mut rec, move |d| {
            sleeps.borrow_mut().push(d);
            futures::future::ready(())
        })
        .now_or_never();

        assert!(pending.is_none(), "driver must never finish");
        // four scripted sessions fail, the fifth connection stays open
        assert_eq!(transport.connects, 5);
        assert_eq!(*delays.borrow(), vec![DELAY; 4]);
        assert_eq!(channel.reconnects(), 4);
        assert_eq!(channel.state(), ChannelState::Connecting);

        let fields: Vec<_> = rec.0.iter().map(DisplayUpdate::field).collect();
        assert_eq!(
            fields,
            vec![
                DisplayField::Title,
                DisplayField::Listeners,
                DisplayField::Subtitle
            ]
        );
    }

    #[test]
    fn driver_keeps_last_values_across_gaps() {
        let mut transport = ScriptedTransport::new(vec![
            vec![message(r#"{"title":"kept","author":"a"}"#)],
            vec![message(r#"{"author":"b"}"#)],
        ]);
        let mut channel = LiveChannel::new(DELAY);
        let mut rec = Recorder::default();

        let _ = run(&mut channel, &mut transport, &mut rec, |_| {
            futures::future::ready(())
        })
        .now_or_never();

        // nothing is cleared on reconnect; only what the server re-sends changes
        assert_eq!(
            rec.0,
            vec![
                DisplayUpdate::Title(Some("kept".to_string())),
                DisplayUpdate::Author(Some("a".to_string())),
                DisplayUpdate::Author(Some("b".to_string())),
            ]
        );
    }
}
