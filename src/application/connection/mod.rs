//! Push-channel lifecycle: connect, receive, reconnect with backoff.
//!
//! A single background task owns the physical channel. Each call to
//! [`ConnectionManager::start`] stops the previous task (closing its channel
//! and cancelling any pending retry) before spawning a new one, and bumps a
//! generation counter so that state published by a superseded task is ignored.
//!
//! ```text
//! Idle -> Connecting -> Open -> Reconnecting -> Connecting -> ...
//!             |                      ^
//!             +---- connect failed --+
//! ```
//!
//! Retries never stop; only the delay between them is bounded.

mod dispatch;

pub use dispatch::{Dispatch, DropReason, EventDispatcher, EventKind};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{Backoff, ConnectionState};
use crate::error::Error;
use crate::port::{Notifier, PushChannel, PushConnector};

/// Mutable state shared with the background task.
struct Control {
    generation: u64,
    backoff: Backoff,
    attempts: u64,
}

struct Shared {
    control: Mutex<Control>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    /// Publish `state` if `generation` is still current.
    fn publish(&self, generation: u64, state: ConnectionState) -> bool {
        let control = self.control.lock();
        if control.generation != generation {
            return false;
        }
        self.state_tx.send_replace(state);
        true
    }

    fn opened(&self, generation: u64) -> bool {
        let mut control = self.control.lock();
        if control.generation != generation {
            return false;
        }
        control.backoff.reset();
        control.attempts = 0;
        self.state_tx.send_replace(ConnectionState::Open);
        true
    }

    /// Move to `Reconnecting` and take the next delay. `None` when superseded.
    fn schedule_retry(&self, generation: u64) -> Option<(Duration, u64)> {
        let mut control = self.control.lock();
        if control.generation != generation {
            return None;
        }
        control.attempts += 1;
        let delay = control.backoff.next_delay();
        self.state_tx.send_replace(ConnectionState::Reconnecting);
        Some((delay, control.attempts))
    }
}

struct Running {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Running {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                warn!(error = %e, "Connection task ended abnormally");
            }
        }
    }
}

enum PumpEnd {
    Stopped,
    Closed,
    Failed(Error),
}

/// Owns the push channel for one session.
pub struct ConnectionManager {
    push_url: Url,
    connector: Arc<dyn PushConnector>,
    dispatcher: EventDispatcher,
    shared: Arc<Shared>,
    running: AsyncMutex<Option<Running>>,
}

impl ConnectionManager {
    pub fn new(
        push_url: Url,
        connector: Arc<dyn PushConnector>,
        notifier: Arc<dyn Notifier>,
        backoff: Backoff,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Idle);
        Self {
            push_url,
            connector,
            dispatcher: EventDispatcher::new(notifier),
            shared: Arc::new(Shared {
                control: Mutex::new(Control {
                    generation: 0,
                    backoff,
                    attempts: 0,
                }),
                state_tx,
            }),
            running: AsyncMutex::new(None),
        }
    }

    /// Open the push channel, replacing any existing one.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start(&self) {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            debug!("Closing existing channel before restart");
            previous.shutdown().await;
        }

        let generation = {
            let mut control = self.shared.control.lock();
            control.generation += 1;
            self.shared.state_tx.send_replace(ConnectionState::Connecting);
            control.generation
        };

        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run(
            generation,
            self.push_url.clone(),
            Arc::clone(&self.connector),
            self.dispatcher.clone(),
            Arc::clone(&self.shared),
            stop_rx,
        ));
        *running = Some(Running { stop, handle });
    }

    /// Close the channel, cancel any pending retry and return to `Idle`.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            previous.shutdown().await;
        }

        let mut control = self.shared.control.lock();
        control.generation += 1;
        self.shared.state_tx.send_replace(ConnectionState::Idle);
        info!(url = %self.push_url, "Push channel stopped");
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state_tx.borrow()
    }

    /// Watch state transitions.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Delay the next retry would wait, in milliseconds.
    #[must_use]
    pub fn current_delay_ms(&self) -> u64 {
        self.shared.control.lock().backoff.current_delay_ms()
    }

    /// Consecutive failed attempts since the last successful open.
    #[must_use]
    pub fn failed_attempts(&self) -> u64 {
        self.shared.control.lock().attempts
    }

    #[must_use]
    pub fn push_url(&self) -> &Url {
        &self.push_url
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.handle.abort();
        }
    }
}

async fn run(
    generation: u64,
    url: Url,
    connector: Arc<dyn PushConnector>,
    dispatcher: EventDispatcher,
    shared: Arc<Shared>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    loop {
        if !shared.publish(generation, ConnectionState::Connecting) {
            return;
        }
        debug!(%url, generation, "Connecting push channel");

        let connected = tokio::select! {
            _ = &mut stop_rx => return,
            result = connector.connect(&url) => result,
        };

        match connected {
            Ok(mut channel) => {
                if !shared.opened(generation) {
                    channel.close().await;
                    return;
                }
                info!(%url, "Push channel open");

                let end = pump(channel.as_mut(), &dispatcher, &mut stop_rx).await;
                channel.close().await;
                match end {
                    PumpEnd::Stopped => return,
                    PumpEnd::Closed => info!(%url, "Push channel closed by remote"),
                    PumpEnd::Failed(e) => warn!(error = %e, %url, "Push channel error"),
                }
            }
            Err(e) => warn!(error = %e, %url, "Push channel connect failed"),
        }

        let Some((delay, attempt)) = shared.schedule_retry(generation) else {
            return;
        };
        info!(delay_ms = delay.as_millis() as u64, attempt, "Reconnecting after delay");

        tokio::select! {
            _ = &mut stop_rx => return,
            () = tokio::time::sleep(delay) => {}
        }
    }
}

/// Deliver frames one at a time until the channel ends or a stop arrives.
async fn pump(
    channel: &mut dyn PushChannel,
    dispatcher: &EventDispatcher,
    stop_rx: &mut oneshot::Receiver<()>,
) -> PumpEnd {
    loop {
        let frame = tokio::select! {
            _ = &mut *stop_rx => return PumpEnd::Stopped,
            frame = channel.recv() => frame,
        };
        match frame {
            Some(Ok(text)) => {
                dispatcher.handle_text(&text);
            }
            Some(Err(e)) => return PumpEnd::Failed(e),
            None => return PumpEnd::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::channel::{wait_for_state, ScriptedConnector, Script};
    use crate::testkit::domain::{alert_frame, endpoints};
    use crate::testkit::notifier::RecordingNotifier;

    const WAIT: Duration = Duration::from_secs(2);

    fn manager(scripts: Vec<Script>) -> (ConnectionManager, Arc<ScriptedConnector>, RecordingNotifier) {
        let connector = Arc::new(ScriptedConnector::new(scripts));
        let notifier = RecordingNotifier::new();
        let manager = ConnectionManager::new(
            endpoints().push_url().clone(),
            connector.clone(),
            Arc::new(notifier.clone()),
            Backoff::new(10, 40, 2.0),
        );
        (manager, connector, notifier)
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (manager, connector, _) = manager(vec![]);
        assert_eq!(manager.state(), ConnectionState::Idle);
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_open_delivers_alerts() {
        let (manager, connector, notifier) = manager(vec![Script::open()
            .text(alert_frame("INFO", "first"))
            .text(alert_frame("CRITICAL", "second"))
            .hold_open()]);
        let mut states = manager.subscribe_state();

        manager.start().await;

        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);
        assert!(notifier.wait_for(2, WAIT).await);
        let messages: Vec<_> = notifier.alerts().into_iter().map(|a| a.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(connector.urls()[0].as_str(), "ws://mediguard.test:8000/ws");
    }

    #[tokio::test]
    async fn test_malformed_frame_keeps_channel_open() {
        let (manager, connector, notifier) = manager(vec![Script::open()
            .text("definitely not json")
            .text(r#"{"no_event": true}"#)
            .text(alert_frame("WARNING", "still flowing"))
            .hold_open()]);

        manager.start().await;

        assert!(notifier.wait_for(1, WAIT).await);
        assert_eq!(manager.state(), ConnectionState::Open);
        assert_eq!(notifier.alerts()[0].message, "still flowing");
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_reconnects_after_close() {
        let (manager, connector, notifier) = manager(vec![
            Script::open().text(alert_frame("INFO", "one")).close(),
            Script::open().text(alert_frame("INFO", "two")).hold_open(),
        ]);

        manager.start().await;

        assert!(notifier.wait_for(2, WAIT).await);
        let mut states = manager.subscribe_state();
        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);
        assert_eq!(connector.connect_count(), 2);
        assert_eq!(manager.current_delay_ms(), 10);
    }

    #[tokio::test]
    async fn test_failures_grow_backoff_and_open_resets_it() {
        let (manager, _, _) = manager(vec![
            Script::refused("down"),
            Script::refused("down"),
            Script::refused("down"),
            Script::open().hold_open(),
        ]);
        let mut states = manager.subscribe_state();

        manager.start().await;

        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);
        assert_eq!(manager.current_delay_ms(), 10);
        assert_eq!(manager.failed_attempts(), 0);
    }

    #[tokio::test]
    async fn test_retries_continue_past_delay_cap() {
        let (manager, connector, _) = manager(vec![]);

        manager.start().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(connector.connect_count() >= 6, "{}", connector.connect_count());
        assert_eq!(manager.current_delay_ms(), 40);
        manager.stop().await;
    }

    #[tokio::test]
    async fn test_restart_closes_previous_channel() {
        let (manager, connector, _) = manager(vec![
            Script::open().hold_open(),
            Script::open().hold_open(),
        ]);
        let mut states = manager.subscribe_state();

        manager.start().await;
        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);

        manager.start().await;
        assert!(wait_for_state(&mut states, ConnectionState::Open, WAIT).await);

        assert_eq!(connector.connect_count(), 2);
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_cancels_pending_retry() {
        let connector = Arc::new(ScriptedConnector::new(vec![Script::refused("down")]));
        let manager = ConnectionManager::new(
            endpoints().push_url().clone(),
            connector.clone(),
            Arc::new(RecordingNotifier::new()),
            Backoff::new(200, 400, 2.0),
        );
        let mut states = manager.subscribe_state();

        manager.start().await;
        assert!(wait_for_state(&mut states, ConnectionState::Reconnecting, WAIT).await);
        manager.stop().await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(manager.state(), ConnectionState::Idle);
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_channel_error_triggers_reconnect() {
        let (manager, connector, _) = manager(vec![
            Script::open().error("reset by peer"),
            Script::open().hold_open(),
        ]);

        manager.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(connector.connect_count(), 2);
        assert_eq!(manager.state(), ConnectionState::Open);
    }
}
