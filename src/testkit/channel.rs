//! Scripted [`PushConnector`] for driving the connection manager in tests.
//!
//! Each `connect()` pops the next script. A script either fails to
//! open or yields a channel that replays its frames in order and then closes,
//! or stays open when `hold_open` is set. Once the scripts run out, every
//! further connect attempt fails.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use url::Url;

use crate::domain::ConnectionState;
use crate::error::{Error, Result};
use crate::port::{PushChannel, PushConnector};

/// One scripted inbound frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Text(String),
    Error(String),
    Close,
}

/// Script for one connection attempt.
#[derive(Debug, Clone)]
pub struct Script {
    refuse: Option<String>,
    frames: VecDeque<Frame>,
    gap: Option<Duration>,
    hold_open: bool,
}

impl Script {
    /// A channel that opens and then closes once its frames are drained.
    pub fn open() -> Self {
        Self {
            refuse: None,
            frames: VecDeque::new(),
            gap: None,
            hold_open: false,
        }
    }

    /// A connect attempt that fails.
    pub fn refused(reason: &str) -> Self {
        Self {
            refuse: Some(reason.to_string()),
            ..Self::open()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.frames.push_back(Frame::Text(text.into()));
        self
    }

    pub fn error(mut self, reason: &str) -> Self {
        self.frames.push_back(Frame::Error(reason.to_string()));
        self
    }

    pub fn close(mut self) -> Self {
        self.frames.push_back(Frame::Close);
        self
    }

    /// Delay before each frame.
    pub fn gap(mut self, gap: Duration) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Keep the channel open after the frames run out.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

/// A connector replaying scripted sessions.
pub struct ScriptedConnector {
    scripts: Mutex<VecDeque<Script>>,
    urls: Mutex<Vec<Url>>,
    connect_count: Arc<AtomicU32>,
    close_count: Arc<AtomicU32>,
}

impl ScriptedConnector {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            urls: Mutex::new(Vec::new()),
            connect_count: Arc::new(AtomicU32::new(0)),
            close_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Number of connect attempts, successful or not.
    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }

    /// Number of channels closed through [`PushChannel::close`].
    pub fn close_count(&self) -> u32 {
        self.close_count.load(Ordering::SeqCst)
    }

    /// URLs passed to `connect`, in order.
    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl PushConnector for ScriptedConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn PushChannel>> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.clone());

        let script = self.scripts.lock().pop_front();
        match script {
            None => Err(Error::Connection("no scripted channel".into())),
            Some(Script {
                refuse: Some(reason),
                ..
            }) => Err(Error::Connection(reason)),
            Some(script) => Ok(Box::new(ScriptedChannel {
                frames: script.frames,
                gap: script.gap,
                hold_open: script.hold_open,
                close_count: Arc::clone(&self.close_count),
            })),
        }
    }
}

struct ScriptedChannel {
    frames: VecDeque<Frame>,
    gap: Option<Duration>,
    hold_open: bool,
    close_count: Arc<AtomicU32>,
}

#[async_trait]
impl PushChannel for ScriptedChannel {
    async fn recv(&mut self) -> Option<Result<String>> {
        if let Some(gap) = self.gap {
            tokio::time::sleep(gap).await;
        }
        match self.frames.pop_front() {
            Some(Frame::Text(text)) => Some(Ok(text)),
            Some(Frame::Error(reason)) => Some(Err(Error::Connection(reason))),
            Some(Frame::Close) => None,
            None if self.hold_open => std::future::pending().await,
            None => None,
        }
    }

    async fn close(&mut self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Wait until the watched state equals `target`, or `timeout` elapses.
pub async fn wait_for_state(
    states: &mut watch::Receiver<ConnectionState>,
    target: ConnectionState,
    timeout: Duration,
) -> bool {
    let reached = async {
        loop {
            if *states.borrow_and_update() == target {
                return true;
            }
            if states.changed().await.is_err() {
                return false;
            }
        }
    };
    tokio::time::timeout(timeout, reached).await.unwrap_or(false)
}
