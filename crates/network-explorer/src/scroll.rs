// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Hide-on-scroll-down behaviour of the filter navbar.

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{sleep_until, Duration, Instant},
};
use tokio_util::sync::CancellationToken;

/// Max number of scroll offsets queued for the dispatcher.
const SCROLL_EVENT_BUFFER: usize = 64;

/// Navbar visibility derived from the direction of the last scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollVisibility {
    last_offset: f64,
    visible: bool,
}

impl Default for ScrollVisibility {
    fn default() -> Self {
        Self { last_offset: 0.0, visible: true }
    }
}

impl ScrollVisibility {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }

    /// Record a new vertical offset. Scrolling up shows the navbar, scrolling
    /// down hides it, an unchanged offset leaves it as is. Offsets that are not
    /// finite are ignored.
    ///
    /// Returns whether the visibility changed.
    pub fn observe(&mut self, offset: f64) -> bool {
        if !offset.is_finite() {
            return false;
        }
        let was_visible = self.visible;
        if offset < self.last_offset {
            self.visible = true;
        } else if offset > self.last_offset {
            self.visible = false;
        }
        self.last_offset = offset;
        was_visible != self.visible
    }
}

/// Leading and trailing edge debouncer.
///
/// The first call of an idle window is delivered right away. Calls made while
/// the window is open extend it, and the latest of them is delivered by
/// [Debouncer::flush] once `wait` has passed without another call.
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self { wait, deadline: None, pending: None }
    }

    /// When the open window closes, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Register a call. Returns the value when it fires on the leading edge.
    ///
    /// A window that expired without being flushed counts as idle; its pending
    /// value is superseded by this call.
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        let window_open = self.deadline.is_some_and(|deadline| now < deadline);
        self.deadline = Some(now + self.wait);
        if window_open {
            self.pending = Some(value);
            None
        } else {
            self.pending = None;
            Some(value)
        }
    }

    /// Close the window if it expired, returning the trailing value.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }
}

/// Background task turning raw scroll offsets into debounced navbar visibility.
///
/// Dropping the dispatcher stops the task.
pub struct ScrollDispatcher {
    events: mpsc::Sender<f64>,
    visible: watch::Receiver<bool>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl ScrollDispatcher {
    /// Spawn the dispatcher on the current tokio runtime.
    pub fn spawn(wait: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::channel(SCROLL_EVENT_BUFFER);
        let (visible_tx, visible_rx) = watch::channel(ScrollVisibility::default().visible());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::run(events_rx, visible_tx, wait, cancel.clone()));
        Self { events: events_tx, visible: visible_rx, cancel, _task: task }
    }

    /// Report the container's current vertical offset.
    pub fn on_scroll(&self, offset: f64) {
        if let Err(err) = self.events.try_send(offset) {
            tracing::debug!("Dropping scroll event: {err:?}");
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.clone()
    }

    async fn run(
        mut events: mpsc::Receiver<f64>,
        visible: watch::Sender<bool>,
        wait: Duration,
        cancel: CancellationToken,
    ) {
        let mut debouncer = Debouncer::new(wait);
        let mut state = ScrollVisibility::default();
        let mut apply = |offset: f64| {
            if state.observe(offset) {
                tracing::trace!("Navbar visible: {} at offset {offset}", state.visible());
                visible.send_replace(state.visible());
            }
        };

        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(offset) => {
                        if let Some(offset) = debouncer.call(Instant::now(), offset) {
                            apply(offset);
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(offset) = debouncer.flush(Instant::now()) {
                        apply(offset);
                    }
                }
            }
        }
        tracing::debug!("Scroll dispatcher stopped");
    }
}

impl Drop for ScrollDispatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
