//! Event handling for the TUI application.
//!
//! Terminal events are read from crossterm's async `EventStream` and merged
//! with a periodic tick.

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Terminal events that the application can handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Mouse wheel or click
    Mouse(MouseEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Periodic tick
    Tick,
}

/// Event source combining terminal input with a tick timer.
pub struct EventHandler {
    stream: EventStream,
    tick: Interval,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let mut tick = tokio::time::interval(Duration::from_millis(tick_rate_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            tick,
        }
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the terminal input stream has ended.
    pub async fn next(&mut self) -> Option<std::io::Result<Event>> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Some(Ok(Event::Tick)),
                maybe = self.stream.next() => {
                    let event = match maybe? {
                        Ok(event) => event,
                        Err(e) => return Some(Err(e)),
                    };
                    if let Some(event) = Self::convert(event) {
                        return Some(Ok(event));
                    }
                }
            }
        }
    }

    fn convert(event: CrosstermEvent) -> Option<Event> {
        match event {
            // Ignore key releases reported by some terminals.
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        }
    }
}
