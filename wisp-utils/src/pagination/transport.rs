//! Messaging seam between the pagination controller and a chat client.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Navigation requested by a reaction (or any other control surface).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    First,
    Previous,
    Next,
    Last,
    Stop,
}

impl Direction {
    /// Display order of the navigation controls.
    pub const CONTROLS: [Direction; 5] = [
        Direction::First,
        Direction::Previous,
        Direction::Stop,
        Direction::Next,
        Direction::Last,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Direction::First => "\u{23EE}\u{FE0F}",
            Direction::Previous => "\u{25C0}\u{FE0F}",
            Direction::Next => "\u{25B6}\u{FE0F}",
            Direction::Last => "\u{23ED}\u{FE0F}",
            Direction::Stop => "\u{23F9}\u{FE0F}",
        }
    }

    /// Map a unicode reaction back to a direction, with or without the
    /// emoji presentation selector.
    pub fn from_emoji(raw: &str) -> Option<Self> {
        let base = raw.trim_end_matches('\u{FE0F}');
        Self::CONTROLS
            .into_iter()
            .find(|direction| direction.emoji().trim_end_matches('\u{FE0F}') == base)
    }

    /// Page reached from `current` when moving in this direction. Clamps to
    /// `[1, page_count]` and never wraps.
    pub fn target_page(self, current: usize, page_count: usize) -> usize {
        let page_count = page_count.max(1);
        let current = current.clamp(1, page_count);

        match self {
            Direction::First => 1,
            Direction::Previous => current.saturating_sub(1).max(1),
            Direction::Next => (current + 1).min(page_count),
            Direction::Last => page_count,
            Direction::Stop => current,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    pub direction: Direction,
    pub actor_id: serenity::UserId,
}

impl NavigationEvent {
    pub fn new(direction: Direction, actor_id: serenity::UserId) -> Self {
        Self {
            direction,
            actor_id,
        }
    }
}

/// Stream of navigation events for one message.
///
/// Dropping the subscription aborts the task feeding it.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<NavigationEvent>,
    forwarder: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(events: mpsc::Receiver<NavigationEvent>) -> Self {
        Self {
            events,
            forwarder: None,
        }
    }

    pub fn with_forwarder(events: mpsc::Receiver<NavigationEvent>, forwarder: JoinHandle<()>) -> Self {
        Self {
            events,
            forwarder: Some(forwarder),
        }
    }

    /// Wait for the next event. `None` once the source has closed.
    pub async fn next(&mut self) -> Option<NavigationEvent> {
        self.events.recv().await
    }

    /// Discard everything already buffered, returning how many were dropped.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.events.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

/// Operations the controller needs from the messaging client.
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Rendered page, opaque to the controller.
    type Content: Send + Sync;
    /// Reference to the message being paginated.
    type Handle: Send + Sync;

    async fn send(&self, content: &Self::Content) -> anyhow::Result<Self::Handle>;

    async fn edit(&self, handle: &Self::Handle, content: &Self::Content) -> anyhow::Result<()>;

    /// Replace the page with a plain failure notice.
    async fn notify_failure(&self, handle: &Self::Handle, notice: &str) -> anyhow::Result<()>;

    async fn subscribe(&self, handle: &Self::Handle) -> anyhow::Result<Subscription>;

    async fn add_controls(&self, handle: &Self::Handle, directions: &[Direction]) -> anyhow::Result<()>;

    async fn clear_controls(&self, handle: &Self::Handle) -> anyhow::Result<()>;
}
