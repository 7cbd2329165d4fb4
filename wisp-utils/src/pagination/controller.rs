use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use super::error::PaginationError;
use super::transport::{Direction, NavigationEvent, PageTransport, Subscription};

/// Default idle timeout for a pagination session.
pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_secs(60);

/// Shown in place of the page when a session ends on a failure.
pub const FAILURE_NOTICE: &str = "⚠ Something went wrong while loading this page.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginatorOptions {
    /// Starting page, 1-based.
    pub page: usize,
    pub expire_after: Duration,
    /// Only this user may navigate when set.
    pub author_id: Option<serenity::UserId>,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            page: 1,
            expire_after: DEFAULT_EXPIRE_AFTER,
            author_id: None,
        }
    }
}

impl PaginatorOptions {
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn expire_after(mut self, expire_after: Duration) -> Self {
        self.expire_after = expire_after;
        self
    }

    pub fn author_id(mut self, author_id: serenity::UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Pending,
    Active,
    Stopped,
}

#[derive(Debug)]
struct Session<H> {
    current_page: usize,
    page_count: usize,
    message: Option<H>,
    is_locked: bool,
    last_activity_at: Instant,
    state: SessionState,
}

/// Why a navigation event did not move the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    Inactive,
    NotAuthor,
    /// A navigation is already in flight. `handle_event` borrows the session
    /// mutably, so calls are serialized and `run` drains the backlog after
    /// each processed event; a single caller never observes this.
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Ignored(IgnoreReason),
    /// Target page was the current page; nothing was rendered or edited.
    Unchanged,
    Moved(usize),
    Stopped,
    /// Render or edit failed and the session ended.
    Failed,
}

/// Drives one message through a sequence of rendered pages.
pub struct Paginator<T, R>
where
    T: PageTransport,
{
    transport: T,
    render: R,
    options: PaginatorOptions,
    session: Session<T::Handle>,
    subscription: Option<Subscription>,
    rendered: Option<T::Content>,
}

impl<T, R> Paginator<T, R>
where
    T: PageTransport,
    R: Fn(usize) -> anyhow::Result<T::Content> + Send + Sync,
{
    pub fn new(
        transport: T,
        page_count: usize,
        render: R,
        options: PaginatorOptions,
    ) -> Result<Self, PaginationError> {
        if page_count < 1 {
            return Err(PaginationError::invalid("page count must be at least 1"));
        }

        if !(1..=page_count).contains(&options.page) {
            return Err(PaginationError::invalid(format!(
                "starting page {} is outside 1-{}",
                options.page, page_count
            )));
        }

        if options.expire_after.is_zero() {
            return Err(PaginationError::invalid("idle timeout must be non-zero"));
        }

        Ok(Self {
            transport,
            render,
            session: Session {
                current_page: options.page,
                page_count,
                message: None,
                is_locked: false,
                last_activity_at: Instant::now(),
                state: SessionState::Pending,
            },
            options,
            subscription: None,
            rendered: None,
        })
    }

    pub fn current_page(&self) -> usize {
        self.session.current_page
    }

    pub fn page_count(&self) -> usize {
        self.session.page_count
    }

    pub fn is_active(&self) -> bool {
        self.session.state == SessionState::Active
    }

    pub fn is_stopped(&self) -> bool {
        self.session.state == SessionState::Stopped
    }

    /// Content of the most recently rendered page.
    pub fn rendered(&self) -> Option<&T::Content> {
        self.rendered.as_ref()
    }

    /// Send the starting page and begin listening for navigation.
    ///
    /// Single-page sessions never attach controls or subscribe, and are
    /// already finished when this returns.
    pub async fn start(&mut self) -> Result<&T::Content, PaginationError> {
        if self.session.state != SessionState::Pending {
            return Err(PaginationError::invalid("paginator was already started"));
        }

        let page = self.session.current_page;
        let content = (self.render)(page)
            .map_err(|source| PaginationError::RenderFailure { page, source })?;

        let handle = self
            .transport
            .send(&content)
            .await
            .map_err(PaginationError::Transport)?;

        self.rendered = Some(content);
        self.session.last_activity_at = Instant::now();

        if self.session.page_count <= 1 {
            self.session.message = Some(handle);
            self.session.state = SessionState::Stopped;
            debug!("single page reply, pagination skipped");
            return self.rendered_content();
        }

        if let Err(error) = self
            .transport
            .add_controls(&handle, &Direction::CONTROLS)
            .await
        {
            warn!(?error, "failed to attach pagination controls");
        }

        let subscription = self.transport.subscribe(&handle).await;
        self.session.message = Some(handle);

        match subscription {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.session.state = SessionState::Active;
                debug!(
                    page,
                    page_count = self.session.page_count,
                    "pagination session started"
                );
            }
            Err(error) => {
                warn!(?error, "failed to subscribe to pagination events");
                self.session.state = SessionState::Active;
                self.stop().await;
            }
        }

        self.rendered_content()
    }

    fn rendered_content(&self) -> Result<&T::Content, PaginationError> {
        self.rendered
            .as_ref()
            .ok_or_else(|| PaginationError::invalid("no page has been rendered"))
    }

    /// Apply one navigation event.
    pub async fn handle_event(&mut self, event: NavigationEvent) -> NavigationOutcome {
        if self.session.state != SessionState::Active {
            return NavigationOutcome::Ignored(IgnoreReason::Inactive);
        }

        if let Some(author_id) = self.options.author_id
            && event.actor_id != author_id
        {
            return NavigationOutcome::Ignored(IgnoreReason::NotAuthor);
        }

        if self.session.is_locked {
            return NavigationOutcome::Ignored(IgnoreReason::Locked);
        }

        if event.direction == Direction::Stop {
            self.stop().await;
            return NavigationOutcome::Stopped;
        }

        self.session.is_locked = true;
        let outcome = self.navigate(event.direction).await;
        self.session.is_locked = false;

        outcome
    }

    async fn navigate(&mut self, direction: Direction) -> NavigationOutcome {
        let target = direction.target_page(self.session.current_page, self.session.page_count);
        self.session.last_activity_at = Instant::now();

        if target == self.session.current_page {
            return NavigationOutcome::Unchanged;
        }

        let content = match (self.render)(target) {
            Ok(content) => content,
            Err(error) => {
                warn!(?error, page = target, "failed to render page");
                self.fail().await;
                return NavigationOutcome::Failed;
            }
        };

        let Some(handle) = self.session.message.as_ref() else {
            return NavigationOutcome::Ignored(IgnoreReason::Inactive);
        };

        if let Err(error) = self.transport.edit(handle, &content).await {
            warn!(?error, page = target, "failed to edit paginated message");
            self.fail().await;
            return NavigationOutcome::Failed;
        }

        if self.is_stopped() {
            return NavigationOutcome::Ignored(IgnoreReason::Inactive);
        }

        self.session.current_page = target;
        self.rendered = Some(content);
        NavigationOutcome::Moved(target)
    }

    async fn fail(&mut self) {
        if let Some(handle) = self.session.message.as_ref()
            && let Err(error) = self.transport.notify_failure(handle, FAILURE_NOTICE).await
        {
            debug!(?error, "failed to show pagination failure notice");
        }
        self.stop().await;
    }

    /// End the session: drop the subscription and strip the controls.
    ///
    /// Returns `false` when the session had already stopped.
    pub async fn stop(&mut self) -> bool {
        let previous = self.session.state;
        if previous == SessionState::Stopped {
            return false;
        }

        self.session.state = SessionState::Stopped;
        self.subscription = None;

        if previous == SessionState::Active
            && let Some(handle) = self.session.message.as_ref()
            && let Err(error) = self.transport.clear_controls(handle).await
        {
            debug!(?error, "failed to clear pagination controls");
        }

        debug!(page = self.session.current_page, "pagination session stopped");
        true
    }

    /// Process events until stopped, the source closes, or the session has
    /// been idle for `expire_after`.
    ///
    /// Events that arrive while a navigation is being processed are dropped;
    /// ignored events (wrong user, inactive) leave the queue untouched.
    pub async fn run(&mut self) {
        enum Wake {
            Event(Option<NavigationEvent>),
            Idle,
        }

        while self.is_active() {
            let Some(subscription) = self.subscription.as_mut() else {
                break;
            };

            let deadline = self.session.last_activity_at + self.options.expire_after;
            let wake = tokio::select! {
                event = subscription.next() => Wake::Event(event),
                () = time::sleep_until(deadline) => Wake::Idle,
            };

            match wake {
                Wake::Event(Some(event)) => {
                    let outcome = self.handle_event(event).await;
                    debug!(?event, ?outcome, "pagination event handled");

                    // Ignored events never locked the session, so nothing
                    // queued behind them arrived while busy.
                    if matches!(outcome, NavigationOutcome::Ignored(_)) {
                        continue;
                    }

                    if let Some(subscription) = self.subscription.as_mut() {
                        let dropped = subscription.drain();
                        if dropped > 0 {
                            debug!(dropped, "dropped navigation events received while busy");
                        }
                    }
                }
                Wake::Event(None) => {
                    debug!("pagination event source closed");
                    break;
                }
                Wake::Idle => {
                    debug!(
                        expire_after = ?self.options.expire_after,
                        "pagination session expired"
                    );
                    break;
                }
            }
        }

        self.stop().await;
    }

    /// `start` followed by `run`.
    pub async fn paginate(&mut self) -> Result<(), PaginationError> {
        self.start().await?;
        self.run().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use poise::serenity_prelude as serenity;
    use tokio::sync::mpsc;

    use super::{
        FAILURE_NOTICE, IgnoreReason, NavigationOutcome, PaginationError, Paginator,
        PaginatorOptions,
    };
    use crate::pagination::transport::{
        Direction, NavigationEvent, PageTransport, Subscription,
    };

    #[derive(Debug, Default)]
    struct Log {
        sent: Vec<String>,
        edits: Vec<String>,
        notices: Vec<String>,
        controls_added: Vec<Vec<Direction>>,
        controls_cleared: usize,
        subscriptions: usize,
        fail_send: bool,
        fail_edit: bool,
        fail_subscribe: bool,
    }

    struct RecordingTransport {
        log: Arc<Mutex<Log>>,
        events: Mutex<Option<mpsc::Receiver<NavigationEvent>>>,
    }

    impl RecordingTransport {
        fn new() -> (Self, Arc<Mutex<Log>>, mpsc::Sender<NavigationEvent>) {
            let log = Arc::new(Mutex::new(Log::default()));
            let (tx, rx) = mpsc::channel(16);
            let transport = Self {
                log: Arc::clone(&log),
                events: Mutex::new(Some(rx)),
            };
            (transport, log, tx)
        }
    }

    #[async_trait]
    impl PageTransport for RecordingTransport {
        type Content = String;
        type Handle = u64;

        async fn send(&self, content: &String) -> anyhow::Result<u64> {
            let mut log = self.log.lock().unwrap();
            if log.fail_send {
                anyhow::bail!("send refused");
            }
            log.sent.push(content.clone());
            Ok(42)
        }

        async fn edit(&self, _handle: &u64, content: &String) -> anyhow::Result<()> {
            let mut log = self.log.lock().unwrap();
            if log.fail_edit {
                anyhow::bail!("edit refused");
            }
            log.edits.push(content.clone());
            Ok(())
        }

        async fn notify_failure(&self, _handle: &u64, notice: &str) -> anyhow::Result<()> {
            self.log.lock().unwrap().notices.push(notice.to_owned());
            Ok(())
        }

        async fn subscribe(&self, _handle: &u64) -> anyhow::Result<Subscription> {
            {
                let mut log = self.log.lock().unwrap();
                log.subscriptions += 1;
                if log.fail_subscribe {
                    anyhow::bail!("collector unavailable");
                }
            }
            let events = self
                .events
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| anyhow::anyhow!("already subscribed"))?;
            Ok(Subscription::new(events))
        }

        async fn add_controls(&self, _handle: &u64, directions: &[Direction]) -> anyhow::Result<()> {
            self.log.lock().unwrap().controls_added.push(directions.to_vec());
            Ok(())
        }

        async fn clear_controls(&self, _handle: &u64) -> anyhow::Result<()> {
            self.log.lock().unwrap().controls_cleared += 1;
            Ok(())
        }
    }

    fn render(page: usize) -> anyhow::Result<String> {
        Ok(format!("page {page}"))
    }

    fn user(id: u64) -> serenity::UserId {
        serenity::UserId::new(id)
    }

    fn event(direction: Direction) -> NavigationEvent {
        NavigationEvent::new(direction, user(1))
    }

    #[test]
    fn rejects_empty_and_out_of_range_construction() {
        let (transport, _, _) = RecordingTransport::new();
        let result = Paginator::new(transport, 0, render, PaginatorOptions::default());
        assert!(matches!(result, Err(PaginationError::InvalidArgument(_))));

        let (transport, _, _) = RecordingTransport::new();
        let result = Paginator::new(transport, 3, render, PaginatorOptions::default().page(4));
        assert!(matches!(result, Err(PaginationError::InvalidArgument(_))));

        let (transport, _, _) = RecordingTransport::new();
        let result = Paginator::new(
            transport,
            3,
            render,
            PaginatorOptions::default().expire_after(Duration::ZERO),
        );
        assert!(matches!(result, Err(PaginationError::InvalidArgument(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn walks_forward_and_clamps_at_last_page() {
        let (transport, log, _tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();

        let first = paginator.start().await.unwrap().clone();
        assert_eq!(first, "page 1");

        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Moved(2)
        );
        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Moved(3)
        );
        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Unchanged
        );

        let log = log.lock().unwrap();
        assert_eq!(log.sent, vec!["page 1"]);
        assert_eq!(log.edits, vec!["page 2", "page 3"]);
        assert_eq!(log.controls_added, vec![Direction::CONTROLS.to_vec()]);
        assert_eq!(log.subscriptions, 1);
        assert_eq!(paginator.current_page(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_and_last_jump_to_bounds() {
        let (transport, log, _tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 5, render, PaginatorOptions::default().page(3)).unwrap();
        paginator.start().await.unwrap();

        assert_eq!(
            paginator.handle_event(event(Direction::Last)).await,
            NavigationOutcome::Moved(5)
        );
        assert_eq!(
            paginator.handle_event(event(Direction::First)).await,
            NavigationOutcome::Moved(1)
        );
        assert_eq!(
            paginator.handle_event(event(Direction::Previous)).await,
            NavigationOutcome::Unchanged
        );

        assert_eq!(log.lock().unwrap().sent, vec!["page 3"]);
        assert_eq!(log.lock().unwrap().edits, vec!["page 5", "page 1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn single_page_has_no_controls_and_ignores_events() {
        let (transport, log, _tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 1, render, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();

        assert!(paginator.is_stopped());
        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Ignored(IgnoreReason::Inactive)
        );
        assert!(!paginator.stop().await);

        let log = log.lock().unwrap();
        assert!(log.controls_added.is_empty());
        assert_eq!(log.subscriptions, 0);
        assert!(log.edits.is_empty());
        assert_eq!(log.controls_cleared, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn other_users_cannot_navigate_when_author_is_set() {
        let (transport, log, _tx) = RecordingTransport::new();
        let options = PaginatorOptions::default().author_id(user(1));
        let mut paginator = Paginator::new(transport, 3, render, options).unwrap();
        paginator.start().await.unwrap();

        let outcome = paginator
            .handle_event(NavigationEvent::new(Direction::Next, user(2)))
            .await;
        assert_eq!(outcome, NavigationOutcome::Ignored(IgnoreReason::NotAuthor));

        let outcome = paginator
            .handle_event(NavigationEvent::new(Direction::Stop, user(2)))
            .await;
        assert_eq!(outcome, NavigationOutcome::Ignored(IgnoreReason::NotAuthor));

        assert!(paginator.is_active());
        assert_eq!(paginator.current_page(), 1);
        assert!(log.lock().unwrap().edits.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_events_keep_only_the_first() {
        let (transport, log, tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();

        tx.send(event(Direction::Next)).await.unwrap();
        tx.send(event(Direction::Last)).await.unwrap();
        paginator.run().await;

        assert_eq!(paginator.current_page(), 2);
        let log = log.lock().unwrap();
        assert_eq!(log.edits, vec!["page 2"]);
        assert_eq!(log.controls_cleared, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_event_does_not_swallow_the_authors_next_press() {
        let (transport, log, tx) = RecordingTransport::new();
        let options = PaginatorOptions::default().author_id(user(1));
        let mut paginator = Paginator::new(transport, 3, render, options).unwrap();
        paginator.start().await.unwrap();

        tx.send(NavigationEvent::new(Direction::Next, user(2)))
            .await
            .unwrap();
        tx.send(NavigationEvent::new(Direction::Next, user(1)))
            .await
            .unwrap();
        paginator.run().await;

        assert_eq!(paginator.current_page(), 2);
        let log = log.lock().unwrap();
        assert_eq!(log.edits, vec!["page 2"]);
        assert_eq!(log.controls_cleared, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_subscription_keeps_first_page_and_stops() {
        let (transport, log, _tx) = RecordingTransport::new();
        log.lock().unwrap().fail_subscribe = true;
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();

        let first = paginator.start().await.unwrap().clone();
        assert_eq!(first, "page 1");
        assert!(paginator.is_stopped());
        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Ignored(IgnoreReason::Inactive)
        );

        let log = log.lock().unwrap();
        assert_eq!(log.sent, vec!["page 1"]);
        assert_eq!(log.subscriptions, 1);
        assert_eq!(log.controls_cleared, 1);
        assert!(log.edits.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_events_are_all_processed() {
        let (transport, log, tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();

        let session = tokio::spawn(async move {
            paginator.run().await;
            paginator
        });

        tx.send(event(Direction::Next)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(event(Direction::Next)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(event(Direction::Stop)).await.unwrap();

        let paginator = session.await.unwrap();
        assert!(paginator.is_stopped());
        assert_eq!(paginator.current_page(), 3);

        let log = log.lock().unwrap();
        assert_eq!(log.edits, vec!["page 2", "page 3"]);
        assert_eq!(log.controls_cleared, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_stops_exactly_once() {
        let (transport, log, _tx) = RecordingTransport::new();
        let options = PaginatorOptions::default().expire_after(Duration::from_secs(30));
        let mut paginator = Paginator::new(transport, 3, render, options).unwrap();
        paginator.start().await.unwrap();

        let started = tokio::time::Instant::now();
        paginator.run().await;

        assert!(started.elapsed() >= Duration::from_secs(30));
        assert!(paginator.is_stopped());
        assert!(!paginator.stop().await);
        assert!(!paginator.stop().await);
        assert_eq!(log.lock().unwrap().controls_cleared, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn activity_pushes_the_idle_deadline_back() {
        let (transport, _log, tx) = RecordingTransport::new();
        let options = PaginatorOptions::default().expire_after(Duration::from_secs(30));
        let mut paginator = Paginator::new(transport, 3, render, options).unwrap();
        paginator.start().await.unwrap();
        let started = tokio::time::Instant::now();

        let session = tokio::spawn(async move {
            paginator.run().await;
            paginator
        });

        tokio::time::sleep(Duration::from_secs(20)).await;
        tx.send(event(Direction::Next)).await.unwrap();

        let paginator = session.await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(50));
        assert_eq!(paginator.current_page(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_ends_session_with_notice() {
        let (transport, log, _tx) = RecordingTransport::new();
        let failing = |page: usize| -> anyhow::Result<String> {
            if page == 2 {
                anyhow::bail!("boom");
            }
            Ok(format!("page {page}"))
        };
        let mut paginator =
            Paginator::new(transport, 3, failing, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();

        assert_eq!(
            paginator.handle_event(event(Direction::Next)).await,
            NavigationOutcome::Failed
        );
        assert!(paginator.is_stopped());
        assert_eq!(paginator.current_page(), 1);

        let log = log.lock().unwrap();
        assert_eq!(log.notices, vec![FAILURE_NOTICE]);
        assert!(log.edits.is_empty());
        assert_eq!(log.controls_cleared, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_failures_propagate() {
        let (transport, log, _tx) = RecordingTransport::new();
        log.lock().unwrap().fail_send = true;
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();
        assert!(matches!(
            paginator.start().await,
            Err(PaginationError::Transport(_))
        ));

        let (transport, log, _tx) = RecordingTransport::new();
        let failing = |_: usize| -> anyhow::Result<String> { anyhow::bail!("boom") };
        let mut paginator =
            Paginator::new(transport, 3, failing, PaginatorOptions::default()).unwrap();
        assert!(matches!(
            paginator.start().await,
            Err(PaginationError::RenderFailure { page: 1, .. })
        ));
        assert!(log.lock().unwrap().sent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn edit_failure_ends_session_quietly() {
        let (transport, log, _tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 3, render, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();
        log.lock().unwrap().fail_edit = true;

        assert_eq!(
            paginator.handle_event(event(Direction::Last)).await,
            NavigationOutcome::Failed
        );
        assert!(paginator.is_stopped());
        assert_eq!(log.lock().unwrap().notices, vec![FAILURE_NOTICE]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_is_rejected() {
        let (transport, log, _tx) = RecordingTransport::new();
        let mut paginator =
            Paginator::new(transport, 2, render, PaginatorOptions::default()).unwrap();
        paginator.start().await.unwrap();

        assert!(matches!(
            paginator.start().await,
            Err(PaginationError::InvalidArgument(_))
        ));
        assert_eq!(log.lock().unwrap().sent.len(), 1);
    }
}
