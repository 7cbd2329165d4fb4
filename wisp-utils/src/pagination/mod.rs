//! Reaction-driven pagination for multi-page replies.
//!
//! [`Paginator`] owns the cursor and session lifecycle and talks to the chat
//! client only through [`PageTransport`]; [`ReactionTransport`] is the
//! Discord implementation used by commands.

mod content;
mod controller;
mod error;
mod reactions;
mod transport;

pub use content::PageContent;
pub use controller::{
    DEFAULT_EXPIRE_AFTER, FAILURE_NOTICE, IgnoreReason, NavigationOutcome, Paginator,
    PaginatorOptions,
};
pub use error::PaginationError;
pub use reactions::{ReactionMessage, ReactionTransport, paginate_pages};
pub use transport::{Direction, NavigationEvent, PageTransport, Subscription};

/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    let pages = total_items.div_ceil(per_page);
    pages.max(1)
}

/// Item range shown on a 1-based `page`.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}
