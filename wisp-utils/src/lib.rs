/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (durations, markdown escaping, timestamps).
pub mod formatting;
/// Reaction-driven pagination controller.
pub mod pagination;
/// Monospace table padding for code-block replies.
pub mod table;
