use std::time::Duration;

/// Per-command rate limiting shared by every shard.
pub mod ratelimit;

pub use ratelimit::{RateLimit, RateLimitScope, RateLimitTarget, RateLimiter};

pub type Error = anyhow::Error;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Fallback idle timeout for paginated replies.
pub const DEFAULT_PAGINATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct Data {
    pub command_prefix: String,
    pub ratelimiter: RateLimiter,
    pub ratelimits_enabled: bool,
    pub pagination_timeout: Duration,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_owned(),
            ratelimiter: RateLimiter::default(),
            ratelimits_enabled: true,
            pagination_timeout: DEFAULT_PAGINATION_TIMEOUT,
        }
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
