use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

/// Bucket count above which expired windows are swept on the next check.
const PRUNE_THRESHOLD: usize = 1_024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateLimitScope {
    Guild,
    Channel,
    User,
}

/// At most `limit` invocations per `duration`, counted per `scope`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u32,
    pub duration: Duration,
    pub scope: RateLimitScope,
}

impl RateLimit {
    pub const fn new(limit: u32, duration_ms: u64, scope: RateLimitScope) -> Self {
        Self {
            limit,
            duration: Duration::from_millis(duration_ms),
            scope,
        }
    }

    pub const fn per_guild(limit: u32, duration_ms: u64) -> Self {
        Self::new(limit, duration_ms, RateLimitScope::Guild)
    }

    pub const fn per_channel(limit: u32, duration_ms: u64) -> Self {
        Self::new(limit, duration_ms, RateLimitScope::Channel)
    }

    pub const fn per_user(limit: u32, duration_ms: u64) -> Self {
        Self::new(limit, duration_ms, RateLimitScope::User)
    }
}

/// Where an invocation happened, used to pick the bucket for each scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitTarget {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub user_id: u64,
}

impl RateLimitTarget {
    /// Resolve the bucket id for a scope. Guild limits fall back to the
    /// channel outside of guilds.
    fn bucket_for(&self, scope: RateLimitScope) -> (RateLimitScope, u64) {
        match scope {
            RateLimitScope::Guild => match self.guild_id {
                Some(guild_id) => (RateLimitScope::Guild, guild_id),
                None => (RateLimitScope::Channel, self.channel_id),
            },
            RateLimitScope::Channel => (RateLimitScope::Channel, self.channel_id),
            RateLimitScope::User => (RateLimitScope::User, self.user_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BucketKey {
    command: String,
    scope: RateLimitScope,
    id: u64,
    duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Window {
    started_at: Instant,
    hits: u32,
}

impl Window {
    fn is_expired(&self, duration: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= duration
    }
}

/// Fixed-window limiter over `(command, scope, id)` buckets.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<BucketKey, Window>>>,
}

impl RateLimiter {
    /// Record one invocation of `command` if every limit still has room.
    ///
    /// Nothing is recorded when any limit is exhausted; the error carries the
    /// longest wait among the exhausted limits.
    pub fn check(
        &self,
        command: &str,
        limits: &[RateLimit],
        target: RateLimitTarget,
        now: Instant,
    ) -> Result<(), Duration> {
        if limits.is_empty() {
            return Ok(());
        }

        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        if buckets.len() > PRUNE_THRESHOLD {
            prune_expired(&mut buckets, now);
        }

        let keys = limits
            .iter()
            .map(|limit| {
                let (scope, id) = target.bucket_for(limit.scope);
                (
                    limit,
                    BucketKey {
                        command: command.to_owned(),
                        scope,
                        id,
                        duration: limit.duration,
                    },
                )
            })
            .collect::<Vec<_>>();

        let retry_after = keys
            .iter()
            .filter_map(|(limit, key)| {
                let window = buckets.get(key)?;
                if window.is_expired(limit.duration, now) || window.hits < limit.limit {
                    return None;
                }
                Some((window.started_at + limit.duration).saturating_duration_since(now))
            })
            .max();

        if let Some(retry_after) = retry_after {
            debug!(command, ?retry_after, "rate limit exhausted");
            return Err(retry_after);
        }

        for (limit, key) in keys {
            let window = buckets.entry(key).or_insert(Window {
                started_at: now,
                hits: 0,
            });
            if window.is_expired(limit.duration, now) {
                *window = Window {
                    started_at: now,
                    hits: 0,
                };
            }
            window.hits += 1;
        }

        Ok(())
    }

    /// Drop every window that has already closed.
    pub fn prune(&self, now: Instant) {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        prune_expired(&mut buckets, now);
    }

    pub fn tracked_buckets(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn prune_expired(buckets: &mut HashMap<BucketKey, Window>, now: Instant) {
    buckets.retain(|key, window| !window.is_expired(key.duration, now));
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{RateLimit, RateLimitTarget, RateLimiter};

    const GUILD_TARGET: RateLimitTarget = RateLimitTarget {
        guild_id: Some(10),
        channel_id: 20,
        user_id: 30,
    };

    #[test]
    fn allows_up_to_limit_within_window() {
        let limiter = RateLimiter::default();
        let limits = [RateLimit::per_guild(5, 5_000)];
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check("user", &limits, GUILD_TARGET, now).is_ok());
        }

        let retry = limiter
            .check("user", &limits, GUILD_TARGET, now + Duration::from_secs(2))
            .unwrap_err();
        assert_eq!(retry, Duration::from_secs(3));
    }

    #[test]
    fn window_resets_after_duration() {
        let limiter = RateLimiter::default();
        let limits = [RateLimit::per_channel(1, 1_000)];
        let now = Instant::now();

        assert!(limiter.check("shards", &limits, GUILD_TARGET, now).is_ok());
        assert!(limiter.check("shards", &limits, GUILD_TARGET, now).is_err());
        assert!(
            limiter
                .check("shards", &limits, GUILD_TARGET, now + Duration::from_secs(1))
                .is_ok()
        );
    }

    #[test]
    fn commands_and_guilds_use_separate_buckets() {
        let limiter = RateLimiter::default();
        let limits = [RateLimit::per_guild(1, 5_000)];
        let now = Instant::now();
        let other_guild = RateLimitTarget {
            guild_id: Some(11),
            ..GUILD_TARGET
        };

        assert!(limiter.check("user", &limits, GUILD_TARGET, now).is_ok());
        assert!(limiter.check("channel", &limits, GUILD_TARGET, now).is_ok());
        assert!(limiter.check("user", &limits, other_guild, now).is_ok());
        assert!(limiter.check("user", &limits, GUILD_TARGET, now).is_err());
    }

    #[test]
    fn blocked_check_does_not_consume_other_limits() {
        let limiter = RateLimiter::default();
        let limits = [
            RateLimit::per_guild(2, 5_000),
            RateLimit::per_channel(1, 1_000),
        ];
        let now = Instant::now();

        assert!(limiter.check("shards", &limits, GUILD_TARGET, now).is_ok());
        for _ in 0..10 {
            assert!(limiter.check("shards", &limits, GUILD_TARGET, now).is_err());
        }

        // Only the first call counted against the guild window.
        let one_second = now + Duration::from_secs(1);
        assert!(limiter.check("shards", &limits, GUILD_TARGET, one_second).is_ok());

        let two_seconds = now + Duration::from_secs(2);
        let retry = limiter
            .check("shards", &limits, GUILD_TARGET, two_seconds)
            .unwrap_err();
        assert_eq!(retry, Duration::from_secs(3));
    }

    #[test]
    fn guild_scope_falls_back_to_channel_in_dms() {
        let limiter = RateLimiter::default();
        let limits = [RateLimit::per_guild(1, 5_000)];
        let now = Instant::now();
        let dm = RateLimitTarget {
            guild_id: None,
            channel_id: 99,
            user_id: 30,
        };
        let other_dm = RateLimitTarget {
            channel_id: 100,
            ..dm
        };

        assert!(limiter.check("reversetext", &limits, dm, now).is_ok());
        assert!(limiter.check("reversetext", &limits, dm, now).is_err());
        assert!(limiter.check("reversetext", &limits, other_dm, now).is_ok());
    }

    #[test]
    fn user_scope_tracks_each_user() {
        let limiter = RateLimiter::default();
        let limits = [RateLimit::per_user(1, 2_000)];
        let now = Instant::now();
        let other_user = RateLimitTarget {
            user_id: 31,
            ..GUILD_TARGET
        };

        assert!(limiter.check("ping", &limits, GUILD_TARGET, now).is_ok());
        assert!(limiter.check("ping", &limits, other_user, now).is_ok());
        assert!(limiter.check("ping", &limits, GUILD_TARGET, now).is_err());
    }

    #[test]
    fn empty_limits_never_track_state() {
        let limiter = RateLimiter::default();
        let now = Instant::now();

        for _ in 0..100 {
            assert!(limiter.check("help", &[], GUILD_TARGET, now).is_ok());
        }
        assert_eq!(limiter.tracked_buckets(), 0);
    }

    #[test]
    fn prune_drops_closed_windows() {
        let limiter = RateLimiter::default();
        let now = Instant::now();

        limiter
            .check("user", &[RateLimit::per_guild(5, 1_000)], GUILD_TARGET, now)
            .unwrap();
        limiter
            .check("channel", &[RateLimit::per_guild(5, 10_000)], GUILD_TARGET, now)
            .unwrap();
        assert_eq!(limiter.tracked_buckets(), 2);

        limiter.prune(now + Duration::from_secs(2));
        assert_eq!(limiter.tracked_buckets(), 1);
    }
}
