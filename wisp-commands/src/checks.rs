use std::time::{Duration, Instant};

use wisp_core::{Context, Error, RateLimitTarget};
use wisp_utils::formatting::format_compact_duration;

use crate::find_command;

/// Framework-wide check enforcing each command's registry rate limits.
///
/// Replies with the wait time and returns `false` when a limit is exhausted.
pub async fn ratelimit_check(ctx: Context<'_>) -> Result<bool, Error> {
    let data = ctx.data();
    if !data.ratelimits_enabled {
        return Ok(true);
    }

    let Some(meta) = find_command(&ctx.command().name) else {
        return Ok(true);
    };

    let target = RateLimitTarget {
        guild_id: ctx.guild_id().map(|id| id.get()),
        channel_id: ctx.channel_id().get(),
        user_id: ctx.author().id.get(),
    };

    match data
        .ratelimiter
        .check(meta.name, meta.ratelimits, target, Instant::now())
    {
        Ok(()) => Ok(true),
        Err(retry_after) => {
            ctx.say(ratelimited_message(retry_after)).await?;
            Ok(false)
        }
    }
}

pub fn ratelimited_message(retry_after: Duration) -> String {
    let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    format!(
        "Slow down! Try again in {}.",
        format_compact_duration(seconds.max(1))
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ratelimited_message;

    #[test]
    fn wait_time_rounds_up_to_whole_seconds() {
        assert_eq!(
            ratelimited_message(Duration::from_millis(2_100)),
            "Slow down! Try again in 3s."
        );
        assert_eq!(
            ratelimited_message(Duration::from_secs(5)),
            "Slow down! Try again in 5s."
        );
        assert_eq!(
            ratelimited_message(Duration::ZERO),
            "Slow down! Try again in 1s."
        );
    }
}
