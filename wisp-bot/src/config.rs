use std::env;
use std::time::Duration;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::warn;

use wisp_core::{DEFAULT_COMMAND_PREFIX, DEFAULT_PAGINATION_TIMEOUT};

/// Startup settings read from the process environment (and `.env`).
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    /// Register slash commands in this guild only; global when unset.
    pub guild_id: Option<serenity::GuildId>,
    pub prefix: String,
    pub pagination_timeout: Duration,
    pub ratelimits_enabled: bool,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
            .context("DISCORD_TOKEN must be set")?;

        let guild_id = match lookup("DISCORD_GUILD_ID")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
        {
            Some(raw) => {
                let id = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|id| *id != 0)
                    .with_context(|| format!("DISCORD_GUILD_ID is not a valid id: {raw}"))?;
                Some(serenity::GuildId::new(id))
            }
            None => None,
        };

        let prefix = lookup("WISP_PREFIX")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_owned());

        let timeout_secs = parse_u64(
            lookup("PAGINATION_TIMEOUT_SECS"),
            DEFAULT_PAGINATION_TIMEOUT.as_secs(),
        );
        let pagination_timeout = if timeout_secs == 0 {
            warn!("PAGINATION_TIMEOUT_SECS must be positive; using the default.");
            DEFAULT_PAGINATION_TIMEOUT
        } else {
            Duration::from_secs(timeout_secs)
        };

        Ok(Self {
            token,
            guild_id,
            prefix,
            pagination_timeout,
            ratelimits_enabled: parse_bool(lookup("RATELIMITS_ENABLED"), true),
        })
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn parse_u64(value: Option<String>, default: u64) -> u64 {
    match value {
        Some(value) => value.trim().parse::<u64>().unwrap_or(default),
        None => default,
    }
}
