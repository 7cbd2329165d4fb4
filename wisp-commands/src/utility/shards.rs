use std::collections::BTreeMap;
use std::time::Duration;

use wisp_core::{Context, Error, RateLimit};
use wisp_utils::table::{code_block, pad_code_block_from_rows, widest_line};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "shards",
    aliases: &[],
    desc: "Show all of the bot's shard information",
    category: "utility",
    usage: "!shards",
    examples: &["shards"],
    ratelimits: &[
        RateLimit::per_guild(5, 5_000),
        RateLimit::per_channel(1, 1_000),
    ],
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShardStats {
    pub guilds: u64,
    pub members: u64,
    pub latency: Option<Duration>,
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn shards(ctx: Context<'_>) -> Result<(), Error> {
    let current_shard = ctx.serenity_context().shard_id.0;

    let shard_manager = ctx.framework().shard_manager().clone();
    let latencies = {
        let runners = shard_manager.runners.lock().await;
        runners
            .iter()
            .map(|(shard_id, info)| (shard_id.0, info.latency))
            .collect::<Vec<_>>()
    };

    let cache = ctx.cache();
    let shard_count = cache.shard_count().max(1);
    let guilds = cache
        .guilds()
        .into_iter()
        .filter_map(|guild_id| {
            let member_count = cache.guild(guild_id).map(|guild| guild.member_count)?;
            Some((serenity::utils::shard_id(guild_id, shard_count), member_count))
        })
        .collect::<Vec<_>>();

    let stats = collect_shard_stats(latencies, guilds);
    ctx.say(shard_table(current_shard, shard_count, &stats)).await?;
    Ok(())
}

/// Merge runner latencies with `(shard, member_count)` pairs for each cached
/// guild.
pub fn collect_shard_stats(
    latencies: impl IntoIterator<Item = (u32, Option<Duration>)>,
    guilds: impl IntoIterator<Item = (u32, u64)>,
) -> BTreeMap<u32, ShardStats> {
    let mut stats = latencies
        .into_iter()
        .map(|(shard_id, latency)| {
            (
                shard_id,
                ShardStats {
                    latency,
                    ..Default::default()
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    for (shard_id, member_count) in guilds {
        let entry = stats.entry(shard_id).or_default();
        entry.guilds += 1;
        entry.members += member_count;
    }

    stats
}

/// Render the shard overview as a `py` code block.
pub fn shard_table(current_shard: u32, shard_count: u32, stats: &BTreeMap<u32, ShardStats>) -> String {
    let title = vec![
        vec!["Shard:".to_owned(), current_shard.to_string()],
        vec!["Shards:".to_owned(), shard_count.to_string()],
    ];

    let mut rows = vec![vec![
        "S".to_owned(),
        "G".to_owned(),
        "M".to_owned(),
        "Ping".to_owned(),
    ]];

    for (shard_id, shard) in stats {
        rows.push(vec![
            shard_id.to_string(),
            shard.guilds.to_string(),
            shard.members.to_string(),
            format_latency(shard.latency),
        ]);
    }

    let latencies = stats
        .values()
        .filter_map(|shard| shard.latency)
        .collect::<Vec<_>>();
    let average_latency = if latencies.is_empty() {
        None
    } else {
        Some(latencies.iter().sum::<Duration>() / latencies.len() as u32)
    };

    rows.push(vec![
        "T".to_owned(),
        stats.values().map(|shard| shard.guilds).sum::<u64>().to_string(),
        stats.values().map(|shard| shard.members).sum::<u64>().to_string(),
        format_latency(average_latency),
    ]);

    let mut padded_rows = pad_code_block_from_rows(&rows, "| ");
    let separator = "-".repeat(widest_line(&padded_rows));
    padded_rows.insert(1, separator);

    let body = format!(
        "{}\n\n{}",
        pad_code_block_from_rows(&title, " ").join("\n"),
        padded_rows.join("\n")
    );
    code_block("py", &body)
}

fn format_latency(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("{}ms", latency.as_millis()),
        None => "-".to_owned(),
    }
}
