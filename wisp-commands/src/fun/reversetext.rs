use wisp_core::{Context, Error};
use wisp_utils::formatting::escape_markdown;

use crate::{CommandMeta, GUILD_RATELIMITS};

pub const META: CommandMeta = CommandMeta {
    name: "reversetext",
    aliases: &["reverse", "r"],
    desc: "Reverse text",
    category: "fun",
    usage: "!reversetext <text>",
    examples: &["r NotSoBot"],
    ratelimits: GUILD_RATELIMITS,
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Fun",
    aliases("reverse", "r")
)]
pub async fn reversetext(
    ctx: Context<'_>,
    #[description = "Text to reverse"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        ctx.say("Provide some text.").await?;
        return Ok(());
    };

    ctx.say(reverse_text(&text)).await?;
    Ok(())
}

pub fn reverse_text(raw: &str) -> String {
    escape_markdown(&raw.chars().rev().collect::<String>())
}
