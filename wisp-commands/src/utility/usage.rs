use wisp_core::{Context, Error};

use crate::utility::embeds::usage_description;
use crate::{CommandMeta, find_command};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    aliases: &[],
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
    examples: &["usage user", "usage r"],
    ratelimits: &[],
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let prefix = ctx.data().command_prefix.as_str();
    let lookup = raw_name.trim().trim_start_matches(prefix).to_ascii_lowercase();

    let Some(command) = find_command(&lookup) else {
        ctx.say(format!("Unknown command: `{}`", lookup)).await?;
        return Ok(());
    };

    ctx.say(usage_description(command, prefix)).await?;
    Ok(())
}
