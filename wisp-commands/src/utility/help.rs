use crate::utility::embeds::{
    grouped_help_description, page_out_of_range_message, unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use wisp_core::{Context, Error};
use wisp_utils::embed::build_paginated_embed;
use wisp_utils::pagination::{PageContent, PaginatorOptions, page_window, paginate_pages, total_pages};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    aliases: &[],
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [page|category]",
    examples: &["help", "help 2", "help info"],
    ratelimits: &[],
};

const HELP_COMMANDS_PER_PAGE: usize = 10;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number or category"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };

    let categories = categories();
    if let Some(wanted_category) = category.as_deref()
        && !categories.contains(&wanted_category)
    {
        ctx.say(unknown_category_message(wanted_category, &categories))
            .await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total)).await?;
        return Ok(());
    }

    let footer_note = help_footer_note(&ctx.data().command_prefix);
    let options = PaginatorOptions::default()
        .page(requested_page)
        .author_id(ctx.author().id)
        .expire_after(ctx.data().pagination_timeout);

    paginate_pages(
        ctx,
        total,
        |page| Ok(PageContent::from(help_page(&commands, page, total, &footer_note))),
        options,
    )
    .await?;
    Ok(())
}

fn help_page(
    commands: &[&CommandMeta],
    page: usize,
    total: usize,
    footer_note: &str,
) -> poise::serenity_prelude::CreateEmbed {
    let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
    build_paginated_embed(
        "Available Commands",
        grouped_help_description(&commands[start..end]),
        page,
        total,
        Some(footer_note),
    )
}

fn help_footer_note(prefix: &str) -> String {
    format!("{}usage <command> for details", prefix)
}

fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::{categories, help_footer_note, sorted_commands};
    use wisp_utils::embed::page_footer_text;

    #[test]
    fn categories_are_sorted_and_unique() {
        assert_eq!(categories(), vec!["fun", "info", "utility"]);
    }

    #[test]
    fn commands_sort_by_category_then_name() {
        let names = sorted_commands(None)
            .iter()
            .map(|command| command.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["reversetext", "channel", "user", "help", "ping", "shards", "usage"]
        );
    }

    #[test]
    fn category_filter_keeps_only_matching_commands() {
        let names = sorted_commands(Some("info"))
            .iter()
            .map(|command| command.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["channel", "user"]);
        assert!(sorted_commands(Some("music")).is_empty());
    }

    #[test]
    fn footer_points_at_usage_with_configured_prefix() {
        let note = help_footer_note("?");
        assert_eq!(note, "?usage <command> for details");
        assert_eq!(
            page_footer_text(1, 2, Some(note.as_str())),
            Some("Page 1/2 • ?usage <command> for details".to_owned())
        );
        assert_eq!(page_footer_text(1, 1, Some(note.as_str())), Some(note.clone()));
    }
}
