use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x58_65_F2;

/// Color for embeds describing a failure.
pub const ERROR_EMBED_COLOR: u32 = 0xED_42_45;

/// Build a standard paginated embed with a page counter and optional note in
/// the footer.
pub fn build_paginated_embed(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
    footer_note: Option<&str>,
) -> serenity::CreateEmbed {
    let builder = serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    match page_footer_text(page, total_pages, footer_note) {
        Some(footer_text) => builder.footer(serenity::CreateEmbedFooter::new(footer_text)),
        None => builder,
    }
}

/// Footer text for page `page` of `total_pages`; `None` for single pages
/// without a note.
pub fn page_footer_text(page: usize, total_pages: usize, footer_note: Option<&str>) -> Option<String> {
    let total_pages = total_pages.max(1);
    let page = page.clamp(1, total_pages);
    let note = footer_note.filter(|note| !note.is_empty());

    match (total_pages > 1, note) {
        (true, Some(note)) => Some(format!("Page {}/{} • {}", page, total_pages, note)),
        (true, None) => Some(format!("Page {}/{}", page, total_pages)),
        (false, Some(note)) => Some(note.to_owned()),
        (false, None) => None,
    }
}

/// Generic failure embed shown when a command errors out.
pub fn command_error_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Command Error")
        .description("Something went wrong while running this command.")
        .color(ERROR_EMBED_COLOR)
}
