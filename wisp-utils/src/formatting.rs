use poise::serenity_prelude as serenity;

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        let mut parts = vec![format!("{}h", hours)];
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if seconds > 0 {
            parts.push(format!("{}s", seconds));
        }
        return parts.join(" ");
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Escape Discord markdown and neutralize mass mentions.
pub fn escape_markdown(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '*' | '_' | '~' | '`' | '|' | '>') {
            out.push('\\');
        }
        out.push(ch);
    }

    out.replace("@everyone", "@\u{200B}everyone")
        .replace("@here", "@\u{200B}here")
}

/// Uppercase the first letter of each space/underscore separated word.
pub fn to_title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!(
                    "{}{}",
                    first.to_uppercase(),
                    chars.as_str().to_ascii_lowercase()
                ),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to at most `max_chars` at the last `separator` that leaves room
/// for a trailing `...`.
pub fn truncate_at_separator(text: &str, max_chars: usize, separator: char) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let budget = max_chars.saturating_sub(3);
    let cut = text
        .char_indices()
        .enumerate()
        .take_while(|(position, _)| *position <= budget)
        .filter(|(_, (_, ch))| *ch == separator)
        .map(|(_, (idx, _))| idx)
        .last()
        .unwrap_or_else(|| {
            text.char_indices()
                .nth(budget)
                .map_or(text.len(), |(idx, _)| idx)
        });

    format!("{}...", &text[..cut])
}

/// Discord timestamp markup rendered in the reader's locale.
pub fn discord_timestamp(timestamp: serenity::Timestamp) -> String {
    format!("<t:{}:f>", timestamp.unix_timestamp())
}

/// Yes/No label for embed fields.
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
