use poise::serenity_prelude as serenity;

use crate::{CommandMeta, GUILD_RATELIMITS};
use wisp_core::{Context, Error};
use wisp_utils::embed::DEFAULT_EMBED_COLOR;
use wisp_utils::formatting::{discord_timestamp, escape_markdown, yes_no};

pub const META: CommandMeta = CommandMeta {
    name: "channel",
    aliases: &["channelinfo"],
    desc: "Get information for a channel, defaults to the current channel",
    category: "info",
    usage: "!channel [id|mention|name]",
    examples: &["channel", "channel 585639594574217232"],
    ratelimits: GUILD_RATELIMITS,
};

const DISCORD_URL: &str = "https://discord.com";

/// Child channel tally for a category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChildCounts {
    pub total: usize,
    pub news: usize,
    pub text: usize,
    pub voice: usize,
}

impl ChildCounts {
    pub fn tally(kinds: impl IntoIterator<Item = serenity::ChannelType>) -> Self {
        let mut counts = Self::default();
        for kind in kinds {
            counts.total += 1;
            match kind {
                serenity::ChannelType::News => counts.news += 1,
                serenity::ChannelType::Text => counts.text += 1,
                serenity::ChannelType::Voice | serenity::ChannelType::Stage => counts.voice += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Channel fields the embed needs, detached from the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelProfile {
    pub id: serenity::ChannelId,
    pub label: String,
    pub guild_id: Option<serenity::GuildId>,
    pub kind: serenity::ChannelType,
    pub topic: Option<String>,
    pub parent_id: Option<serenity::ChannelId>,
    pub position: Option<u16>,
    pub nsfw: bool,
    pub rate_limit_per_user: Option<u32>,
    pub bitrate: Option<u32>,
    pub user_limit: Option<u32>,
    pub last_message_id: Option<serenity::MessageId>,
    pub last_pin_timestamp: Option<serenity::Timestamp>,
    pub recipients: Vec<serenity::UserId>,
    pub overwrites: usize,
    pub children: Option<ChildCounts>,
}

impl ChannelProfile {
    fn from_guild_channel(channel: &serenity::GuildChannel, children: Option<ChildCounts>) -> Self {
        Self {
            id: channel.id,
            label: format!("#{}", channel.name),
            guild_id: Some(channel.guild_id),
            kind: channel.kind,
            topic: channel.topic.clone().filter(|topic| !topic.is_empty()),
            parent_id: channel.parent_id,
            position: Some(channel.position),
            nsfw: channel.nsfw,
            rate_limit_per_user: channel.rate_limit_per_user.map(u32::from),
            bitrate: channel.bitrate.map(u32::from),
            user_limit: channel.user_limit.map(u32::from),
            last_message_id: channel.last_message_id,
            last_pin_timestamp: channel.last_pin_timestamp,
            recipients: Vec::new(),
            overwrites: channel.permission_overwrites.len(),
            children,
        }
    }

    fn from_private_channel(channel: &serenity::PrivateChannel) -> Self {
        Self {
            id: channel.id,
            label: channel.recipient.tag(),
            guild_id: None,
            kind: channel.kind,
            topic: None,
            parent_id: None,
            position: None,
            nsfw: false,
            rate_limit_per_user: None,
            bitrate: None,
            user_limit: None,
            last_message_id: channel.last_message_id,
            last_pin_timestamp: channel.last_pin_timestamp,
            recipients: vec![channel.recipient.id],
            overwrites: 0,
            children: None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self.kind,
            serenity::ChannelType::Text
                | serenity::ChannelType::News
                | serenity::ChannelType::Private
                | serenity::ChannelType::NewsThread
                | serenity::ChannelType::PublicThread
                | serenity::ChannelType::PrivateThread
        )
    }

    pub fn is_voice(&self) -> bool {
        matches!(
            self.kind,
            serenity::ChannelType::Voice | serenity::ChannelType::Stage
        )
    }

    fn jump_url(&self) -> String {
        match self.guild_id {
            Some(guild_id) => format!("{}/channels/{}/{}", DISCORD_URL, guild_id, self.id),
            None => format!("{}/channels/@me/{}", DISCORD_URL, self.id),
        }
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Info",
    aliases("channelinfo"),
    required_bot_permissions = "EMBED_LINKS"
)]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Channel to look up (defaults to this one)"] channel: Option<serenity::Channel>,
) -> Result<(), Error> {
    let channel = match channel {
        Some(channel) => channel,
        None => ctx.channel_id().to_channel(ctx.serenity_context()).await?,
    };

    let profile = build_profile(ctx, channel)
        .ok_or_else(|| anyhow::anyhow!("Unable to read that channel."))?;

    ctx.send(poise::CreateReply::default().embed(channel_embed(&profile)))
        .await?;
    Ok(())
}

fn build_profile(ctx: Context<'_>, channel: serenity::Channel) -> Option<ChannelProfile> {
    if let Some(private) = channel.clone().private() {
        return Some(ChannelProfile::from_private_channel(&private));
    }

    let channel = channel.guild()?;
    let children = if channel.kind == serenity::ChannelType::Category {
        ctx.cache().guild(channel.guild_id).map(|guild| {
            ChildCounts::tally(
                guild
                    .channels
                    .values()
                    .filter(|child| child.parent_id == Some(channel.id))
                    .map(|child| child.kind),
            )
        })
    } else {
        None
    };

    Some(ChannelProfile::from_guild_channel(&channel, children))
}

pub fn channel_embed(profile: &ChannelProfile) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .author(serenity::CreateEmbedAuthor::new(&profile.label).url(profile.jump_url()))
        .color(DEFAULT_EMBED_COLOR)
        .field("Information", information_field(profile), true);

    if let Some(topic) = &profile.topic {
        embed = embed.description(escape_markdown(topic));
    }

    if profile.is_text() {
        let text = text_field(profile);
        if !text.is_empty() {
            embed = embed.field("Text Information", text, true);
        }
    } else if profile.is_voice() {
        embed = embed.field("Voice Information", voice_field(profile), true);
    }

    if !profile.recipients.is_empty() {
        embed = embed.field("DM Information", dm_field(profile), false);
    }

    if profile.guild_id.is_some() {
        embed = embed.field("Counts", counts_field(profile), true);
    }

    embed.field("Urls", urls_field(profile), false)
}

pub fn information_field(profile: &ChannelProfile) -> String {
    let mut lines = vec![format!(
        "**Created**: {}",
        discord_timestamp(profile.id.created_at())
    )];
    if let Some(guild_id) = profile.guild_id {
        lines.push(format!("**Guild**: `{}`", guild_id));
    }
    lines.push(format!("**Id**: `{}`", profile.id));
    if let Some(parent_id) = profile.parent_id {
        lines.push(format!("**Parent**: <#{}>", parent_id));
    }
    if let Some(position) = profile.position {
        lines.push(format!("**Position**: {}", position));
    }
    lines.push(format!("**Type**: {}", channel_type_label(profile.kind)));
    lines.join("\n")
}

pub fn text_field(profile: &ChannelProfile) -> String {
    let mut lines = Vec::new();
    if let Some(message_id) = profile.last_message_id {
        lines.push(format!(
            "**Last Message**: {}",
            discord_timestamp(message_id.created_at())
        ));
    }
    if let Some(pinned_at) = profile.last_pin_timestamp {
        lines.push(format!("**Last Pin**: {}", discord_timestamp(pinned_at)));
    }
    if profile.guild_id.is_some() {
        lines.push(format!("**NSFW**: {}", yes_no(profile.nsfw)));
        match profile.rate_limit_per_user.filter(|seconds| *seconds > 0) {
            Some(seconds) => lines.push(format!("**Ratelimit**: {} seconds", seconds)),
            None => lines.push("**Ratelimit**: Disabled".to_owned()),
        }
    }
    lines.join("\n")
}

pub fn voice_field(profile: &ChannelProfile) -> String {
    let bitrate = profile.bitrate.unwrap_or_default() / 1_000;
    let user_limit = match profile.user_limit.filter(|limit| *limit > 0) {
        Some(limit) => limit.to_string(),
        None => "Unlimited".to_owned(),
    };
    format!("**Bitrate**: {} kbps\n**User Limit**: {}", bitrate, user_limit)
}

pub fn dm_field(profile: &ChannelProfile) -> String {
    let recipients = profile
        .recipients
        .iter()
        .map(|user_id| format!("<@{}>", user_id))
        .collect::<Vec<_>>();
    format!(
        "**Recipients ({})**: {}",
        recipients.len(),
        recipients.join(", ")
    )
}

pub fn counts_field(profile: &ChannelProfile) -> String {
    let mut lines = Vec::new();
    if let Some(children) = profile.children {
        lines.push(format!("Children: {}", children.total));
        for (label, count) in [
            ("News", children.news),
            ("Text", children.text),
            ("Voice", children.voice),
        ] {
            if count > 0 {
                lines.push(format!(" -[{}]: {}", label, count));
            }
        }
    }
    lines.push(format!("Overwrites: {}", profile.overwrites));
    format!("```css\n{}\n```", lines.join("\n"))
}

pub fn urls_field(profile: &ChannelProfile) -> String {
    let mut links = vec![format!("[**Channel**]({})", profile.jump_url())];
    if let Some(guild_id) = profile.guild_id {
        links.push(format!("[**Guild**]({}/channels/{})", DISCORD_URL, guild_id));
    }
    if let Some(message_id) = profile.last_message_id {
        links.push(format!(
            "[**Last Message**]({}/{})",
            profile.jump_url(),
            message_id
        ));
    }
    links.join(", ")
}

pub fn channel_type_label(kind: serenity::ChannelType) -> &'static str {
    match kind {
        serenity::ChannelType::Text => "Text",
        serenity::ChannelType::Private => "Direct Message",
        serenity::ChannelType::Voice => "Voice",
        serenity::ChannelType::GroupDm => "Group Direct Message",
        serenity::ChannelType::Category => "Category",
        serenity::ChannelType::News => "News",
        serenity::ChannelType::NewsThread => "News Thread",
        serenity::ChannelType::PublicThread => "Public Thread",
        serenity::ChannelType::PrivateThread => "Private Thread",
        serenity::ChannelType::Stage => "Stage",
        serenity::ChannelType::Directory => "Directory",
        serenity::ChannelType::Forum => "Forum",
        _ => "Unknown",
    }
}
