use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::{CommandMeta, GUILD_RATELIMITS};
use wisp_core::{Context, Error};
use wisp_utils::formatting::{
    discord_timestamp, escape_markdown, to_title_case, truncate_at_separator, yes_no,
};
use wisp_utils::pagination::{PageContent, PaginatorOptions, paginate_pages};

pub const META: CommandMeta = CommandMeta {
    name: "user",
    aliases: &["userinfo", "member", "memberinfo"],
    desc: "Get information about a user, defaults to self",
    category: "info",
    usage: "!user [id|mention|name]",
    examples: &["user", "user cake", "user <@439205512425504771>"],
    ratelimits: GUILD_RATELIMITS,
};

const ROLES_MAX_CHARS: usize = 800;

/// Who the command is about, decided once when the argument is resolved.
pub enum UserTarget {
    Member(Box<serenity::Member>),
    User(Box<serenity::User>),
}

impl UserTarget {
    pub fn user(&self) -> &serenity::User {
        match self {
            UserTarget::Member(member) => &member.user,
            UserTarget::User(user) => user,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
}

impl PresenceStatus {
    pub fn label(self) -> &'static str {
        match self {
            PresenceStatus::Online => "Online",
            PresenceStatus::Idle => "Idle",
            PresenceStatus::DoNotDisturb => "Do Not Disturb",
            PresenceStatus::Offline => "Offline",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            PresenceStatus::Online => 0x43_B5_81,
            PresenceStatus::Idle => 0xFA_A6_1A,
            PresenceStatus::DoNotDisturb => 0xF0_47_47,
            PresenceStatus::Offline => 0x74_7F_8D,
        }
    }
}

impl From<serenity::OnlineStatus> for PresenceStatus {
    fn from(status: serenity::OnlineStatus) -> Self {
        match status {
            serenity::OnlineStatus::Online => PresenceStatus::Online,
            serenity::OnlineStatus::Idle => PresenceStatus::Idle,
            serenity::OnlineStatus::DoNotDisturb => PresenceStatus::DoNotDisturb,
            _ => PresenceStatus::Offline,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Competing,
    Custom,
    Unknown,
}

impl ActivityKind {
    fn verb(self) -> &'static str {
        match self {
            ActivityKind::Playing => "Playing",
            ActivityKind::Streaming => "Streaming",
            ActivityKind::Listening => "Listening to",
            ActivityKind::Watching => "Watching",
            ActivityKind::Competing => "Competing in",
            ActivityKind::Custom | ActivityKind::Unknown => "",
        }
    }
}

impl From<serenity::ActivityType> for ActivityKind {
    fn from(kind: serenity::ActivityType) -> Self {
        match kind {
            serenity::ActivityType::Playing => ActivityKind::Playing,
            serenity::ActivityType::Streaming => ActivityKind::Streaming,
            serenity::ActivityType::Listening => ActivityKind::Listening,
            serenity::ActivityType::Watching => ActivityKind::Watching,
            serenity::ActivityType::Competing => ActivityKind::Competing,
            serenity::ActivityType::Custom => ActivityKind::Custom,
            _ => ActivityKind::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityProfile {
    pub kind: ActivityKind,
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    pub large_text: Option<String>,
    /// Voice channel advertised by a custom status, once confirmed in the cache.
    pub voice_channel: Option<serenity::ChannelId>,
}

impl ActivityProfile {
    fn from_activity(activity: &serenity::Activity) -> Self {
        Self {
            kind: activity.kind.into(),
            name: activity.name.clone(),
            details: activity.details.clone(),
            state: activity.state.clone(),
            large_text: activity
                .assets
                .as_ref()
                .and_then(|assets| assets.large_text.clone()),
            voice_channel: if activity.kind == serenity::ActivityType::Custom {
                activity.details.as_deref().and_then(voice_channel_hint)
            } else {
                None
            },
        }
    }

    fn is_spotify(&self) -> bool {
        self.kind == ActivityKind::Listening && self.name == "Spotify"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresenceProfile {
    pub status: PresenceStatus,
    /// Per-platform status, in desktop/mobile/web order.
    pub clients: Vec<(&'static str, PresenceStatus)>,
    pub activities: Vec<ActivityProfile>,
}

impl PresenceProfile {
    fn from_presence(presence: &serenity::Presence) -> Self {
        let clients = presence
            .client_status
            .as_ref()
            .map(|client_status| {
                [
                    ("desktop", client_status.desktop),
                    ("mobile", client_status.mobile),
                    ("web", client_status.web),
                ]
                .into_iter()
                .filter_map(|(platform, status)| status.map(|status| (platform, status.into())))
                .collect()
            })
            .unwrap_or_default();

        Self {
            status: presence.status.into(),
            clients,
            activities: presence
                .activities
                .iter()
                .map(ActivityProfile::from_activity)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberProfile {
    pub joined_at: Option<serenity::Timestamp>,
    pub premium_since: Option<serenity::Timestamp>,
    pub nick: Option<String>,
    pub is_owner: bool,
    /// Role mentions, lowest position first.
    pub roles: Vec<String>,
    pub voice_channel: Option<serenity::ChannelId>,
}

/// Everything the embed needs, captured before pagination starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub tag: String,
    pub id: serenity::UserId,
    pub bot: bool,
    pub avatar_url: String,
    pub created_at: serenity::Timestamp,
    pub member: Option<MemberProfile>,
    pub presence: Option<PresenceProfile>,
}

impl UserProfile {
    /// One page per activity, never fewer than one.
    pub fn page_count(&self) -> usize {
        self.presence
            .as_ref()
            .map_or(0, |presence| presence.activities.len())
            .max(1)
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Info",
    aliases("userinfo", "member", "memberinfo"),
    required_bot_permissions = "EMBED_LINKS"
)]
pub async fn user(
    ctx: Context<'_>,
    #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.unwrap_or_else(|| ctx.author().clone());
    let target = resolve_target(ctx, user).await;
    let profile = build_profile(ctx, &target);
    let page_count = profile.page_count();

    let options = PaginatorOptions::default()
        .author_id(ctx.author().id)
        .expire_after(ctx.data().pagination_timeout);

    paginate_pages(
        ctx,
        page_count,
        |page| Ok(PageContent::from(profile_embed(&profile, page))),
        options,
    )
    .await?;
    Ok(())
}

async fn resolve_target(ctx: Context<'_>, user: serenity::User) -> UserTarget {
    let Some(guild_id) = ctx.guild_id() else {
        return UserTarget::User(Box::new(user));
    };

    match guild_id.member(ctx.serenity_context(), user.id).await {
        Ok(member) => UserTarget::Member(Box::new(member)),
        Err(error) => {
            debug!(?error, user_id = %user.id, "target is not a member of this guild");
            UserTarget::User(Box::new(user))
        }
    }
}

fn build_profile(ctx: Context<'_>, target: &UserTarget) -> UserProfile {
    let user = target.user();
    let mut profile = UserProfile {
        tag: user.tag(),
        id: user.id,
        bot: user.bot,
        avatar_url: user.face(),
        created_at: user.id.created_at(),
        member: None,
        presence: None,
    };

    let Some(guild) = ctx.guild() else {
        return profile;
    };

    profile.presence = guild
        .presences
        .get(&user.id)
        .map(PresenceProfile::from_presence);

    if let Some(presence) = profile.presence.as_mut() {
        for activity in &mut presence.activities {
            activity.voice_channel = activity.voice_channel.filter(|channel_id| {
                guild.channels.get(channel_id).is_some_and(|channel| {
                    matches!(
                        channel.kind,
                        serenity::ChannelType::Voice | serenity::ChannelType::Stage
                    )
                })
            });
        }
    }

    if let UserTarget::Member(member) = target {
        let mut roles = member
            .roles
            .iter()
            .map(|role_id| {
                let position = guild.roles.get(role_id).map_or(0, |role| role.position);
                (position, *role_id)
            })
            .collect::<Vec<_>>();
        roles.sort_by_key(|(position, _)| *position);

        profile.member = Some(MemberProfile {
            joined_at: member.joined_at,
            premium_since: member.premium_since,
            nick: member.nick.clone(),
            is_owner: guild.owner_id == user.id,
            roles: roles
                .into_iter()
                .map(|(_, role_id)| format!("<@&{}>", role_id))
                .collect(),
            voice_channel: guild
                .voice_states
                .get(&user.id)
                .and_then(|state| state.channel_id),
        });
    }

    profile
}

pub fn profile_embed(profile: &UserProfile, page: usize) -> serenity::CreateEmbed {
    let color = profile
        .presence
        .as_ref()
        .map_or(PresenceStatus::Offline, |presence| presence.status)
        .color();

    let mut embed = serenity::CreateEmbed::new()
        .author(serenity::CreateEmbedAuthor::new(&profile.tag).icon_url(&profile.avatar_url))
        .color(color)
        .description(format!("<@{}>", profile.id))
        .thumbnail(&profile.avatar_url)
        .field("Information", information_field(profile), true)
        .field("Joined", joined_field(profile), true);

    if let Some(member) = &profile.member {
        embed = embed.field("Guild Specific", guild_field(member), false);
    }

    match &profile.presence {
        Some(presence) => {
            let (status, inline) = status_field(presence);
            embed = embed.field("Status", status, inline);
        }
        None => {
            embed = embed.field("Activity", PresenceStatus::Offline.label(), false);
        }
    }

    if let Some((name, value)) = activity_field(profile, page) {
        embed = embed.field(name, value, true);
    }

    embed
}

pub fn information_field(profile: &UserProfile) -> String {
    format!(
        "**Id**: `{}`\n**Bot**: {}",
        profile.id,
        yes_no(profile.bot)
    )
}

pub fn joined_field(profile: &UserProfile) -> String {
    let mut lines = vec![format!("**Discord**: {}", discord_timestamp(profile.created_at))];
    if let Some(joined_at) = profile.member.as_ref().and_then(|member| member.joined_at) {
        lines.push(format!("**Guild**: {}", discord_timestamp(joined_at)));
    }
    lines.join("\n")
}

pub fn guild_field(member: &MemberProfile) -> String {
    let mut lines = Vec::new();

    if let Some(premium_since) = member.premium_since {
        lines.push(format!("**Boosting Since**: {}", discord_timestamp(premium_since)));
    }
    if let Some(nick) = &member.nick {
        lines.push(format!("**Nickname**: {}", escape_markdown(nick)));
    }
    if member.is_owner {
        lines.push("**Owner**: Yes".to_owned());
    }

    lines.push(roles_line(&member.roles));

    if let Some(channel_id) = member.voice_channel {
        lines.push(format!("**Voice**: <#{}>", channel_id));
    }

    lines.join("\n")
}

pub fn roles_line(roles: &[String]) -> String {
    let line = format!("**Roles ({})**: {}", roles.len(), roles.join(", "));
    truncate_at_separator(&line, ROLES_MAX_CHARS, ',')
}

/// Status text and whether it fits an inline field.
pub fn status_field(presence: &PresenceProfile) -> (String, bool) {
    if presence.clients.is_empty() {
        return (presence.status.label().to_owned(), true);
    }

    let lines = presence
        .clients
        .iter()
        .map(|(platform, status)| format!("**{}**: {}", to_title_case(platform), status.label()))
        .collect::<Vec<_>>();
    (lines.join("\n"), false)
}

/// Field for the activity shown on 1-based `page`, if there is one.
pub fn activity_field(profile: &UserProfile, page: usize) -> Option<(String, String)> {
    let presence = profile.presence.as_ref()?;
    let activity = presence.activities.get(page.checked_sub(1)?)?;

    let total = presence.activities.len();
    let name = if total > 1 {
        format!("Activity ({} of {})", page, total)
    } else {
        "Activity".to_owned()
    };

    let mut lines = activity_lines(activity);
    if lines.is_empty() {
        lines.push("Unknown".to_owned());
    }

    Some((name, lines.join("\n")))
}

/// Channel id carried in the `c` parameter of a custom status' details,
/// which clients fill in as a query string.
pub fn voice_channel_hint(details: &str) -> Option<serenity::ChannelId> {
    details
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "c")
        .and_then(|(_, value)| value.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .map(serenity::ChannelId::new)
}

pub fn activity_lines(activity: &ActivityProfile) -> Vec<String> {
    if activity.kind == ActivityKind::Custom {
        let mut lines = vec![format!(
            "Custom Status: {}",
            escape_markdown(activity.state.as_deref().unwrap_or_default())
        )];
        if let Some(channel_id) = activity.voice_channel {
            lines.push(format!("In Voice: <#{}> ({})", channel_id, channel_id));
        }
        return lines;
    }

    let mut lines = Vec::new();
    let headline = [activity.kind.verb().to_owned(), escape_markdown(&activity.name)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !headline.is_empty() {
        lines.push(headline);
    }

    if activity.is_spotify() {
        if let Some(album) = &activity.large_text {
            lines.push(format!("**Album**: {}", escape_markdown(album)));
        }
        if let Some(song) = &activity.details {
            lines.push(format!("**Song**: {}", escape_markdown(song)));
        }
        if let Some(artists) = &activity.state {
            let artists = artists.split("; ").collect::<Vec<_>>().join(", ");
            lines.push(format!("**Artists**: {}", escape_markdown(&artists)));
        }
    } else {
        if let Some(details) = &activity.details {
            lines.push(format!("**Details**: {}", escape_markdown(details)));
        }
        if let Some(state) = &activity.state {
            lines.push(format!("**State**: {}", escape_markdown(state)));
        }
    }

    lines
}
