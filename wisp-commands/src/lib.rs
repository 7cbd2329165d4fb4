pub mod checks;
pub mod fun;
pub mod info;
pub mod utility;

use wisp_core::{Data, Error, RateLimit};

pub use checks::ratelimit_check;

pub struct CommandMeta {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    pub examples: &'static [&'static str],
    pub ratelimits: &'static [RateLimit],
}

impl CommandMeta {
    /// Whether `name` is this command's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Rate limits shared by the information commands.
pub const GUILD_RATELIMITS: &[RateLimit] = &[RateLimit::per_guild(5, 5_000)];

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::shards::META,
    info::user::META,
    info::channel::META,
    fun::reversetext::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        utility::shards::shards(),
        info::user::user(),
        info::channel::channel(),
        fun::reversetext::reversetext(),
    ]
}

/// Look up registry metadata by command name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandMeta> {
    let lookup = name.trim().to_ascii_lowercase();
    COMMANDS.iter().find(|command| command.answers_to(&lookup))
}
