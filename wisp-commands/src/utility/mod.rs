pub mod embeds;
pub mod help;
pub mod ping;
pub mod shards;
pub mod usage;
