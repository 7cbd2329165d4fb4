pub mod channel;
pub mod user;
