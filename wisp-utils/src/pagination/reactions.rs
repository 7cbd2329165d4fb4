//! Reaction-driven pagination over a poise command context.

use ::serenity::futures::StreamExt;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tokio::sync::mpsc;
use tracing::debug;

use super::content::PageContent;
use super::controller::{Paginator, PaginatorOptions};
use super::error::PaginationError;
use super::transport::{Direction, NavigationEvent, PageTransport, Subscription};

/// Events buffered between the gateway collector and the controller.
const EVENT_BUFFER: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionMessage {
    pub channel_id: serenity::ChannelId,
    pub message_id: serenity::MessageId,
}

pub struct ReactionTransport<'a, U, E> {
    ctx: poise::Context<'a, U, E>,
}

impl<'a, U, E> ReactionTransport<'a, U, E> {
    pub fn new(ctx: poise::Context<'a, U, E>) -> Self {
        Self { ctx }
    }
}

fn control_reaction(direction: Direction) -> serenity::ReactionType {
    serenity::ReactionType::Unicode(direction.emoji().to_owned())
}

fn reaction_direction(emoji: &serenity::ReactionType) -> Option<Direction> {
    match emoji {
        serenity::ReactionType::Unicode(raw) => Direction::from_emoji(raw),
        _ => None,
    }
}

#[async_trait]
impl<'a, U, E> PageTransport for ReactionTransport<'a, U, E>
where
    U: Send + Sync,
    E: Send + Sync,
{
    type Content = PageContent;
    type Handle = ReactionMessage;

    async fn send(&self, content: &PageContent) -> anyhow::Result<ReactionMessage> {
        let reply = self.ctx.send(content.reply()).await?;
        let message = reply.message().await?;

        Ok(ReactionMessage {
            channel_id: message.channel_id,
            message_id: message.id,
        })
    }

    async fn edit(&self, handle: &ReactionMessage, content: &PageContent) -> anyhow::Result<()> {
        handle
            .channel_id
            .edit_message(self.ctx.http(), handle.message_id, content.edit())
            .await?;
        Ok(())
    }

    async fn notify_failure(&self, handle: &ReactionMessage, notice: &str) -> anyhow::Result<()> {
        handle
            .channel_id
            .edit_message(
                self.ctx.http(),
                handle.message_id,
                serenity::EditMessage::new().content(notice).embeds(vec![]),
            )
            .await?;
        Ok(())
    }

    async fn subscribe(&self, handle: &ReactionMessage) -> anyhow::Result<Subscription> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let bot_id = self.ctx.framework().bot_id;
        let http = self.ctx.serenity_context().http.clone();
        let mut reactions = Box::pin(
            serenity::ReactionCollector::new(self.ctx.serenity_context())
                .message_id(handle.message_id)
                .stream(),
        );

        let forwarder = tokio::spawn(async move {
            while let Some(reaction) = reactions.next().await {
                let Some(actor_id) = reaction.user_id else {
                    continue;
                };
                if actor_id == bot_id {
                    continue;
                }
                let Some(direction) = reaction_direction(&reaction.emoji) else {
                    continue;
                };

                if let Err(error) = reaction.delete(&*http).await {
                    debug!(?error, "could not remove navigation reaction");
                }

                if tx.send(NavigationEvent::new(direction, actor_id)).await.is_err() {
                    break;
                }
            }
        });

        Ok(Subscription::with_forwarder(rx, forwarder))
    }

    async fn add_controls(
        &self,
        handle: &ReactionMessage,
        directions: &[Direction],
    ) -> anyhow::Result<()> {
        for direction in directions {
            handle
                .channel_id
                .create_reaction(self.ctx.http(), handle.message_id, control_reaction(*direction))
                .await?;
        }
        Ok(())
    }

    async fn clear_controls(&self, handle: &ReactionMessage) -> anyhow::Result<()> {
        if let Err(error) = handle
            .channel_id
            .delete_reactions(self.ctx.http(), handle.message_id)
            .await
        {
            // Missing MANAGE_MESSAGES; fall back to our own reactions.
            debug!(?error, "could not clear all reactions");
            for direction in Direction::CONTROLS {
                handle
                    .channel_id
                    .delete_reaction(
                        self.ctx.http(),
                        handle.message_id,
                        None,
                        control_reaction(direction),
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

/// Send `page_count` pages rendered by `render` and let the invoking user
/// page through them with reactions until the session idles out.
pub async fn paginate_pages<U, E, R>(
    ctx: poise::Context<'_, U, E>,
    page_count: usize,
    render: R,
    options: PaginatorOptions,
) -> Result<(), PaginationError>
where
    U: Send + Sync,
    E: Send + Sync,
    R: Fn(usize) -> anyhow::Result<PageContent> + Send + Sync,
{
    let mut paginator = Paginator::new(ReactionTransport::new(ctx), page_count, render, options)?;
    paginator.paginate().await
}
