use poise::serenity_prelude as serenity;

/// A rendered page as sent to Discord.
#[derive(Clone, Debug)]
pub enum PageContent {
    Text(String),
    Embed(Box<serenity::CreateEmbed>),
}

impl PageContent {
    pub fn reply(&self) -> poise::CreateReply {
        match self {
            PageContent::Text(text) => poise::CreateReply::default().content(text.clone()),
            PageContent::Embed(embed) => poise::CreateReply::default().embed((**embed).clone()),
        }
    }

    pub fn edit(&self) -> serenity::EditMessage {
        match self {
            PageContent::Text(text) => serenity::EditMessage::new()
                .content(text.clone())
                .embeds(vec![]),
            PageContent::Embed(embed) => serenity::EditMessage::new()
                .content("")
                .embed((**embed).clone()),
        }
    }
}

impl From<String> for PageContent {
    fn from(text: String) -> Self {
        PageContent::Text(text)
    }
}

impl From<&str> for PageContent {
    fn from(text: &str) -> Self {
        PageContent::Text(text.to_owned())
    }
}

impl From<serenity::CreateEmbed> for PageContent {
    fn from(embed: serenity::CreateEmbed) -> Self {
        PageContent::Embed(Box::new(embed))
    }
}
