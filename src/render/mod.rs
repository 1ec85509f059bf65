//! Turning handler output into displayable message payloads.

mod embeds;
mod links;

pub use embeds::{Renderer, format_duration, results_embed};
pub use links::DownloadLinks;

/// Embed colours, kept from the bot's original palette.
pub mod colour {
    pub const SONG: u32 = 0x0ff0ff;
    pub const RESULTS: u32 = 0xff00ff;
    pub const NOTHING_PLAYING: u32 = 0xff4444;
    pub const HELP: u32 = 0xff000a;
}

/// What a handler wants shown in the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSpec {
    PlainText(String),
    Embed(Embed),
}

impl RenderSpec {
    /// Text content, if this is a plain-text message.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::PlainText(text) => Some(text),
            Self::Embed(_) => None,
        }
    }
}

impl From<Embed> for RenderSpec {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}

/// Platform-neutral rich message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub thumbnail: Option<String>,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>, colour: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            colour,
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}
