use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The channel classification of an inbound event.
///
/// Keyword groups declare which contexts they listen in; the channel-join
/// context never reaches keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    /// A message sent to the bot in a private conversation.
    DirectMessage,
    /// A channel message that starts by mentioning the bot.
    DirectMention,
    /// A channel message that mentions the bot somewhere after the start.
    Mention,
    /// A channel message that does not mention the bot.
    Ambient,
    /// The bot itself joined a channel.
    ChannelJoin,
}

/// An inbound event, already classified by the chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// The text to match (leading bot mention already stripped).
    pub text: String,
    /// Where the event happened.
    pub context: Context,
    /// Workspace the event came from; used to pick the bot token for replies.
    pub team_id: String,
    /// Channel to reply into.
    pub channel_id: String,
    /// The user who sent the message (or joined).
    pub user_id: String,
}

impl MessageEvent {
    pub fn new(text: impl Into<String>, context: Context, team_id: impl Into<String>, channel_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context,
            team_id: team_id.into(),
            channel_id: channel_id.into(),
            user_id: user_id.into(),
        }
    }
}
