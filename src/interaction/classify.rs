//! Classifies raw chat messages into a [`Context`] and the text to match.

use crate::base::types::Context;

/// Slack's channel type for private conversations.
const IM_CHANNEL_TYPE: &str = "im";

/// Formats the mention token Slack uses for a user.
pub fn mention_token(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Classifies a plain message event.
///
/// Returns `None` when the message mentions the bot in a channel: Slack also
/// delivers those as an app mention, which is handled by [`classify_mention`].
pub fn classify_message(channel_type: Option<&str>, text: &str, bot_user_id: Option<&str>) -> Option<(Context, String)> {
    if channel_type == Some(IM_CHANNEL_TYPE) {
        let text = bot_user_id.and_then(|id| strip_leading_mention(text, id)).unwrap_or(text);
        return Some((Context::DirectMessage, text.to_string()));
    }

    if let Some(id) = bot_user_id
        && text.contains(&mention_token(id))
    {
        return None;
    }

    Some((Context::Ambient, text.to_string()))
}

/// Classifies an app mention: a direct mention when the text opens with the
/// bot's mention (which is stripped), otherwise a plain mention.
pub fn classify_mention(text: &str, bot_user_id: Option<&str>) -> (Context, String) {
    match bot_user_id.and_then(|id| strip_leading_mention(text, id)) {
        Some(rest) => (Context::DirectMention, rest.to_string()),
        None => (Context::Mention, text.to_string()),
    }
}

/// Strips `<@BOT>` and an optional `:` from the start of `text`.
fn strip_leading_mention<'a>(text: &'a str, bot_user_id: &str) -> Option<&'a str> {
    let rest = text.trim_start().strip_prefix(&mention_token(bot_user_id))?;
    let rest = rest.strip_prefix(':').unwrap_or(rest);

    Some(rest.trim_start())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "U0LOWBOT";

    #[test]
    fn im_is_a_direct_message() {
        assert_eq!(classify_message(Some("im"), "hey", Some(BOT)), Some((Context::DirectMessage, "hey".to_string())));
        assert_eq!(classify_message(Some("im"), "<@U0LOWBOT>: hey", Some(BOT)), Some((Context::DirectMessage, "hey".to_string())));
    }

    #[test]
    fn channel_message_without_mention_is_ambient() {
        assert_eq!(classify_message(Some("channel"), "boba?", Some(BOT)), Some((Context::Ambient, "boba?".to_string())));
        assert_eq!(classify_message(None, "boba?", None), Some((Context::Ambient, "boba?".to_string())));
    }

    #[test]
    fn channel_message_with_mention_is_left_to_the_mention_event() {
        assert_eq!(classify_message(Some("channel"), "hi <@U0LOWBOT>", Some(BOT)), None);
    }

    #[test]
    fn leading_mention_is_direct_and_stripped() {
        // The bot id contains "low", which must not reach keyword matching.
        assert_eq!(classify_mention("<@U0LOWBOT>: I'm sad", Some(BOT)), (Context::DirectMention, "I'm sad".to_string()));
        assert_eq!(classify_mention("  <@U0LOWBOT> hey", Some(BOT)), (Context::DirectMention, "hey".to_string()));
    }

    #[test]
    fn trailing_mention_is_a_plain_mention() {
        assert_eq!(classify_mention("hey <@U0LOWBOT>", Some(BOT)), (Context::Mention, "hey <@U0LOWBOT>".to_string()));
        assert_eq!(classify_mention("<@U0LOWBOT> hey", None), (Context::Mention, "<@U0LOWBOT> hey".to_string()));
    }
}
