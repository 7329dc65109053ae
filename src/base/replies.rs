//! Canned reply text and the default keyword groups.

use crate::base::{config::KeywordGroupConfig, types::Context};

/// Posted when the bot is added to a channel.
pub const JOIN_GREETING: &str = "I'm here!";

/// Sent privately to whoever installed the app, in order.
pub const INSTALLATION_GREETING: [&str; 2] = ["I am a bot that has just joined your team", "You must now /invite me to a channel so that I can be of use!"];

/// Map of the recommended shops.
pub const MAP_LINK: &str = "Here is a map to make it easy: https://www.google.com/maps/d/edit?mid=1rLlDE8udLngyAqLoo7PzTIbgRMdR8c-3&ll=37.788078005146744%2C-122.40538593500003&z=16";

pub const HELLO_REPLY: &str = "Hello you! Craving for some sweet boba?";
pub const LOW_EFFORT_REPLY: &str = "Your best bets are ASHA and COCO!";
pub const HIGH_QUALITY_REPLY: &str = "We recommend Black Sugar. Look no further than the black sesame milk tea.";
pub const CREATIVE_REPLY: &str = "If you REALLY want something from the gram, then there is always Plentea.";
pub const SAD_REPLY: &str = "Oh, that kind of day... If you want to feel more sad, you could try Enough.";

fn group(name: &str, triggers: &[&str], replies: &[&str]) -> KeywordGroupConfig {
    KeywordGroupConfig {
        name: name.to_string(),
        triggers: triggers.iter().map(|t| t.to_string()).collect(),
        contexts: vec![Context::DirectMessage, Context::DirectMention],
        replies: replies.iter().map(|r| r.to_string()).collect(),
    }
}

/// The default keyword groups, in priority order.
pub fn default_keyword_groups() -> Vec<KeywordGroupConfig> {
    vec![
        group("greeting", &["hello", "hey"], &[HELLO_REPLY]),
        group("low_effort", &["low", "fast", "quick", "thirsty", "near", "close"], &[LOW_EFFORT_REPLY, MAP_LINK]),
        group("high_quality", &["high", "quality", "best", "amazing", "great", "incredible"], &[HIGH_QUALITY_REPLY, MAP_LINK]),
        group("creative", &["artsy", "creative", "instagram", "media"], &[CREATIVE_REPLY, MAP_LINK]),
        group("sad", &["sad", "bad", "gloomy", "somber"], &[SAD_REPLY, MAP_LINK]),
    ]
}
