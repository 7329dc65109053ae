//! Keyword matching and reply selection.
//!
//! A [`Responder`] holds an ordered list of [`KeywordGroup`]s. For each event it
//! picks the first group that listens in the event's context and whose trigger
//! words appear in the text, case-insensitively, anywhere in the text. Channel
//! joins skip matching and always get the join greeting.

use std::{ops::Deref, sync::Arc};

use crate::{
    base::{
        config::{Config, KeywordGroupConfig},
        replies,
    },
    prelude::*,
};

/// A bundle of trigger words, the contexts it listens in, and the replies it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordGroup {
    name: String,
    triggers: Vec<String>,
    contexts: Vec<Context>,
    replies: Vec<String>,
}

impl KeywordGroup {
    /// Builds a group, lowercasing the trigger words.
    ///
    /// Fails on an empty trigger word (it would match every message), on an empty
    /// trigger or reply list, and on the channel-join context, which never reaches
    /// keyword matching.
    pub fn new<T, R>(name: impl Into<String>, triggers: impl IntoIterator<Item = T>, contexts: impl IntoIterator<Item = Context>, replies: impl IntoIterator<Item = R>) -> Res<Self>
    where
        T: AsRef<str>,
        R: Into<String>,
    {
        let name = name.into();

        let triggers = triggers
            .into_iter()
            .map(|t| {
                let trigger = t.as_ref().trim().to_lowercase();
                if trigger.is_empty() {
                    Err(anyhow!("Keyword group `{name}` has an empty trigger word."))
                } else {
                    Ok(trigger)
                }
            })
            .collect::<Res<Vec<_>>>()?;

        if triggers.is_empty() {
            return Err(anyhow!("Keyword group `{name}` has no trigger words."));
        }

        let contexts = contexts.into_iter().collect::<Vec<_>>();

        if contexts.contains(&Context::ChannelJoin) {
            return Err(anyhow!("Keyword group `{name}` cannot listen to channel joins."));
        }

        let replies = replies.into_iter().map(Into::into).collect::<Vec<String>>();

        if replies.is_empty() {
            return Err(anyhow!("Keyword group `{name}` has no replies."));
        }

        Ok(Self { name, triggers, contexts, replies })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Whether the group is a candidate for events in `context`.
    pub fn listens_in(&self, context: Context) -> bool {
        self.contexts.contains(&context)
    }

    /// Whether any trigger word occurs in `lowercase_text`, which must already be lowercased.
    fn is_triggered_by(&self, lowercase_text: &str) -> bool {
        self.triggers.iter().any(|t| lowercase_text.contains(t.as_str()))
    }
}

impl TryFrom<&KeywordGroupConfig> for KeywordGroup {
    type Error = Err;

    fn try_from(value: &KeywordGroupConfig) -> Res<Self> {
        KeywordGroup::new(&value.name, &value.triggers, value.contexts.iter().copied(), value.replies.iter().cloned())
    }
}

/// Picks replies for inbound events.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Debug, Clone)]
pub struct Responder {
    inner: Arc<ResponderInner>,
}

#[derive(Debug)]
pub struct ResponderInner {
    groups: Vec<KeywordGroup>,
    join_greeting: String,
}

impl Deref for Responder {
    type Target = ResponderInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Responder {
    /// Creates a responder from groups in priority order.
    pub fn new(groups: Vec<KeywordGroup>, join_greeting: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ResponderInner {
                groups,
                join_greeting: join_greeting.into(),
            }),
        }
    }

    /// Creates a responder from the configured keyword groups and join greeting.
    #[instrument(skip_all)]
    pub fn from_config(config: &Config) -> Res<Self> {
        let groups = config.keyword_groups.iter().map(KeywordGroup::try_from).collect::<Res<Vec<_>>>()?;

        info!("Loaded {} keyword groups.", groups.len());

        Ok(Self::new(groups, config.join_greeting.clone()))
    }

    /// The default boba recommendations.
    pub fn boba() -> Res<Self> {
        let groups = replies::default_keyword_groups().iter().map(KeywordGroup::try_from).collect::<Res<Vec<_>>>()?;

        Ok(Self::new(groups, replies::JOIN_GREETING))
    }

    pub fn groups(&self) -> &[KeywordGroup] {
        &self.groups
    }

    /// Returns the replies for `event`, in order; empty when nothing matches.
    pub fn respond(&self, event: &MessageEvent) -> &[String] {
        if event.context == Context::ChannelJoin {
            return std::slice::from_ref(&self.join_greeting);
        }

        if event.text.trim().is_empty() {
            return &[];
        }

        let text = event.text.to_lowercase();

        match self.groups.iter().find(|g| g.listens_in(event.context) && g.is_triggered_by(&text)) {
            Some(group) => {
                debug!("Matched keyword group `{}`.", group.name);
                group.replies()
            }
            None => &[],
        }
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::replies::*;

    fn event(text: &str, context: Context) -> MessageEvent {
        MessageEvent::new(text, context, "T01", "C01", "U01")
    }

    #[test]
    fn greets_on_hello() {
        let responder = Responder::boba().unwrap();

        assert_eq!(responder.respond(&event("Hey there!", Context::DirectMessage)), [HELLO_REPLY]);
    }

    #[test]
    fn low_effort_replies_in_order() {
        let responder = Responder::boba().unwrap();

        assert_eq!(responder.respond(&event("I'm thirsty and in a hurry", Context::DirectMention)), [LOW_EFFORT_REPLY, MAP_LINK]);
    }

    #[test]
    fn unrelated_text_gets_nothing() {
        let responder = Responder::boba().unwrap();

        assert!(responder.respond(&event("unrelated weather chat", Context::DirectMessage)).is_empty());
    }

    #[test]
    fn channel_join_always_greets() {
        let responder = Responder::boba().unwrap();

        assert_eq!(responder.respond(&event("", Context::ChannelJoin)), [JOIN_GREETING]);
        assert_eq!(responder.respond(&event("hello, somber artsy people", Context::ChannelJoin)), [JOIN_GREETING]);
    }

    #[test]
    fn every_trigger_matches_in_any_case_anywhere() {
        let responder = Responder::boba().unwrap();

        for group in responder.groups() {
            for trigger in group.triggers() {
                let upper = trigger.to_uppercase();
                let mixed = trigger
                    .chars()
                    .enumerate()
                    .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c })
                    .collect::<String>();

                for text in [trigger.clone(), format!("xx{upper}yy"), format!("so... {mixed}!")] {
                    let replies = responder.respond(&event(&text, Context::DirectMessage));
                    let winner = responder.groups().iter().find(|g| g.triggers().iter().any(|t| text.to_lowercase().contains(t.as_str()))).unwrap();

                    assert_eq!(replies, winner.replies(), "text `{text}`");
                }
            }
        }
    }

    #[test]
    fn first_declared_group_wins() {
        let responder = Responder::boba().unwrap();

        // "hello" is a greeting trigger and "sad" a sad trigger; the greeting is declared first.
        assert_eq!(responder.respond(&event("sad hello", Context::DirectMessage)), [HELLO_REPLY]);
        // "best" (high quality) versus "quick" (low effort).
        assert_eq!(responder.respond(&event("the best, quick", Context::DirectMessage)), [LOW_EFFORT_REPLY, MAP_LINK]);
    }

    #[test]
    fn context_filters_candidates() {
        let responder = Responder::new(
            vec![
                KeywordGroup::new("dm_only", ["tea"], [Context::DirectMessage], ["dm"]).unwrap(),
                KeywordGroup::new("mention_only", ["tea"], [Context::DirectMention], ["mention"]).unwrap(),
            ],
            "hi",
        );

        assert_eq!(responder.respond(&event("TEA", Context::DirectMessage)), ["dm"]);
        assert_eq!(responder.respond(&event("tea", Context::DirectMention)), ["mention"]);
        assert!(responder.respond(&event("tea", Context::Ambient)).is_empty());
        assert!(responder.respond(&event("hello", Context::Mention)).is_empty());
    }

    #[test]
    fn blank_text_never_matches() {
        let responder = Responder::boba().unwrap();

        assert!(responder.respond(&event("", Context::DirectMessage)).is_empty());
        assert!(responder.respond(&event("  \n\t", Context::DirectMention)).is_empty());
    }

    #[test]
    fn triggers_are_lowercased() {
        let group = KeywordGroup::new("g", ["  Matcha "], [Context::DirectMessage], ["yes"]).unwrap();

        assert_eq!(group.triggers(), ["matcha"]);
        assert!(group.is_triggered_by("iced matcha latte"));
    }

    #[test]
    fn rejects_invalid_groups() {
        assert!(KeywordGroup::new("g", [" "], [Context::DirectMessage], ["r"]).is_err());
        assert!(KeywordGroup::new("g", Vec::<String>::new(), [Context::DirectMessage], ["r"]).is_err());
        assert!(KeywordGroup::new("g", ["a"], [Context::ChannelJoin], ["r"]).is_err());
        assert!(KeywordGroup::new("g", ["a"], [Context::DirectMessage], Vec::<String>::new()).is_err());
    }

    #[test]
    fn builds_from_config() {
        let config = Config {
            inner: Arc::new(crate::base::config::ConfigInner {
                join_greeting: "Boba time.".to_string(),
                keyword_groups: default_keyword_groups(),
                ..Default::default()
            }),
        };

        let responder = Responder::from_config(&config).unwrap();

        assert_eq!(responder.groups().len(), 5);
        assert_eq!(responder.groups()[0].name(), "greeting");
        assert_eq!(responder.respond(&event("x", Context::ChannelJoin)), ["Boba time."]);
    }
}
