use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::base::types::{Res, Void};

pub mod surreal;

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the core functionality for storing and retrieving
/// installed teams. Implementing this trait allows different database
/// backends to be used with the boba-bot.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Saves a team, replacing any previous installation for the same team ID.
    async fn save_team(&self, team: &Team) -> Void;

    /// Gets a team by its ID, if the bot has been installed there.
    async fn get_team(&self, team_id: &str) -> Res<Option<Team>>;
}

/// Database client for boba-bot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}

// Structs.

/// A workspace the bot is installed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Slack team ID.
    pub team_id: String,
    /// Bot token used to act in the team.
    pub bot_token: String,
    /// The bot's own user ID in the team.
    pub bot_user_id: Option<String>,
    /// The user who installed the app, when known.
    pub installed_by: Option<String>,
    /// When the installation was recorded.
    pub installed_at: DateTime<Utc>,
}

impl Team {
    pub fn new(team_id: impl Into<String>, bot_token: impl Into<String>, bot_user_id: Option<String>, installed_by: Option<String>) -> Self {
        Self {
            team_id: team_id.into(),
            bot_token: bot_token.into(),
            bot_user_id,
            installed_by,
            installed_at: Utc::now(),
        }
    }
}
