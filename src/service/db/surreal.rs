//! SurrealDB implementation for boba-bot team storage.

use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::{
    Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tracing::{debug, info, instrument};

use crate::base::{
    config::{Config, StorageTarget},
    types::{Res, Void},
};

use super::{DbClient, GenericDbClient, Team};

const TEAM_TABLE: &str = "team";

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Connects to the storage selected by the configuration.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let client = SurrealDbClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }

    /// Creates a throwaway in-memory database.
    pub async fn surreal_memory() -> Res<Self> {
        let client = SurrealDbClient::connect("mem://", None).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// SurrealDB client.
#[derive(Clone)]
struct SurrealDbClient {
    db: Surreal<Any>,
}

impl SurrealDbClient {
    #[instrument(name = "SurrealDbClient::new", skip_all)]
    async fn new(config: &Config) -> Res<Self> {
        let endpoint = match config.storage() {
            StorageTarget::Uri(uri) => uri,
            StorageTarget::Directory(dir) => format!("surrealkv://{}", dir.display()),
        };

        let credentials = match (&config.storage_username, &config.storage_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        };

        Self::connect(&endpoint, credentials).await
    }

    async fn connect(endpoint: &str, credentials: Option<(&str, &str)>) -> Res<Self> {
        info!("Connecting to storage at `{}` ...", endpoint);

        let db = any::connect(endpoint).await?;

        if let Some((username, password)) = credentials {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns("boba").use_db("bot").await?;

        info!("Storage initialized successfully.");

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self, team), fields(team_id = %team.team_id))]
    async fn save_team(&self, team: &Team) -> Void {
        let _: Option<Team> = self.db.upsert((TEAM_TABLE, team.team_id.as_str())).content(team.clone()).await?;

        info!("Team saved.");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &str) -> Res<Option<Team>> {
        let team: Option<Team> = self.db.select((TEAM_TABLE, team_id)).await?;

        if team.is_none() {
            debug!("Team `{}` not found.", team_id);
        }

        Ok(team)
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_team_is_none() {
        let db = DbClient::surreal_memory().await.unwrap();

        assert_eq!(db.get_team("T404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn saving_again_replaces_the_installation() {
        let db = DbClient::surreal_memory().await.unwrap();

        db.save_team(&Team::new("T01", "xoxb-old", Some("U01".to_string()), None)).await.unwrap();
        db.save_team(&Team::new("T01", "xoxb-new", Some("U01".to_string()), Some("U99".to_string()))).await.unwrap();

        let team = db.get_team("T01").await.unwrap().unwrap();

        assert_eq!(team.bot_token, "xoxb-new");
        assert_eq!(team.installed_by.as_deref(), Some("U99"));
    }
}
