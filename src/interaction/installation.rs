//! Greets the user who installed the bot.

use tracing::{Instrument, error, info, instrument, warn};

use crate::{base::replies::INSTALLATION_GREETING, base::types::Void, service::chat::ChatClient};

/// Handles a completed installation on a new task.
#[instrument(skip_all)]
pub fn handle_installation(team_id: String, installer: Option<String>, chat: ChatClient) {
    tokio::spawn(async move {
        let result = greet_installer(&team_id, installer.as_deref(), &chat).in_current_span().await;

        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Opens a private conversation with the installer and explains how to invite the bot.
///
/// Custom integrations have no way to know who installed them, so there is
/// nobody to greet.
#[instrument(skip(chat))]
pub async fn greet_installer(team_id: &str, installer: Option<&str>, chat: &ChatClient) -> Void {
    let Some(user_id) = installer else {
        warn!("No installer to greet.");
        return Ok(());
    };

    info!("Greeting installer ...");

    for line in INSTALLATION_GREETING {
        chat.send_direct_message(team_id, user_id, line).await?;
    }

    Ok(())
}
