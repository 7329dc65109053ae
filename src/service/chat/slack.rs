//! Chat service integration for boba-bot.
//!
//! This module connects the bot to Slack in one of two ways:
//! - A custom integration, with a static bot token, over socket mode
//! - An app, installed through OAuth, receiving signed events over HTTP
//!
//! Either way, inbound events are classified and handed to the responder,
//! and replies go out with the bot token stored for the event's team.

use crate::{
    base::{
        config::{Config, StartupMode},
        types::{Context, MessageEvent, Res, Void},
    },
    interaction::{self, classify},
    responder::Responder,
    service::db::{DbClient, Team},
};
use async_trait::async_trait;
use axum::{Extension, body::Body, response::Response};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use std::{net::SocketAddr, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, db: DbClient, responder: Responder) -> Res<Self> {
        let client = SlackChatClient::new(config, db, responder).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack listeners.
#[derive(Clone)]
struct SlackUserState {
    db: DbClient,
    responder: Responder,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    config: Config,
    mode: StartupMode,
    client: Arc<FullClient>,
    db: DbClient,
    responder: Responder,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, db: DbClient, responder: Responder) -> Res<Self> {
        let mode = config.startup_mode()?;

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // A custom integration is a single team known up front, so record it now.

        if let StartupMode::CustomIntegration { bot_token, .. } = &mode {
            let token = SlackApiToken::new(SlackApiTokenValue(bot_token.clone()));
            let session = client.open_session(&token);
            let auth = session.auth_test().await?;

            info!("Slack bot user ID: {}", auth.user_id.0);

            db.save_team(&Team::new(auth.team_id.0, bot_token.clone(), Some(auth.user_id.0), None)).await?;
        }

        Ok(Self {
            config: config.clone(),
            mode,
            client,
            db,
            responder,
        })
    }

    /// Looks up the bot token stored for `team_id`.
    async fn bot_token(&self, team_id: &str) -> Res<SlackApiToken> {
        let team = self.db.get_team(team_id).await?.ok_or(anyhow::anyhow!("No installation found for team `{}`.", team_id))?;

        Ok(SlackApiToken::new(SlackApiTokenValue(team.bot_token)))
    }

    fn user_state(&self) -> SlackUserState {
        SlackUserState {
            db: self.db.clone(),
            responder: self.responder.clone(),
            chat: ChatClient::from(self.clone()),
        }
    }

    /// Listens over socket mode until Ctrl-C.
    async fn serve_socket_mode(&self, app_token: &str) -> Void {
        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(self.user_state()));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token to listen for events.
        let app_token = SlackApiToken::new(SlackApiTokenValue(app_token.to_string()));
        socket_mode_listener.listen_for(&app_token).await?;

        info!("** The socket mode listener just connected!");

        // Waits for Ctrl-C.
        socket_mode_listener.serve().await;

        info!("** The socket mode listener just closed");

        Ok(())
    }

    /// Serves the OAuth install flow and the Events API until Ctrl-C.
    async fn serve_app(&self, port: u16, client_id: &str, client_secret: &str, signing_secret: &str) -> Void {
        let user_state = self.user_state();

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(user_state.clone()));

        let oauth_listener_config = SlackOAuthListenerConfig::new(
            client_id.to_string().into(),
            client_secret.to_string().into(),
            self.config.slack_bot_scope.clone(),
            self.config.redirect_host(port),
        );

        let signing_secret: SlackSigningSecret = signing_secret.to_string().into();

        let listener = SlackEventsAxumListener::new(listener_environment.clone());

        let state = Arc::new(user_state);

        let app = axum::Router::new()
            .nest("/auth", listener.oauth_router("/auth", &oauth_listener_config, handle_installation_event))
            .route(
                "/push",
                axum::routing::post(move |Extension(event): Extension<SlackPushEvent>| handle_http_push_event(event, state.clone()))
                    .layer(listener.events_layer(&signing_secret).with_event_extractor(SlackEventsExtractors::push_event())),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let tcp_listener = tokio::net::TcpListener::bind(addr).await?;

        info!("** Listening for installs and events on {}", addr);

        axum::serve(tcp_listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        info!("** The events listener just closed");

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        match &self.mode {
            StartupMode::CustomIntegration { app_token, .. } => self.serve_socket_mode(app_token).await,
            StartupMode::App {
                port,
                client_id,
                client_secret,
                signing_secret,
            } => self.serve_app(*port, client_id, client_secret, signing_secret).await,
        }
    }

    #[instrument(skip(self))]
    async fn send_message(&self, team_id: &str, channel_id: &str, text: &str) -> Void {
        let token = self.bot_token(team_id).await?;

        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        let session = self.client.open_session(&token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_direct_message(&self, team_id: &str, user_id: &str, text: &str) -> Void {
        let token = self.bot_token(team_id).await?;

        let session = self.client.open_session(&token);

        let request = SlackApiConversationsOpenRequest::new().with_users(vec![SlackUserId(user_id.to_string())]);
        let conversation = session.conversations_open(&request).await.map_err(|e| anyhow::anyhow!("Failed to open conversation: {}", e))?;

        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(conversation.channel.id, message);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Listener callbacks for Slack.

async fn get_user_state(states: &SlackClientEventsUserState) -> Res<SlackUserState> {
    let states = states.read().await;
    states.get_user_state::<SlackUserState>().cloned().ok_or(anyhow::anyhow!("Failed to get user state"))
}

/// Handles push events from the socket mode listener.
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user_state = get_user_state(&states).await?;

    dispatch_push_event(event_callback, &user_state).await?;

    Ok(())
}

/// Handles push events from the HTTP listener.
async fn handle_http_push_event(event: SlackPushEvent, state: Arc<SlackUserState>) -> Response<Body> {
    match event {
        SlackPushEvent::UrlVerification(verification) => Response::new(Body::from(verification.challenge)),
        SlackPushEvent::EventCallback(event_callback) => {
            if let Err(err) = dispatch_push_event(event_callback, &state).await {
                error!("Error while handling: {}", err);
            }

            Response::new(Body::empty())
        }
        _ => Response::new(Body::empty()),
    }
}

/// Handles a completed OAuth install.
async fn handle_installation_event(response: SlackOAuthV2AccessTokenResponse, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) {
    let user_state = match get_user_state(&states).await {
        Ok(user_state) => user_state,
        Err(err) => {
            error!("Error while handling: {}", err);
            return;
        }
    };

    let team_id = response.team.id.0;
    let installer = response.authed_user.id.0;

    info!("Installed in team `{}` by `{}`.", team_id, installer);

    let team = Team::new(team_id.clone(), response.access_token.0, response.bot_user_id.map(|u| u.0), Some(installer.clone()));

    if let Err(err) = user_state.db.save_team(&team).await {
        error!("Failed to save team: {}", err);
        return;
    }

    interaction::installation::handle_installation(team_id, Some(installer), user_state.chat.clone());
}

/// Classifies a push event and hands it to the responder.
#[instrument(skip_all, fields(team_id = %event_callback.team_id.0))]
async fn dispatch_push_event(event_callback: SlackPushEventCallback, state: &SlackUserState) -> Void {
    let team_id = event_callback.team_id.0;

    let team = state.db.get_team(&team_id).await?.ok_or(anyhow::anyhow!("No installation found for team `{}`.", team_id))?;
    let bot_user_id = team.bot_user_id.as_deref();

    let event = match event_callback.event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            debug!("Received message event ...");
            message_event(&team_id, &slack_message_event, bot_user_id)
        }
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            debug!("Received app mention event ...");
            mention_event(&team_id, &slack_app_mention_event, bot_user_id)
        }
        SlackEventCallbackBody::MemberJoinedChannel(slack_member_joined_event) => {
            debug!("Received member joined event ...");
            join_event(&team_id, &slack_member_joined_event, bot_user_id)
        }
        _ => {
            warn!("Received unhandled push event.");
            None
        }
    };

    if let Some(event) = event {
        interaction::reply::handle_event(event, state.responder.clone(), state.chat.clone());
    }

    Ok(())
}

fn message_event(team_id: &str, event: &SlackMessageEvent, bot_user_id: Option<&str>) -> Option<MessageEvent> {
    // Edits, deletes, joins and bot posts all carry a subtype.
    if event.subtype.is_some() || event.sender.bot_id.is_some() {
        return None;
    }

    let user_id = event.sender.user.as_ref()?.0.as_str();

    if Some(user_id) == bot_user_id {
        return None;
    }

    let channel_id = event.origin.channel.as_ref()?.0.as_str();
    let channel_type = event.origin.channel_type.as_ref().map(|t| t.0.as_str());
    let text = event.content.as_ref().and_then(|c| c.text.as_deref()).unwrap_or_default();

    let (context, text) = classify::classify_message(channel_type, text, bot_user_id)?;

    Some(MessageEvent::new(text, context, team_id, channel_id, user_id))
}

fn mention_event(team_id: &str, event: &SlackAppMentionEvent, bot_user_id: Option<&str>) -> Option<MessageEvent> {
    let text = event.content.text.as_deref().unwrap_or_default();

    let (context, text) = classify::classify_mention(text, bot_user_id);

    Some(MessageEvent::new(text, context, team_id, event.channel.0.as_str(), event.user.0.as_str()))
}

fn join_event(team_id: &str, event: &SlackMemberJoinedChannelEvent, bot_user_id: Option<&str>) -> Option<MessageEvent> {
    // Only the bot's own arrival is greeted.
    if Some(event.user.0.as_str()) != bot_user_id {
        return None;
    }

    Some(MessageEvent::new("", Context::ChannelJoin, team_id, event.channel.0.as_str(), event.user.0.as_str()))
}
