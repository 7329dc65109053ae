//! Library root for `boba-bot`.
//!
//! Boba-bot is a Slack bot that listens for keywords in direct messages and
//! mentions, and replies with bubble tea shop recommendations:
//! - Greets people who say hello
//! - Recommends a shop for the mood the message describes
//! - Announces itself when it joins a channel
//!
//! The bot integrates with Slack for chat and SurrealDB for storing
//! installations. The services sit behind traits so other implementations
//! can be swapped in.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod responder;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the boba-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with database, responder, and chat clients
/// - Starts listening for Slack events
pub async fn start(config: Config) -> Void {
    info!("Starting boba-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
