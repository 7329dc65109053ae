//! Event handling and user interactions for boba-bot.
//!
//! This module provides functionality for handling chat events:
//! - Classifying incoming messages and @-mentions
//! - Replying with the matching keyword group
//! - Greeting whoever installed the bot

pub mod classify;
pub mod installation;
pub mod reply;
