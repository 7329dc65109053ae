//! Sends a responder's replies back to the originating channel.

use tracing::{Instrument, debug, error, info, instrument};

use crate::{
    base::types::{MessageEvent, Void},
    responder::Responder,
    service::chat::ChatClient,
};

/// Handles a classified event on a new task.
#[instrument(skip_all)]
pub fn handle_event(event: MessageEvent, responder: Responder, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = process_event(&event, &responder, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Sends every reply for `event`, in order, stopping at the first failed send.
#[instrument(skip_all, fields(context = ?event.context, channel_id = %event.channel_id))]
pub async fn process_event(event: &MessageEvent, responder: &Responder, chat: &ChatClient) -> Void {
    let replies = responder.respond(event);

    if replies.is_empty() {
        debug!("No keyword group matched.");
        return Ok(());
    }

    info!("Sending {} replies ...", replies.len());

    for reply in replies {
        chat.send_message(&event.team_id, &event.channel_id, reply).await?;
    }

    Ok(())
}
