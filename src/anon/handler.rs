//! Handles invocations of `/écrire`.
//!
//! The HTTP response to Discord is decided synchronously: either a final
//! ephemeral message (nothing to send, nowhere to send it) or a deferred
//! ephemeral placeholder. In the latter case a background task posts the
//! public message and then edits the placeholder to report what happened.

use super::{command::COMMAND_NAME, invocation::Invocation};
use crate::discord::{
    api::DiscordApi,
    channel::ChannelId,
    error::DiscordError,
    interaction::{Interaction, InteractionResponse, ResponseHandle},
    message::OutboundMessage,
};
use std::{fmt, sync::Arc};
use tracing::{error, info, warn};

pub const VALIDATION_WARNING: &str = "⚠️ Tu dois fournir un texte ou au moins une image.";
pub const SUCCESS: &str = "✅ Message envoyé anonymement.";
pub const DESTINATION_FAILURE: &str = "⚠️ Impossible d'envoyer le message dans ce salon.";
pub const DELIVERY_FAILURE: &str = "⚠️ Le message n'a pas pu être envoyé. Vérifie que le bot a la permission d'écrire ici et que ce salon accepte les messages.";
pub const GENERIC_FAILURE: &str = "⚠️ Une erreur est survenue, réessaie plus tard.";

/// What went wrong relaying an accepted invocation.
pub enum RelayError {
    /// The channel couldn't be looked up, or doesn't take messages.
    Destination(DiscordError),
    /// Discord refused the post, or we couldn't reach it.
    Delivery(DiscordError),
}

impl RelayError {
    /// Never the underlying error: that's for the logs only.
    pub fn user_message(&self) -> &'static str {
        match self {
            RelayError::Destination(_) => DESTINATION_FAILURE,
            RelayError::Delivery(_) => DELIVERY_FAILURE,
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Destination(e) => write!(f, "Unusable destination: {}", e),
            RelayError::Delivery(e) => write!(f, "Delivery failed: {}", e),
        }
    }
}

pub fn generic_failure() -> InteractionResponse {
    InteractionResponse::EphemeralMessage(GENERIC_FAILURE.to_owned())
}

/// Answer an application command interaction. Must be called from within a
/// Tokio runtime, as accepted invocations are delivered in a spawned task.
pub fn respond(api: Arc<dyn DiscordApi>, interaction: Interaction) -> InteractionResponse {
    match accept(&interaction) {
        Err(res) => res,
        Ok((channel, msg)) => {
            spawn_delivery(api, interaction.response_handle(), channel, msg);

            InteractionResponse::DeferredEphemeralMessage
        }
    }
}

/// Everything that can be decided without a round trip to Discord.
fn accept(interaction: &Interaction) -> Result<(ChannelId, OutboundMessage), InteractionResponse> {
    let data = match interaction.command_data() {
        Ok(Some(data)) if data.name == COMMAND_NAME => data,
        Ok(Some(data)) => {
            warn!(command = %data.name, "Received an unknown command");
            return Err(generic_failure());
        }
        Ok(None) => {
            warn!("Received a command interaction without data");
            return Err(generic_failure());
        }
        Err(e) => {
            warn!(error = %e, "Received malformed command data");
            return Err(generic_failure());
        }
    };

    let msg = Invocation::from_command(&data)
        .into_message()
        .ok_or_else(|| InteractionResponse::EphemeralMessage(VALIDATION_WARNING.to_owned()))?;

    let channel = interaction.channel_id.clone().ok_or_else(|| {
        warn!("Received a command interaction without a channel");
        InteractionResponse::EphemeralMessage(DESTINATION_FAILURE.to_owned())
    })?;

    Ok((channel, msg))
}

/// Run [deliver] in the background. Should it panic, the deferred response
/// still gets finalised.
fn spawn_delivery(
    api: Arc<dyn DiscordApi>,
    handle: ResponseHandle,
    channel: ChannelId,
    msg: OutboundMessage,
) {
    let task = tokio::spawn({
        let api = api.clone();
        let handle = handle.clone();

        async move { deliver(api.as_ref(), &handle, &channel, &msg).await }
    });

    tokio::spawn(async move {
        if let Err(e) = task.await {
            error!(error = %e, "Delivery task failed");
            finalise(api.as_ref(), &handle, GENERIC_FAILURE).await;
        }
    });
}

/// Post the message publicly, then finalise the deferred response with the
/// outcome. The public post is always attempted first.
pub async fn deliver(
    api: &dyn DiscordApi,
    handle: &ResponseHandle,
    channel: &ChannelId,
    msg: &OutboundMessage,
) {
    let content = match relay(api, channel, msg).await {
        Ok(()) => {
            info!(%channel, attachments = msg.attachments().len(), "Relayed anonymous message");
            SUCCESS
        }
        Err(e) => {
            warn!(%channel, error = %e, "Failed to relay anonymous message");
            e.user_message()
        }
    };

    finalise(api, handle, content).await;
}

async fn relay(
    api: &dyn DiscordApi,
    channel: &ChannelId,
    msg: &OutboundMessage,
) -> Result<(), RelayError> {
    let target = api
        .get_channel(channel)
        .await
        .map_err(RelayError::Destination)?;

    if !target.kind.accepts_messages() {
        return Err(RelayError::Destination(DiscordError::UnsendableChannel(
            target.id,
        )));
    }

    api.post_message(&target.id, msg)
        .await
        .map_err(RelayError::Delivery)
}

async fn finalise(api: &dyn DiscordApi, handle: &ResponseHandle, content: &str) {
    if let Err(e) = api.edit_original_response(handle, content).await {
        error!(error = %e, "Failed to finalise interaction response");
    }
}
