//! Discord subrouter definition.
//!
//! The following subroute is supported:
//!
//! - POST: `/`

use super::{
    auth::{validate_request_signature, SignatureError},
    interaction::{Interaction, InteractionKind, InteractionResponse},
};
use crate::{anon::handler, router::Deps};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::warn;

/// Instantiate a new Discord subrouter.
pub fn discord_router() -> Router<Deps> {
    Router::new().route("/", post(interaction_handler))
}

/// Handler for the POST subroute `/`, Discord's interactions endpoint.
///
/// `X-Signature-Ed25519` and `X-Signature-Timestamp` headers must be present
/// and must verify against the application's public key.
///
/// Accepts an [Interaction] in `application/json` format.
async fn interaction_handler(
    State(deps): State<Deps>,
    headers: HeaderMap,
    // We can't parse this at all yet as we need to verify the signature.
    body_bytes: Bytes,
) -> Result<Json<InteractionResponse>, (StatusCode, String)> {
    let discord = deps
        .discord
        .as_ref()
        .ok_or_else(|| (StatusCode::PRECONDITION_FAILED, String::new()))?;

    validate_request_signature(&discord.public_key, &body_bytes, &headers).map_err(|e| {
        let msg = match e {
            SignatureError::Missing => "Missing Discord signature",
            SignatureError::Invalid => "Invalid Discord signature",
        };
        warn!("{}", msg);

        (StatusCode::UNAUTHORIZED, String::new())
    })?;

    let interaction = serde_json::from_slice::<Interaction>(&body_bytes).map_err(|e| {
        let msg = format!("Failed to deserialize interaction: {}", e);
        warn!("{}", msg);

        (StatusCode::UNPROCESSABLE_ENTITY, msg)
    })?;

    let res = match interaction.kind {
        InteractionKind::Ping => InteractionResponse::Pong,
        InteractionKind::ApplicationCommand => handler::respond(discord.api.clone(), interaction),
        InteractionKind::Other(kind) => {
            warn!(kind, "Received an unsupported interaction type");
            handler::generic_failure()
        }
    };

    Ok(Json(res))
}
