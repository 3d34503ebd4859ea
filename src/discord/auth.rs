//! Helpers around Discord's authentication.
//!
//! Outbound REST calls carry the bot token in a `Bot` `Authorization` header.
//!
//! Inbound interaction requests are signed by Discord with the application's
//! Ed25519 key. The signature covers the timestamp header followed by the raw
//! body, and is hex encoded. Requests which fail verification must be answered
//! with a 401, and Discord periodically sends bad signatures to check that we
//! do.
//!
//! <https://discord.com/developers/docs/interactions/overview#setting-up-an-endpoint-validating-security-request-headers>

use axum::http::HeaderMap;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// A newtype wrapper around the bot token.
#[derive(Clone)]
pub struct BotToken(pub String);

/// Convert a bot token to a `Bot` `Authorization` header value.
///
/// ```
/// let token = BotToken("abc.def".into());
/// assert_eq!(to_auth_header_val(&token), "Bot abc.def");
/// ```
pub fn to_auth_header_val(t: &BotToken) -> String {
    format!("Bot {}", t.0)
}

/// The application's public key as shown in the developer portal.
#[derive(Clone)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse the hex encoding the developer portal hands out.
    pub fn from_hex(s: &str) -> Option<PublicKey> {
        let bytes: [u8; 32] = hex::decode(s.trim()).ok()?.try_into().ok()?;

        VerifyingKey::from_bytes(&bytes).ok().map(PublicKey)
    }
}

pub enum SignatureError {
    Missing,
    Invalid,
}

/// Check the signature headers of an interaction request against its body.
pub fn validate_request_signature(
    key: &PublicKey,
    body: &[u8],
    headers: &HeaderMap,
) -> Result<(), SignatureError> {
    let sig = header_str(headers, SIGNATURE_HEADER).ok_or(SignatureError::Missing)?;
    let timestamp = header_str(headers, TIMESTAMP_HEADER).ok_or(SignatureError::Missing)?;

    if is_valid_signature(key, timestamp, body, sig) {
        Ok(())
    } else {
        Err(SignatureError::Invalid)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Requests which fail this predicate should be considered unauthenticated.
pub fn is_valid_signature(key: &PublicKey, timestamp: &str, body: &[u8], sig: &str) -> bool {
    let Some(sig) = decode_signature(sig) else {
        return false;
    };

    let mut msg = Vec::with_capacity(timestamp.len() + body.len());
    msg.extend_from_slice(timestamp.as_bytes());
    msg.extend_from_slice(body);

    key.0.verify(&msg, &sig).is_ok()
}

fn decode_signature(sig: &str) -> Option<Signature> {
    let bytes: [u8; 64] = hex::decode(sig).ok()?.try_into().ok()?;

    Some(Signature::from_bytes(&bytes))
}
