//! Talks to Discord: verifies inbound interaction requests and makes the
//! handful of REST calls the bot needs.
//!
//! Interactions arrive over Discord's HTTP interactions endpoint rather than a
//! gateway connection, so the whole bot is one HTTP server.
//!
//! See [api::DiscordApi].

pub mod api;
pub mod auth;
pub mod channel;
pub mod error;
pub mod interaction;
pub mod message;
pub mod registry;
pub mod router;

#[cfg(test)]
pub mod fake;
