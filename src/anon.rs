//! The `/écrire` command: repost a user's text and images in the current
//! channel under the bot's name.
//!
//! Every reply to the invoking user is ephemeral. Accepted invocations are
//! deferred straight away and finalised once the public post has been
//! attempted, so the user is only told "sent" when it really was.

pub mod command;
pub mod handler;
pub mod invocation;
