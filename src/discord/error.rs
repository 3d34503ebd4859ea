use crate::discord::channel::ChannelId;
use std::fmt;

/// Sum type representing every possible unexceptional fail state.
pub enum DiscordError {
    APIRequestFailed(reqwest::Error),
    APIRequestEncoding(serde_json::Error),
    APIResponseError { code: u32, message: String },
    UnsendableChannel(ChannelId),
}

impl From<reqwest::Error> for DiscordError {
    fn from(e: reqwest::Error) -> Self {
        DiscordError::APIRequestFailed(e)
    }
}

impl From<serde_json::Error> for DiscordError {
    fn from(e: serde_json::Error) -> Self {
        DiscordError::APIRequestEncoding(e)
    }
}

impl fmt::Display for DiscordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            DiscordError::APIRequestFailed(e) => format!("Discord API request failed: {:?}", e),
            DiscordError::APIRequestEncoding(e) => {
                format!("Discord API request could not be encoded: {}", e)
            }
            DiscordError::APIResponseError { code, message } => {
                format!("Discord API returned error {}: {}", code, message)
            }
            DiscordError::UnsendableChannel(c) => {
                format!("Discord channel cannot receive messages: {}", c)
            }
        };

        write!(f, "{}", x)
    }
}

impl fmt::Debug for DiscordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
