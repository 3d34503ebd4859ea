//! Type definitions and helpers for the Discord REST API.

use super::{
    auth::{to_auth_header_val, BotToken},
    channel::{Channel, ChannelId},
    error::DiscordError,
    interaction::ResponseHandle,
    message::OutboundMessage,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

/// The base URL of the Discord REST API.
pub const API_BASE: &str = "https://discord.com/api/v10";

/// Everything the anonymous relay needs from Discord once an interaction has
/// been acknowledged.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Look up the channel an interaction was invoked in.
    async fn get_channel(&self, channel: &ChannelId) -> Result<Channel, DiscordError>;

    /// Post a message in a channel as the bot.
    async fn post_message(
        &self,
        channel: &ChannelId,
        msg: &OutboundMessage,
    ) -> Result<(), DiscordError>;

    /// Replace the content of a deferred interaction response.
    async fn edit_original_response(
        &self,
        handle: &ResponseHandle,
        content: &str,
    ) -> Result<(), DiscordError>;
}

/// A reusable client that holds a connection pool internally, as per
/// [reqwest::Client].
pub struct DiscordClient {
    base: String,
    token: BotToken,
    http: reqwest::Client,
}

impl DiscordClient {
    pub fn new(base: String, token: BotToken) -> Self {
        DiscordClient {
            base,
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Create a GET request to any Discord API endpoint, handling
    /// authentication.
    pub fn get<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.request(Method::GET, path)
    }

    /// Create a POST request to any Discord API endpoint, handling
    /// authentication.
    pub fn post<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Create a PUT request to any Discord API endpoint, handling
    /// authentication.
    pub fn put<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path)
    }

    /// Create a PATCH request to any Discord API endpoint, handling
    /// authentication.
    pub fn patch<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.request(Method::PATCH, path)
    }

    fn request<T: ToString>(&self, method: Method, path: T) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.base.to_owned() + &path.to_string())
            .header(reqwest::header::AUTHORIZATION, to_auth_header_val(&self.token))
    }

    /// A plain, unauthenticated GET, for fetching files off Discord's CDN.
    pub fn fetch(&self, url: &url::Url) -> reqwest::RequestBuilder {
        self.http.get(url.as_str())
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn get_channel(&self, channel: &ChannelId) -> Result<Channel, DiscordError> {
        self.fetch_channel(channel).await
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        msg: &OutboundMessage,
    ) -> Result<(), DiscordError> {
        self.create_message(channel, msg).await
    }

    async fn edit_original_response(
        &self,
        handle: &ResponseHandle,
        content: &str,
    ) -> Result<(), DiscordError> {
        self.edit_original(handle, content).await
    }
}

/// Discord answers either with the requested resource or with a JSON error
/// object alongside a non-2xx status.
///
/// ```json
/// {
///     "id": "41771983423143937",
///     "type": 0
/// }
/// ```
///
/// ```json
/// {
///     "code": 50013,
///     "message": "Missing Permissions"
/// }
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
pub enum APIResult<T> {
    Ok(T),
    Err(ErrorResponse),
}

impl<T> APIResult<T> {
    pub fn into_result(self) -> Result<T, DiscordError> {
        match self {
            APIResult::Ok(x) => Ok(x),
            APIResult::Err(res) => Err(DiscordError::APIResponseError {
                code: res.code,
                message: res.message,
            }),
        }
    }
}

/// The universal response in case of an unsuccessful request.
///
/// <https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>
#[derive(Deserialize)]
pub struct ErrorResponse {
    /// Absent from rate limit responses.
    #[serde(default)]
    pub code: u32,
    pub message: String,
}
