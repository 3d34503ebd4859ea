//! Post messages, made of text and/or re-uploaded attachments, to a Discord
//! channel.

use super::{
    api::{APIResult, DiscordClient},
    channel::ChannelId,
    error::DiscordError,
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

/// The name an attachment is uploaded under when the user's file had none.
pub const DEFAULT_ATTACHMENT_NAME: &str = "file.jpg";

/// A file to be re-posted, as found on Discord's CDN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRef {
    pub url: Url,
    pub name: String,
}

impl AttachmentRef {
    pub fn new(url: Url, name: Option<String>) -> Self {
        AttachmentRef {
            url,
            name: name
                .filter(|x| !x.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_NAME.to_owned()),
        }
    }
}

/// A message to post publicly on behalf of the bot. There's always something
/// in it: either text, attachments, or both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    content: Option<String>,
    attachments: Vec<AttachmentRef>,
}

impl OutboundMessage {
    /// Returns `None` if there'd be nothing to post. Empty text counts as no
    /// text.
    pub fn new(content: Option<String>, attachments: Vec<AttachmentRef>) -> Option<Self> {
        let content = content.filter(|x| !x.is_empty());

        if content.is_none() && attachments.is_empty() {
            None
        } else {
            Some(OutboundMessage {
                content,
                attachments,
            })
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn attachments(&self) -> &[AttachmentRef] {
        &self.attachments
    }
}

/// <https://discord.com/developers/docs/resources/message#create-message-jsonform-params>
#[derive(Serialize)]
struct MessageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentMeta<'a>>,
}

/// Ties a `files[n]` form part to its metadata.
#[derive(Serialize)]
struct AttachmentMeta<'a> {
    id: usize,
    filename: &'a str,
}

/// <https://discord.com/developers/docs/resources/message#message-object>
#[derive(Deserialize)]
pub(super) struct MessageResponse {
    #[allow(dead_code)]
    id: String,
}

impl DiscordClient {
    /// Post a message in a channel. Text-only messages are sent as JSON,
    /// anything with attachments as a multipart form.
    pub async fn create_message(
        &self,
        channel: &ChannelId,
        msg: &OutboundMessage,
    ) -> Result<(), DiscordError> {
        let req = self.post(format!("/channels/{}/messages", channel));
        let body = build_request(msg);

        let req = if msg.attachments.is_empty() {
            req.json(&body)
        } else {
            req.multipart(self.build_form(&body, msg).await?)
        };

        let res: APIResult<MessageResponse> = req.send().await?.json().await?;

        res.into_result().map(|_| ())
    }

    /// Interaction attachments are only lent to us, so they're downloaded and
    /// uploaded again for the new message to own.
    async fn build_form(
        &self,
        body: &MessageRequest<'_>,
        msg: &OutboundMessage,
    ) -> Result<Form, DiscordError> {
        let mut form = Form::new().text("payload_json", serde_json::to_string(body)?);

        for (i, attachment) in msg.attachments.iter().enumerate() {
            let bytes = self
                .fetch(&attachment.url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;

            let part = Part::bytes(bytes.to_vec()).file_name(attachment.name.clone());
            form = form.part(format!("files[{}]", i), part);
        }

        Ok(form)
    }
}

fn build_request(msg: &OutboundMessage) -> MessageRequest<'_> {
    MessageRequest {
        content: msg.content(),
        attachments: msg
            .attachments
            .iter()
            .enumerate()
            .map(|(id, x)| AttachmentMeta {
                id,
                filename: &x.name,
            })
            .collect(),
    }
}
