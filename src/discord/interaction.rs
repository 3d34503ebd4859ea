//! Inbound interaction payloads, and the responses we give to them.
//!
//! <https://discord.com/developers/docs/interactions/receiving-and-responding>

use super::{
    api::{APIResult, DiscordClient},
    channel::ChannelId,
    error::DiscordError,
    message::MessageResponse,
};
use serde::ser::SerializeStruct;
use serde::{ser, Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::collections::HashMap;
use url::Url;

/// Marks a response as visible only to the invoking user.
pub const EPHEMERAL: u64 = 1 << 6;

/// <https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-interaction-type>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(x: u8) -> Self {
        match x {
            1 => InteractionKind::Ping,
            2 => InteractionKind::ApplicationCommand,
            x => InteractionKind::Other(x),
        }
    }
}

/// The subset of the interaction object we rely upon.
///
/// <https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object>
#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub token: String,
    pub channel_id: Option<ChannelId>,
    /// Kept raw, as its shape depends upon the kind of interaction.
    pub data: Option<serde_json::Value>,
}

impl Interaction {
    /// What's needed to finalise a deferred response later on.
    pub fn response_handle(&self) -> ResponseHandle {
        ResponseHandle {
            application_id: self.application_id.clone(),
            token: self.token.clone(),
        }
    }

    /// Decode the payload of an application command. Only meaningful when
    /// `kind` is [InteractionKind::ApplicationCommand].
    pub fn command_data(&self) -> Result<Option<CommandData>, serde_json::Error> {
        self.data.as_ref().map(CommandData::deserialize).transpose()
    }
}

/// <https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-application-command-data-structure>
#[derive(Debug, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub resolved: Resolved,
}

/// A single option value as supplied by the user. Attachment options carry
/// the attachment's ID, to be looked up in [Resolved].
#[derive(Debug, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub attachments: HashMap<String, Attachment>,
}

/// <https://discord.com/developers/docs/resources/message#attachment-object>
#[serde_as]
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    pub url: Url,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub filename: Option<String>,
}

/// The outcome of looking up an attachment option. An ID missing from
/// [Resolved] is kept distinct from an option the user left out.
#[derive(Debug, PartialEq, Eq)]
pub enum OptionLookup<T> {
    Absent,
    Unresolved(String),
    Found(T),
}

impl CommandData {
    fn option_value(&self, name: &str) -> Option<&serde_json::Value> {
        self.options
            .iter()
            .find(|x| x.name == name)
            .and_then(|x| x.value.as_ref())
    }

    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.option_value(name).and_then(|x| x.as_str())
    }

    pub fn attachment_option(&self, name: &str) -> OptionLookup<&Attachment> {
        match self.option_value(name).and_then(|x| x.as_str()) {
            None => OptionLookup::Absent,
            Some(id) => match self.resolved.attachments.get(id) {
                Some(x) => OptionLookup::Found(x),
                None => OptionLookup::Unresolved(id.to_owned()),
            },
        }
    }
}

/// Our limited subset of interaction responses. Every message we send back is
/// ephemeral, so that the invoking user remains anonymous.
///
/// <https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-response-object>
#[derive(Debug, PartialEq, Eq)]
pub enum InteractionResponse {
    Pong,
    EphemeralMessage(String),
    /// Shows a "thinking" state to the user until the response is edited.
    DeferredEphemeralMessage,
}

#[derive(Serialize)]
struct RawResponseData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    flags: u64,
}

impl ser::Serialize for InteractionResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let len = match self {
            InteractionResponse::Pong => 1,
            _ => 2,
        };
        let mut state = serializer.serialize_struct("InteractionResponse", len)?;

        match self {
            InteractionResponse::Pong => {
                state.serialize_field("type", &1)?;
            }

            InteractionResponse::EphemeralMessage(x) => {
                state.serialize_field("type", &4)?;

                let inner = RawResponseData {
                    content: Some(x),
                    flags: EPHEMERAL,
                };
                state.serialize_field("data", &inner)?;
            }

            InteractionResponse::DeferredEphemeralMessage => {
                state.serialize_field("type", &5)?;

                let inner = RawResponseData {
                    content: None,
                    flags: EPHEMERAL,
                };
                state.serialize_field("data", &inner)?;
            }
        };

        state.end()
    }
}

/// Identifies an interaction's original response, which can be edited for 15
/// minutes after the interaction was received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseHandle {
    pub application_id: String,
    pub token: String,
}

/// <https://discord.com/developers/docs/interactions/receiving-and-responding#edit-original-interaction-response>
#[derive(Serialize)]
struct EditRequest<'a> {
    content: &'a str,
}

impl DiscordClient {
    /// Replace the content of the original response, which for us is always
    /// the deferred placeholder.
    pub async fn edit_original(
        &self,
        handle: &ResponseHandle,
        content: &str,
    ) -> Result<(), DiscordError> {
        let res: APIResult<MessageResponse> = self
            .patch(format!(
                "/webhooks/{}/{}/messages/@original",
                handle.application_id, handle.token
            ))
            .json(&EditRequest { content })
            .send()
            .await?
            .json()
            .await?;

        res.into_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::auth::BotToken;
    use mockito::Matcher;
    use serde_json::json;

    mod deserialization {
        use super::*;

        #[test]
        fn test_ping() {
            let x: Interaction = serde_json::from_str(
                r#"{
                    "application_id": "11",
                    "id": "22",
                    "token": "tok",
                    "type": 1,
                    "version": 1
                }"#,
            )
            .unwrap();

            assert_eq!(x.kind, InteractionKind::Ping);
            assert!(x.data.is_none());
        }

        #[test]
        fn test_command() {
            let x: Interaction = serde_json::from_str(
                r#"{
                    "application_id": "11",
                    "channel_id": "33",
                    "data": {
                        "id": "44",
                        "name": "écrire",
                        "type": 1,
                        "options": [
                            { "name": "texte", "type": 3, "value": "Bonjour" },
                            { "name": "image3", "type": 11, "value": "55" },
                            { "name": "image4", "type": 11, "value": "66" }
                        ],
                        "resolved": {
                            "attachments": {
                                "55": {
                                    "id": "55",
                                    "filename": "chat.png",
                                    "size": 1024,
                                    "url": "https://cdn.discordapp.com/ephemeral-attachments/1/55/chat.png",
                                    "proxy_url": "https://media.discordapp.net/ephemeral-attachments/1/55/chat.png",
                                    "content_type": "image/png"
                                }
                            }
                        }
                    },
                    "guild_id": "77",
                    "id": "22",
                    "token": "tok",
                    "type": 2,
                    "version": 1
                }"#,
            )
            .unwrap();

            assert_eq!(x.kind, InteractionKind::ApplicationCommand);
            assert_eq!(x.channel_id, Some(ChannelId("33".into())));
            assert_eq!(
                x.response_handle(),
                ResponseHandle {
                    application_id: "11".into(),
                    token: "tok".into(),
                }
            );

            let data = x.command_data().unwrap().unwrap();
            assert_eq!(data.name, "écrire");
            assert_eq!(data.string_option("texte"), Some("Bonjour"));
            assert_eq!(data.string_option("image1"), None);

            assert_eq!(data.attachment_option("image1"), OptionLookup::Absent);
            assert_eq!(
                data.attachment_option("image4"),
                OptionLookup::Unresolved("66".into())
            );
            match data.attachment_option("image3") {
                OptionLookup::Found(a) => {
                    assert_eq!(a.filename.as_deref(), Some("chat.png"));
                    assert_eq!(a.url.path(), "/ephemeral-attachments/1/55/chat.png");
                }
                x => panic!("expected a resolved attachment, found {:?}", x),
            }
        }

        #[test]
        fn test_component() {
            let x: Interaction = serde_json::from_str(
                r#"{
                    "application_id": "11",
                    "channel_id": "33",
                    "data": { "custom_id": "x", "component_type": 2 },
                    "id": "22",
                    "token": "tok",
                    "type": 3,
                    "version": 1
                }"#,
            )
            .unwrap();

            assert_eq!(x.kind, InteractionKind::Other(3));
            assert!(x.data.is_some());
            assert!(x.command_data().is_err());
        }

        #[test]
        fn test_attachment_empty_filename() {
            let x: Attachment = serde_json::from_str(
                r#"{ "url": "https://cdn.discordapp.com/a", "filename": "" }"#,
            )
            .unwrap();
            assert_eq!(x.filename, None);

            let y: Attachment =
                serde_json::from_str(r#"{ "url": "https://cdn.discordapp.com/a" }"#).unwrap();
            assert_eq!(y.filename, None);
        }
    }

    #[test]
    fn test_serialize_responses() {
        assert_eq!(
            serde_json::to_value(InteractionResponse::Pong).unwrap(),
            json!({ "type": 1 })
        );

        assert_eq!(
            serde_json::to_value(InteractionResponse::EphemeralMessage("hé".into())).unwrap(),
            json!({ "type": 4, "data": { "content": "hé", "flags": 64 } })
        );

        assert_eq!(
            serde_json::to_value(InteractionResponse::DeferredEphemeralMessage).unwrap(),
            json!({ "type": 5, "data": { "flags": 64 } })
        );
    }

    #[tokio::test]
    async fn test_edit_original() {
        let mut srv = mockito::Server::new_async().await;

        let mock = srv
            .mock("PATCH", "/webhooks/11/tok/messages/@original")
            .match_body(Matcher::Json(json!({ "content": "done" })))
            .with_body(r#"{"id": "999"}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url(), BotToken("foobar".into()));
        let handle = ResponseHandle {
            application_id: "11".into(),
            token: "tok".into(),
        };
        let res = client.edit_original(&handle, "done").await;

        mock.assert_async().await;
        assert!(res.is_ok());
    }
}
