//! An in-memory [DiscordApi] which records every call made to it.

use super::{
    api::DiscordApi,
    channel::{Channel, ChannelId, ChannelKind},
    error::DiscordError,
    interaction::ResponseHandle,
    message::OutboundMessage,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    GetChannel(ChannelId),
    PostMessage(ChannelId, OutboundMessage),
    EditOriginal(ResponseHandle, String),
}

pub enum PostBehaviour {
    Succeed,
    /// Fail the way Discord does without `SEND_MESSAGES`.
    MissingPermissions,
    Panic,
}

pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    /// `None` behaves like an unknown channel.
    pub channel_kind: Option<ChannelKind>,
    pub post: PostBehaviour,
}

impl Default for FakeApi {
    fn default() -> Self {
        FakeApi {
            calls: Mutex::new(Vec::new()),
            channel_kind: Some(ChannelKind::GuildText),
            post: PostBehaviour::Succeed,
        }
    }
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Delivery happens in a background task, so wait for it to finalise.
    pub async fn wait_for_edit(&self) -> Vec<Call> {
        for _ in 0..200 {
            let calls = self.calls();
            if calls.iter().any(|c| matches!(c, Call::EditOriginal(..))) {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        panic!("original response never edited, calls: {:?}", self.calls());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DiscordApi for FakeApi {
    async fn get_channel(&self, channel: &ChannelId) -> Result<Channel, DiscordError> {
        self.record(Call::GetChannel(channel.clone()));

        match self.channel_kind {
            Some(kind) => Ok(Channel {
                id: channel.clone(),
                kind,
            }),
            None => Err(DiscordError::APIResponseError {
                code: 10003,
                message: "Unknown Channel".into(),
            }),
        }
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        msg: &OutboundMessage,
    ) -> Result<(), DiscordError> {
        match self.post {
            PostBehaviour::Succeed => {
                self.record(Call::PostMessage(channel.clone(), msg.clone()));
                Ok(())
            }
            PostBehaviour::MissingPermissions => Err(DiscordError::APIResponseError {
                code: 50013,
                message: "Missing Permissions".into(),
            }),
            PostBehaviour::Panic => panic!("connection reset"),
        }
    }

    async fn edit_original_response(
        &self,
        handle: &ResponseHandle,
        content: &str,
    ) -> Result<(), DiscordError> {
        self.record(Call::EditOriginal(handle.clone(), content.to_owned()));
        Ok(())
    }
}
