//! Look up Discord channels and tell whether the bot can post in them.

use super::{
    api::{APIResult, DiscordClient},
    error::DiscordError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channels are referred to by their snowflake, which Discord serialises as a
/// string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Format without the surrounding newtype wrapper.
///
/// ```
/// let x = ChannelId("41771983423143937".into());
/// assert_eq!(format!("{}", x), "41771983423143937");
/// ```
impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// <https://discord.com/developers/docs/resources/channel#channel-object-channel-types>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
    Unknown(u8),
}

impl From<u8> for ChannelKind {
    fn from(x: u8) -> Self {
        match x {
            0 => ChannelKind::GuildText,
            1 => ChannelKind::Dm,
            2 => ChannelKind::GuildVoice,
            3 => ChannelKind::GroupDm,
            4 => ChannelKind::GuildCategory,
            5 => ChannelKind::GuildAnnouncement,
            10 => ChannelKind::AnnouncementThread,
            11 => ChannelKind::PublicThread,
            12 => ChannelKind::PrivateThread,
            13 => ChannelKind::GuildStageVoice,
            14 => ChannelKind::GuildDirectory,
            15 => ChannelKind::GuildForum,
            16 => ChannelKind::GuildMedia,
            x => ChannelKind::Unknown(x),
        }
    }
}

impl ChannelKind {
    /// Categories and directories hold no messages at all, whilst forum and
    /// media channels only accept new threads. Types we don't know about yet
    /// are given the benefit of the doubt.
    pub fn accepts_messages(self) -> bool {
        !matches!(
            self,
            ChannelKind::GuildCategory
                | ChannelKind::GuildDirectory
                | ChannelKind::GuildForum
                | ChannelKind::GuildMedia
        )
    }
}

/// The metadata we care about per-channel.
#[derive(Debug, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
}

impl DiscordClient {
    /// <https://discord.com/developers/docs/resources/channel#get-channel>
    pub async fn fetch_channel(&self, channel: &ChannelId) -> Result<Channel, DiscordError> {
        let res: APIResult<Channel> = self
            .get(format!("/channels/{}", channel))
            .send()
            .await?
            .json()
            .await?;

        res.into_result()
    }
}
