//! Declare slash commands to Discord.
//!
//! The whole global command set is overwritten in one request, so submitting
//! the same declarations again changes nothing.
//!
//! <https://discord.com/developers/docs/interactions/application-commands#bulk-overwrite-global-application-commands>

use super::{
    api::{APIResult, DiscordClient},
    error::DiscordError,
};
use serde::{Deserialize, Serialize, Serializer};

/// <https://discord.com/developers/docs/interactions/application-commands#application-command-object>
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandDeclaration {
    pub name: String,
    pub description: String,
    /// Always `CHAT_INPUT`, i.e. a slash command.
    #[serde(rename = "type")]
    kind: u8,
    pub options: Vec<OptionDeclaration>,
}

impl CommandDeclaration {
    pub fn new<T: ToString, U: ToString>(name: T, description: U) -> Self {
        CommandDeclaration {
            name: name.to_string(),
            description: description.to_string(),
            kind: 1,
            options: Vec::new(),
        }
    }

    pub fn add_option(mut self, option: OptionDeclaration) -> Self {
        self.options.push(option);
        self
    }
}

/// <https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-structure>
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionDeclaration {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl OptionDeclaration {
    /// Options are optional unless stated otherwise.
    pub fn new<T: ToString, U: ToString>(kind: OptionKind, name: T, description: U) -> Self {
        OptionDeclaration {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            required: false,
        }
    }
}

/// <https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-type>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Attachment,
}

impl Serialize for OptionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(match self {
            OptionKind::String => 3,
            OptionKind::Attachment => 11,
        })
    }
}

#[derive(Deserialize)]
struct RegisteredCommand {
    name: String,
}

impl DiscordClient {
    /// Replace the application's global commands, returning the names Discord
    /// now holds.
    pub async fn overwrite_global_commands(
        &self,
        application_id: &str,
        commands: &[CommandDeclaration],
    ) -> Result<Vec<String>, DiscordError> {
        let res: APIResult<Vec<RegisteredCommand>> = self
            .put(format!("/applications/{}/commands", application_id))
            .json(commands)
            .send()
            .await?
            .json()
            .await?;

        res.into_result()
            .map(|xs| xs.into_iter().map(|x| x.name).collect())
    }
}
