//! Declaration and registration of the `/écrire` slash command.

use super::invocation::SLOT_COUNT;
use crate::discord::{
    api::DiscordClient,
    registry::{CommandDeclaration, OptionDeclaration, OptionKind},
};
use tracing::{error, info};

pub const COMMAND_NAME: &str = "écrire";
pub const TEXT_OPTION: &str = "texte";

const COMMAND_DESCRIPTION: &str =
    "Envoie un message anonyme avec ou sans texte, et jusqu’à 6 images.";

/// Attachment options are numbered from one: `image1` through `image6`.
pub fn image_option_name(slot: usize) -> String {
    format!("image{}", slot + 1)
}

pub fn declaration() -> CommandDeclaration {
    let cmd = CommandDeclaration::new(COMMAND_NAME, COMMAND_DESCRIPTION).add_option(
        OptionDeclaration::new(OptionKind::String, TEXT_OPTION, "Le message à envoyer"),
    );

    (0..SLOT_COUNT).fold(cmd, |cmd, slot| {
        cmd.add_option(OptionDeclaration::new(
            OptionKind::Attachment,
            image_option_name(slot),
            format!("Image {}", slot + 1),
        ))
    })
}

/// Make sure Discord knows about the command. Failure isn't fatal: commands
/// registered by a previous run keep working.
pub async fn register(client: &DiscordClient, application_id: &str) {
    info!("Registering slash commands");

    match client
        .overwrite_global_commands(application_id, &[declaration()])
        .await
    {
        Ok(names) => info!(commands = ?names, "Registered slash commands"),
        Err(e) => error!(error = %e, "Failed to register slash commands"),
    }
}
