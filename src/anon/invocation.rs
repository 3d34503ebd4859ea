use super::command::{image_option_name, TEXT_OPTION};
use crate::discord::{
    interaction::{CommandData, OptionLookup},
    message::{AttachmentRef, OutboundMessage},
};
use tracing::warn;

/// The number of attachment options the command accepts.
pub const SLOT_COUNT: usize = 6;

/// The values a user supplied to `/écrire`. Slot `i` holds option
/// `image{i + 1}`, and any of them may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub text: Option<String>,
    pub slots: [Option<AttachmentRef>; SLOT_COUNT],
}

impl Invocation {
    pub fn from_command(data: &CommandData) -> Self {
        let text = data.string_option(TEXT_OPTION).map(str::to_owned);

        let slots = std::array::from_fn(|slot| {
            let name = image_option_name(slot);

            match data.attachment_option(&name) {
                OptionLookup::Absent => None,
                OptionLookup::Unresolved(id) => {
                    warn!(option = %name, id = %id, "Attachment missing from resolved data");
                    None
                }
                OptionLookup::Found(x) => {
                    Some(AttachmentRef::new(x.url.clone(), x.filename.clone()))
                }
            }
        });

        Invocation { text, slots }
    }

    /// The supplied attachments in slot order, skipping empty slots.
    pub fn attachments(&self) -> Vec<AttachmentRef> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// Returns `None` if the user gave neither text nor an attachment.
    pub fn into_message(self) -> Option<OutboundMessage> {
        let attachments = self.attachments();

        OutboundMessage::new(self.text, attachments)
    }
}
