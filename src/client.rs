use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Recipient of status updates on the messaging network.
pub const STATUS_BROADCAST: &str = "status@broadcast";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    SendText {
        to: String,
        message: String,
        options: Value,
    },
    SendImage {
        to: String,
        path: PathBuf,
        filename: String,
        caption: Option<String>,
    },
    SendFile {
        to: String,
        path: PathBuf,
        filename: String,
        message: Option<String>,
    },
    SendFileFromBase64 {
        to: String,
        base64: String,
        filename: Option<String>,
        options: Value,
    },
    SendPtt {
        to: String,
        path: String,
        filename: String,
        message: Option<String>,
        quoted_message_id: Option<String>,
    },
    SendPttFromBase64 {
        to: String,
        base64: String,
        filename: String,
    },
    SendLinkPreview {
        to: String,
        url: String,
        caption: Option<String>,
    },
    SendLocation {
        to: String,
        lat: Value,
        lng: Value,
        title: Option<String>,
    },
    SendListMessage {
        to: String,
        button_text: String,
        description: String,
        sections: Value,
    },
    Reply {
        to: String,
        message: String,
        message_id: String,
    },
    SendMentioned {
        to: String,
        message: String,
        mentioned: Vec<String>,
    },
    SendImageAsSticker {
        to: String,
        path: PathBuf,
    },
    SendImageAsStickerGif {
        to: String,
        path: PathBuf,
    },
    GetProducts {
        phone: String,
        qnt: Option<u32>,
    },
    GetProductById {
        phone: String,
        id: String,
    },
    EditProduct {
        id: String,
        options: Value,
    },
    DeleteProducts {
        ids: Vec<String>,
    },
    ChangeProductImage {
        id: String,
        base64: String,
    },
    AddProductImage {
        id: String,
        base64: String,
    },
    RemoveProductImage {
        id: String,
        index: u32,
    },
    GetCollections {
        phone: String,
        qnt: Option<u32>,
        max: Option<u32>,
    },
    CreateCollection {
        name: String,
        products: Vec<String>,
    },
    EditCollection {
        id: String,
        options: Value,
    },
    DeleteCollection {
        id: String,
    },
    SetProductVisibility {
        id: String,
        visible: bool,
    },
    UpdateCartEnabled {
        enabled: bool,
    },
}

impl Command {
    pub fn recipient(&self) -> Option<&str> {
        match self {
            Self::SendText { to, .. }
            | Self::SendImage { to, .. }
            | Self::SendFile { to, .. }
            | Self::SendFileFromBase64 { to, .. }
            | Self::SendPtt { to, .. }
            | Self::SendPttFromBase64 { to, .. }
            | Self::SendLinkPreview { to, .. }
            | Self::SendLocation { to, .. }
            | Self::SendListMessage { to, .. }
            | Self::Reply { to, .. }
            | Self::SendMentioned { to, .. }
            | Self::SendImageAsSticker { to, .. }
            | Self::SendImageAsStickerGif { to, .. } => Some(to),
            _ => None,
        }
    }
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn execute(&self, command: Command) -> anyhow::Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_are_tagged_in_camel_case() {
        let command = Command::Reply {
            to: "5511999990000".into(),
            message: "ok".into(),
            message_id: "true_5511999990000@c.us_ABC".into(),
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "command": "reply",
                "to": "5511999990000",
                "message": "ok",
                "messageId": "true_5511999990000@c.us_ABC",
            })
        );
    }

    #[test]
    fn catalog_commands_have_no_recipient() {
        let command = Command::DeleteCollection { id: "7".into() };
        assert_eq!(command.recipient(), None);

        let command = Command::SendImageAsSticker {
            to: "5521".into(),
            path: PathBuf::from("/tmp/a.png"),
        };
        assert_eq!(command.recipient(), Some("5521"));
    }
}
