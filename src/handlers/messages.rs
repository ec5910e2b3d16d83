use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use log::{info, warn};
use serde_json::{json, Value};

use super::{success, AppState};
use crate::client::{Command, STATUS_BROADCAST};
use crate::dispatch::fan_out;
use crate::error::{ApiError, OrReport};
use crate::events::MESSAGE_SENT;
use crate::extract::JsonBody;
use crate::types::{
    ButtonsRequest, FileRequest, LinkPreviewRequest, ListMessageRequest, LocationRequest,
    MentionedRequest, PollRequest, ReplyRequest, SendFileBase64Request, SendMessageRequest,
    SendVoiceBase64Request, SendVoiceRequest, StatusRequest,
};
use crate::upload::{cleanup, file_source, FilePayload};
use crate::validate::{recipients, required};

const SEND_FAILED: &str = "Error sending message.";
const NOTHING_SENT: &str = "Error sending message";
const DEFAULT_LIST_BUTTON: &str = "SELECIONE UMA OPÇÃO";
const VOICE_FILENAME: &str = "Voice Audio";

async fn send_each<F>(
    state: &AppState,
    recipients: &[String],
    failed: &'static str,
    nothing_sent: &'static str,
    build: F,
) -> Result<Vec<Value>, ApiError>
where
    F: FnMut(&str) -> Command,
{
    let results = fan_out(state.client.as_ref(), recipients, build)
        .await
        .or_report(failed)?;

    if results.is_empty() {
        return Err(ApiError::NothingSent(nothing_sent));
    }
    Ok(results)
}

fn options_or_empty(options: Option<Value>) -> Value {
    options.unwrap_or_else(|| json!({}))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let message = required(req.message, "message was not informed")?;
    let options = options_or_empty(req.options);

    info!("Sending text to {} recipient(s)", recipients.len());
    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendText {
            to: to.to_string(),
            message: message.clone(),
            options: options.clone(),
        }
    })
    .await?;

    let results = Value::Array(results);
    state.notifier.emit(MESSAGE_SENT, results.clone());
    Ok(success(results))
}

pub async fn send_image(
    State(state): State<Arc<AppState>>,
    FilePayload { body, upload }: FilePayload<FileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(body.phone)?;
    let path = file_source(body.path, upload.as_ref())?;
    let filename = body
        .filename
        .or_else(|| upload.as_ref().and_then(|u| u.file_name().map(str::to_string)))
        .unwrap_or_else(|| "image-api.jpg".to_string());

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendImage {
            to: to.to_string(),
            path: path.clone(),
            filename: filename.clone(),
            caption: body.caption.clone(),
        }
    })
    .await?;

    cleanup(upload).await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_file(
    State(state): State<Arc<AppState>>,
    FilePayload { body, upload }: FilePayload<FileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(body.phone)?;
    let path = file_source(body.path, upload.as_ref())?;
    let filename = body
        .filename
        .or_else(|| upload.as_ref().and_then(|u| u.file_name().map(str::to_string)))
        .unwrap_or_else(|| "file".to_string());

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendFile {
            to: to.to_string(),
            path: path.clone(),
            filename: filename.clone(),
            message: body.message.clone(),
        }
    })
    .await?;

    cleanup(upload).await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_file_base64(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SendFileBase64Request>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let base64 = required(req.base64, "The base64 of the file was not informed")?;
    let options = options_or_empty(req.options);

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendFileFromBase64 {
            to: to.to_string(),
            base64: base64.clone(),
            filename: req.filename.clone(),
            options: options.clone(),
        }
    })
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_voice(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SendVoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let path = required(req.path, "path was not informed")?;
    let filename = req.filename.unwrap_or_else(|| VOICE_FILENAME.to_string());

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendPtt {
            to: to.to_string(),
            path: path.clone(),
            filename: filename.clone(),
            message: req.message.clone(),
            quoted_message_id: req.quoted_message_id.clone(),
        }
    })
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_voice_base64(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SendVoiceBase64Request>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let base64 = required(req.base64_ptt, "base64Ptt was not informed")?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendPttFromBase64 {
            to: to.to_string(),
            base64: base64.clone(),
            filename: VOICE_FILENAME.to_string(),
        }
    })
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_link_preview(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LinkPreviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let url = required(req.url, "url was not informed")?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendLinkPreview {
            to: to.to_string(),
            url: url.clone(),
            caption: req.caption.clone(),
        }
    })
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_location(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "lat and lng must be informed";
    let recipients = recipients(req.phone)?;
    let lat = required(req.lat, MISSING)?;
    let lng = required(req.lng, MISSING)?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendLocation {
            to: to.to_string(),
            lat: lat.clone(),
            lng: lng.clone(),
            title: req.title.clone(),
        }
    })
    .await?;
    Ok(success(Value::Array(results)))
}

/// Buttons ride along in the text options.
pub async fn send_buttons(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ButtonsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let message = required(req.message, "message was not informed")?;
    let options = options_or_empty(req.options);

    let results = send_each(
        &state,
        &recipients,
        SEND_FAILED,
        "Error sending message with buttons",
        |to| Command::SendText {
            to: to.to_string(),
            message: message.clone(),
            options: options.clone(),
        },
    )
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_list_message(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ListMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let sections = required(req.sections, "sections was not informed")?;
    let button_text = req
        .button_text
        .unwrap_or_else(|| DEFAULT_LIST_BUTTON.to_string());
    let description = req.description.unwrap_or_default();

    let results = send_each(
        &state,
        &recipients,
        SEND_FAILED,
        "Error sending list buttons",
        |to| Command::SendListMessage {
            to: to.to_string(),
            button_text: button_text.clone(),
            description: description.clone(),
            sections: sections.clone(),
        },
    )
    .await?;
    Ok(success(Value::Array(results)))
}

// Polls are not supported by the session; nothing is ever sent.
pub async fn send_poll_message(body: Option<Bytes>) -> Result<Json<Value>, ApiError> {
    match body.and_then(|bytes| JsonBody::<PollRequest>::parse(&bytes).ok()) {
        Some(JsonBody(req)) => warn!(
            "Dropping poll {:?} ({} choices) for {} recipient(s): polls are not supported",
            req.name.unwrap_or_default(),
            req.choices.map_or(0, |c| c.len()),
            req.phone.map_or(0, |p| p.len())
        ),
        None => warn!("Dropping unreadable poll request: polls are not supported"),
    }
    Err(ApiError::NothingSent("Error sending poll message"))
}

pub async fn send_status(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = required(req.message, "message was not informed")?;

    let results = send_each(
        &state,
        &[STATUS_BROADCAST.to_string()],
        SEND_FAILED,
        NOTHING_SENT,
        |to| Command::SendText {
            to: to.to_string(),
            message: message.clone(),
            options: json!({}),
        },
    )
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn reply_message(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let message = required(req.message, "message was not informed")?;
    let message_id = required(req.message_id, "messageId was not informed")?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::Reply {
            to: to.to_string(),
            message: message.clone(),
            message_id: message_id.clone(),
        }
    })
    .await?;

    state
        .notifier
        .emit(MESSAGE_SENT, json!({ "message": message, "to": recipients }));
    Ok(success(Value::Array(results)))
}

pub async fn send_mentioned(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<MentionedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(req.phone)?;
    let message = required(req.message, "message was not informed")?;
    let mentioned = required(req.mentioned, "mentioned was not informed")?;

    let results = send_each(
        &state,
        &recipients,
        "Error on send message mentioned",
        NOTHING_SENT,
        |to| Command::SendMentioned {
            to: to.to_string(),
            message: message.clone(),
            mentioned: mentioned.clone(),
        },
    )
    .await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_image_as_sticker(
    State(state): State<Arc<AppState>>,
    FilePayload { body, upload }: FilePayload<FileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(body.phone)?;
    let path = file_source(body.path, upload.as_ref())?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendImageAsSticker {
            to: to.to_string(),
            path: path.clone(),
        }
    })
    .await?;

    cleanup(upload).await?;
    Ok(success(Value::Array(results)))
}

pub async fn send_image_as_sticker_gif(
    State(state): State<Arc<AppState>>,
    FilePayload { body, upload }: FilePayload<FileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipients = recipients(body.phone)?;
    let path = file_source(body.path, upload.as_ref())?;

    let results = send_each(&state, &recipients, SEND_FAILED, NOTHING_SENT, |to| {
        Command::SendImageAsStickerGif {
            to: to.to_string(),
            path: path.clone(),
        }
    })
    .await?;

    cleanup(upload).await?;
    Ok(success(Value::Array(results)))
}
