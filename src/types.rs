use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl Envelope {
    pub fn success(response: Value) -> Self {
        Self {
            status: "success",
            message: None,
            response: Some(response),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            response: None,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Phone numbers and catalog ids arrive as JSON strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Accepts either `"5511..."` or `["5511...", "5521..."]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(StringOrNumber),
        Many(Vec<StringOrNumber>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(value)) => Some(vec![value.into()]),
        Some(OneOrMany::Many(values)) => Some(values.into_iter().map(String::from).collect()),
    })
}

// --- Messaging requests ---

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub message: Option<String>,
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct FileRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub path: Option<String>,
    pub filename: Option<String>,
    pub caption: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendFileBase64Request {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub base64: Option<String>,
    pub filename: Option<String>,
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVoiceRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub path: Option<String>,
    pub filename: Option<String>,
    pub message: Option<String>,
    pub quoted_message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVoiceBase64Request {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub base64_ptt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkPreviewRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub url: Option<String>,
    pub caption: Option<String>,
}

/// Coordinates are passed through untouched; clients send both numbers and strings.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ButtonsRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub message: Option<String>,
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessageRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub description: Option<String>,
    pub sections: Option<Value>,
    pub button_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub name: Option<String>,
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub message: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MentionedRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub phone: Option<Vec<String>>,
    pub message: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub mentioned: Option<Vec<String>>,
}

// --- Catalog requests ---

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub phone: Option<String>,
    pub qnt: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub phone: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsQuery {
    pub phone: Option<String>,
    pub qnt: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProductsRequest {
    #[serde(default, deserialize_with = "one_or_many")]
    pub id: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ProductImageRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveProductImageRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub index: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub products: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCollectionRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub value: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    pub enabled: Option<bool>,
}
