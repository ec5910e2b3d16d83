//! Request bodies for file-bearing sends: JSON with a server-side `path`, or
//! `multipart/form-data` with the file in a `file` part.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, OrReport};
use crate::extract::JsonBody;
use crate::handlers::AppState;

const FILE_PART: &str = "file";

#[derive(Debug)]
pub struct Upload {
    path: PathBuf,
    file_name: Option<String>,
}

impl Upload {
    async fn store(dir: &Path, field: Field<'_>) -> anyhow::Result<Self> {
        let file_name = field.file_name().map(str::to_string);
        let extension = file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}{}", uuid::Uuid::new_v4(), extension));
        let data = field.bytes().await?;
        tokio::fs::write(&path, &data).await?;

        info!("Stored upload {:?} ({} bytes) at {}", file_name, data.len(), path.display());
        Ok(Self { path, file_name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub async fn remove(self) -> std::io::Result<()> {
        tokio::fs::remove_file(&self.path).await
    }
}

pub async fn cleanup(upload: Option<Upload>) -> Result<(), ApiError> {
    match upload {
        Some(upload) => upload.remove().await.or_report("Error sending message."),
        None => Ok(()),
    }
}

pub fn file_source(path: Option<String>, upload: Option<&Upload>) -> Result<PathBuf, ApiError> {
    match (path.filter(|p| !p.is_empty()), upload) {
        (Some(path), _) => Ok(PathBuf::from(path)),
        (None, Some(upload)) => Ok(upload.path().to_path_buf()),
        (None, None) => Err(ApiError::missing("Sending the file is mandatory")),
    }
}

pub struct FilePayload<T> {
    pub body: T,
    pub upload: Option<Upload>,
}

#[async_trait]
impl<T> FromRequest<Arc<AppState>> for FilePayload<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let JsonBody(body) = JsonBody::<T>::from_request(req, state).await?;
            return Ok(Self { body, upload: None });
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut upload = None;
        let parsed = read_form(&mut multipart, &state.upload_dir, &mut upload)
            .await
            .and_then(|fields| serde_json::from_value(Value::Object(fields)).map_err(ApiError::from));

        match parsed {
            Ok(body) => Ok(Self { body, upload }),
            Err(err) => {
                discard(upload).await;
                Err(err)
            }
        }
    }
}

async fn read_form(
    multipart: &mut Multipart,
    dir: &Path,
    upload: &mut Option<Upload>,
) -> Result<Map<String, Value>, ApiError> {
    let mut fields = Map::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_PART {
            let stored = Upload::store(dir, field)
                .await
                .or_report("Error receiving the file")?;
            discard(upload.replace(stored)).await;
        } else {
            insert_field(&mut fields, name, field.text().await?);
        }
    }
    Ok(fields)
}

/// Repeated form fields (`phone=a&phone=b`) become arrays.
fn insert_field(fields: &mut Map<String, Value>, name: String, text: String) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(Value::String(text)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(text)]);
        }
        None => {
            fields.insert(name, Value::String(text));
        }
    }
}

async fn discard(upload: Option<Upload>) {
    if let Some(upload) = upload {
        let path = upload.path().to_path_buf();
        if let Err(err) = upload.remove().await {
            warn!("Could not remove upload {}: {}", path.display(), err);
        }
    }
}
