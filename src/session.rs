//! Posts each [`Command`] to the session bridge at `{base}/execute`.

use anyhow::{bail, Context};
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::client::{Command, MessagingClient};

#[derive(Deserialize)]
struct BridgeReply {
    #[serde(default)]
    result: Value,
}

pub struct RemoteSession {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl RemoteSession {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            bail!("session URL is empty");
        }

        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client for the session bridge")?;

        info!("Using messaging session at {}", base_url);
        Ok(Self {
            http,
            endpoint: format!("{}/execute", base_url),
            token,
        })
    }
}

#[async_trait]
impl MessagingClient for RemoteSession {
    async fn execute(&self, command: Command) -> anyhow::Result<Value> {
        if let Some(to) = command.recipient() {
            debug!("Forwarding send to {}", to);
        }

        let mut request = self.http.post(&self.endpoint).json(&command);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("session bridge unreachable")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("session bridge answered {}: {}", status, detail);
        }

        let reply: BridgeReply = response
            .json()
            .await
            .context("session bridge sent an invalid reply")?;
        Ok(reply.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let session = RemoteSession::new("http://127.0.0.1:9000/session/", None).unwrap();
        assert_eq!(session.endpoint, "http://127.0.0.1:9000/session/execute");
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(RemoteSession::new("/", None).is_err());
    }

    #[tokio::test]
    async fn unreachable_bridge_is_an_error() {
        // Port 9 (discard) is closed on test machines.
        let session = RemoteSession::new("http://127.0.0.1:9", None).unwrap();
        let err = session
            .execute(Command::UpdateCartEnabled { enabled: true })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }
}
