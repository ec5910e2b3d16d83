use std::path::PathBuf;

use clap::Parser;

/// HTTP API over a messaging session.
#[derive(Debug, Parser)]
#[command(name = "wpp-api", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "WPP_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "WPP_API_PORT", default_value_t = 21465)]
    pub port: u16,

    /// Bearer token required on every /api request. Unset means open access.
    #[arg(long, env = "WPP_API_KEY")]
    pub api_key: Option<String>,

    /// Base URL of the messaging-session bridge
    #[arg(long, env = "WPP_SESSION_URL")]
    pub session_url: Option<String>,

    /// Bearer token presented to the session bridge
    #[arg(long, env = "WPP_SESSION_TOKEN")]
    pub session_token: Option<String>,

    /// Where uploaded files wait until they are sent
    #[arg(long, env = "WPP_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Maximum request body size, in megabytes
    #[arg(long, env = "WPP_BODY_LIMIT_MB", default_value_t = 50)]
    pub body_limit_mb: usize,
}

impl Config {
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("wpp-uploads"))
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }

    /// Empty keys count as unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|k| !k.is_empty())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "wpp-api",
            "--port",
            "8080",
            "--session-url",
            "http://bridge:3000",
            "--upload-dir",
            "/var/spool/wpp",
            "--body-limit-mb",
            "5",
        ])
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.session_url.as_deref(), Some("http://bridge:3000"));
        assert_eq!(config.upload_dir(), PathBuf::from("/var/spool/wpp"));
        assert_eq!(config.body_limit(), 5 * 1024 * 1024);
    }

    #[test]
    fn empty_api_key_disables_auth() {
        let config = Config::try_parse_from(["wpp-api", "--api-key", ""]).unwrap();
        assert_eq!(config.api_key(), None);
    }
}
