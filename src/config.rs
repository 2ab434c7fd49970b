use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SPACE_API_NAME: &str = "predict";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FALLBACK_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub space_url: String,
    pub space_api_name: String,
    pub hf_token: Option<String>,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub fallback_max_attempts: u32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let space_url = match (get("HF_SPACE_URL"), get("HF_SPACE_ID")) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(id)) => space_url_from_id(&id)
                .ok_or(ConfigError::Invalid { var: "HF_SPACE_ID", value: id })?,
            (None, None) => return Err(ConfigError::Missing("HF_SPACE_ID")),
        };

        let host = match get("SOLVER_HOST") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "SOLVER_HOST", value: raw })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = parse_or("SOLVER_PORT", get("SOLVER_PORT"), DEFAULT_PORT)?;
        let fallback_max_attempts =
            parse_or("FALLBACK_MAX_ATTEMPTS", get("FALLBACK_MAX_ATTEMPTS"), DEFAULT_FALLBACK_ATTEMPTS)?;
        if fallback_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "FALLBACK_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            space_url,
            space_api_name: get("HF_API_NAME")
                .map(|name| name.trim_start_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SPACE_API_NAME.to_string()),
            hf_token: get("HF_TOKEN"),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            host,
            port,
            fallback_max_attempts,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn video_lookup_enabled(&self) -> bool {
        self.youtube_api_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

/// "owner/my_space" -> "https://owner-my-space.hf.space"
fn space_url_from_id(id: &str) -> Option<String> {
    let (owner, name) = id.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    let subdomain = format!("{}-{}", owner, name)
        .to_lowercase()
        .replace(['_', '.'], "-");
    Some(format!("https://{}.hf.space", subdomain))
}
