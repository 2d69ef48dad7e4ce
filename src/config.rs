use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Completion (chat) upstream settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Translation upstream settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// When unset the process runs on the in-memory user store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub chat: ChatConfig,
    pub translation: TranslationConfig,
    pub upstream_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 5000,
            },
            database_url: None,
            database_max_connections: 10,
            chat: ChatConfig {
                api_key: None,
                model: "gemini-1.5-flash".into(),
                base_url: "https://generativelanguage.googleapis.com".into(),
            },
            translation: TranslationConfig {
                api_key: None,
                base_url: "https://translation.googleapis.com".into(),
            },
            upstream_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or(defaults.server.host),
            port: parse_var("APP_PORT")?.unwrap_or(defaults.server.port),
        };

        let chat = ChatConfig {
            // lowercase names are what older deployments put in their .env
            api_key: non_empty_var("CHAT_API_KEY").or_else(|| non_empty_var("chat_api")),
            model: std::env::var("CHAT_MODEL").unwrap_or(defaults.chat.model),
            base_url: std::env::var("CHAT_BASE_URL").unwrap_or(defaults.chat.base_url),
        };

        let translation = TranslationConfig {
            api_key: non_empty_var("TRANSLATION_API_KEY")
                .or_else(|| non_empty_var("translation_api")),
            base_url: std::env::var("TRANSLATION_BASE_URL")
                .unwrap_or(defaults.translation.base_url),
        };

        Ok(Self {
            server,
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.database_max_connections),
            chat,
            translation,
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS")?
                .unwrap_or(defaults.upstream_timeout_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key)
        .map(|v| v.parse::<T>().with_context(|| format!("{key} has invalid value {v:?}")))
        .transpose()
}
