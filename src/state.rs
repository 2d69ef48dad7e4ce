use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::auth::repo::{MemoryUserStore, PgUserStore, UserStore};
use crate::chat::services::{CompletionService, GeminiClient};
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::translation::services::{GoogleTranslateClient, TranslationService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub completion: Arc<dyn CompletionService>,
    pub translator: Arc<dyn TranslationService>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let users: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("user store: postgres");
                Arc::new(PgUserStore::new(db))
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .context("build http client")?;

        if config.chat.api_key.is_none() {
            warn!("CHAT_API_KEY not set; /chat will fail");
        }
        if config.translation.api_key.is_none() {
            warn!("TRANSLATION_API_KEY not set; /translate will fail");
        }

        let completion: Arc<dyn CompletionService> =
            Arc::new(GeminiClient::new(&config.chat, http_client.clone()));
        let translator: Arc<dyn TranslationService> =
            Arc::new(GoogleTranslateClient::new(&config.translation, http_client));

        Ok(Self {
            config,
            users,
            completion,
            translator,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        completion: Arc<dyn CompletionService>,
        translator: Arc<dyn TranslationService>,
    ) -> Self {
        Self {
            config,
            users,
            completion,
            translator,
        }
    }

    /// In-memory users and canned upstreams: chat echoes the prompt,
    /// translation tags each text with the target language.
    pub fn fake() -> Self {
        struct EchoCompletion;
        #[async_trait]
        impl CompletionService for EchoCompletion {
            async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
                Ok(format!("echo: {}", prompt))
            }
        }

        struct TaggingTranslator;
        #[async_trait]
        impl TranslationService for TaggingTranslator {
            async fn translate(
                &self,
                texts: &[String],
                target_lang: &str,
            ) -> Result<Vec<String>, ServiceError> {
                Ok(texts.iter().map(|t| format!("[{}] {}", target_lang, t)).collect())
            }
        }

        Self::from_parts(
            Arc::new(AppConfig::default()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(EchoCompletion),
            Arc::new(TaggingTranslator),
        )
    }
}
