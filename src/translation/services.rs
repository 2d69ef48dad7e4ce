use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::TranslationConfig, error::ServiceError};

/// Translates a batch of texts into `target_lang`, preserving order.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>, ServiceError>;
}

/// Client for Google Cloud Translation v2.
pub struct GoogleTranslateClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateEnvelope {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslationConfig, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TranslationService for GoogleTranslateClient {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("translation"))?;

        // one `q` pair per input text
        let mut form: Vec<(&str, &str)> = texts.iter().map(|t| ("q", t.as_str())).collect();
        form.push(("target", target_lang));
        form.push(("key", api_key));

        let url = format!("{}/language/translate/v2", self.base_url);
        tracing::debug!(count = texts.len(), target = %target_lang, "sending translation request");

        let response = self
            .http_client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream { status, body });
        }

        let envelope: TranslateEnvelope = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        let translations = envelope.data.translations;
        if translations.len() != texts.len() {
            return Err(ServiceError::InvalidResponse(format!(
                "expected {} translations, got {}",
                texts.len(),
                translations.len()
            )));
        }

        Ok(translations.into_iter().map(|t| t.translated_text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, api_key: Option<&str>) -> GoogleTranslateClient {
        GoogleTranslateClient::new(
            &TranslationConfig {
                api_key: api_key.map(Into::into),
                base_url: base_url.into(),
            },
            Client::new(),
        )
    }

    #[tokio::test]
    async fn translate_posts_form_and_unwraps_translations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_string_contains("q=hello"))
            .and(body_string_contains("q=thank+you"))
            .and(body_string_contains("target=ta"))
            .and(body_string_contains("key=k1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"translations": [
                    {"translatedText": "வணக்கம்", "detectedSourceLanguage": "en"},
                    {"translatedText": "நன்றி", "detectedSourceLanguage": "en"}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let out = client(&server.uri(), Some("k1"))
            .translate(&["hello".into(), "thank you".into()], "ta")
            .await
            .expect("translate");
        assert_eq!(out, vec!["வணக்கம்", "நன்றி"]);
    }

    #[tokio::test]
    async fn translate_fails_on_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid Value"))
            .mount(&server)
            .await;

        let err = client(&server.uri(), Some("k1"))
            .translate(&["hello".into()], "xx")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Upstream { status: 400, .. }));
    }

    #[tokio::test]
    async fn translate_fails_on_unexpected_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"oops": true})))
            .mount(&server)
            .await;

        let err = client(&server.uri(), Some("k1"))
            .translate(&["hello".into()], "ta")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn translate_rejects_mismatched_translation_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"translations": [{"translatedText": "வணக்கம்"}]}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri(), Some("k1"))
            .translate(&["hello".into(), "thank you".into()], "ta")
            .await
            .unwrap_err();
        match err {
            ServiceError::InvalidResponse(msg) => {
                assert_eq!(msg, "expected 2 translations, got 1")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn translate_without_key_is_not_configured() {
        let err = client("http://127.0.0.1:9", None)
            .translate(&["hello".into()], "ta")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured("translation")));
    }
}
