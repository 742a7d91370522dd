use crate::translate::{TranslateError, TranslationRequest, TranslationResult, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
const LOG_TARGET: &str = "translate::mymemory";

/// Client for the MyMemory `GET /get?q=..&langpair=..` API.
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: Client,
    endpoint: Url,
}

impl MyMemoryTranslator {
    pub fn new() -> Result<Self, TranslateError> {
        Ok(Self::with_endpoint(Url::parse(DEFAULT_ENDPOINT)?))
    }

    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn request_url(&self, request: &TranslationRequest) -> Result<Url, TranslateError> {
        let text = request.validate()?;
        let params = format!(
            "q={}&langpair={}",
            urlencoding::encode(text),
            urlencoding::encode(&request.pair.langpair())
        );
        // Parameters already on the endpoint (e.g. `de=`, `key=`) are kept.
        let query = match self.endpoint.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{params}"),
            _ => params,
        };

        let mut url = self.endpoint.clone();
        url.set_query(Some(&query));
        Ok(url)
    }
}

/// Picks the best candidate out of a MyMemory response body.
///
/// A `matches` entry with numeric id 0 and a non-empty translation wins over
/// `responseData.translatedText`. Anything missing yields an empty string.
pub fn extract_translation(body: &Value) -> String {
    let best_match = body
        .get("matches")
        .and_then(Value::as_array)
        .and_then(|matches| {
            matches.iter().find_map(|m| {
                let is_primary = m.get("id").and_then(Value::as_f64) == Some(0.0);
                let translation = m.get("translation").and_then(Value::as_str)?;
                (is_primary && !translation.is_empty()).then_some(translation)
            })
        });

    if let Some(translation) = best_match {
        return translation.to_owned();
    }

    body.pointer("/responseData/translatedText")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

impl Translator for MyMemoryTranslator {
    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResult, TranslateError>> {
        async move {
            let url = self.request_url(&request)?;
            tracing::debug!(target: LOG_TARGET, langpair = %request.pair.langpair(), "requesting translation");

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(TranslateError::Network)?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(target: LOG_TARGET, status = status.as_u16(), "translation api rejected request");
                return Err(TranslateError::Http {
                    status: status.as_u16(),
                });
            }

            let body = response.text().await.map_err(TranslateError::Network)?;
            let json: Value = serde_json::from_str(&body).map_err(|e| {
                TranslateError::InvalidResponse(format!("Failed to parse JSON: {e}"))
            })?;

            let translated_text = extract_translation(&json);
            if translated_text.is_empty() {
                tracing::debug!(target: LOG_TARGET, "api returned an empty translation");
            }

            Ok(TranslationResult { translated_text })
        }
        .boxed()
    }
}
