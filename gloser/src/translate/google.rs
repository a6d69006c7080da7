//! Keyless Google Translate provider.
//!
//! Talks to the public web endpoint the translate widget itself uses. The
//! response is a positional JSON array rather than an object: index 0 holds
//! the translation segments, and each segment holds its text at index 0.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{TranslateError, TranslationInput, TranslationOutput, Translator};

/// The translate endpoint.
const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translation provider backed by the Google Translate web endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    /// ISO 639-1 code meanings are translated into.
    target: String,
}

impl GoogleTranslator {
    /// Creates a provider on top of an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client, target: impl Into<String>) -> GoogleTranslator {
        GoogleTranslator {
            client,
            target: target.into(),
        }
    }

    /// Translates a single piece of text.
    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        debug!(%source, %target, "requesting translation");

        let request = self.client.get(ENDPOINT).query(&[
            ("client", "gtx"),
            ("sl", source),
            ("tl", target),
            ("dt", "t"),
            ("q", text),
        ]);
        let response = request.send().await.map_err(TranslateError::Request)?;

        match response.error_for_status() {
            Ok(response) => {
                let body: Value = response.json().await.map_err(TranslateError::Request)?;

                segments_text(&body).ok_or_else(|| {
                    TranslateError::UnexpectedResponse(
                        "no translation segments at index 0".to_string(),
                    )
                })
            }
            Err(err) => Err(TranslateError::Request(err)),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate_word(
        &self,
        input: &TranslationInput,
    ) -> Result<TranslationOutput, TranslateError> {
        let source = input.source_language.code();

        let headword_english = self.translate_text(&input.headword, source, "en").await?;
        let headword_russian = self.translate_text(&input.headword, source, "ru").await?;

        let mut meanings = Vec::with_capacity(input.meanings.len());
        for meaning in &input.meanings {
            let translated = self.translate_text(meaning, source, &self.target).await?;
            meanings.push(Some(translated));
        }

        Ok(TranslationOutput {
            headword_english: Some(headword_english),
            headword_russian: Some(headword_russian),
            meanings,
        })
    }
}

/// Concatenates the translation segments of a response body.
///
/// Long inputs come back split over several segments; their texts joined in
/// order form the full translation.
fn segments_text(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut text = String::new();

    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            text.push_str(part);
        }
    }

    (!text.is_empty()).then_some(text)
}
