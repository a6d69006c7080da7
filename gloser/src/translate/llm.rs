//! LLM provider speaking the OpenAI chat completions protocol.
//!
//! The model gets one request per definition and is asked to reply with a
//! strict JSON object. Some models wrap their reply in a Markdown code fence
//! anyway, so that is stripped before parsing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TranslateError, TranslationInput, TranslationOutput, Translator};
use crate::word::SourceLanguage;

/// Translation provider backed by an OpenAI-compatible endpoint.
pub struct LlmTranslator {
    client: reqwest::Client,
    /// Endpoint base, e.g. `https://api.openai.com/v1`.
    base_url: String,
    api_key: String,
    model: String,
    /// ISO 639-1 code meanings are translated into.
    target: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// The JSON object the model is asked to reply with.
#[derive(Debug, Serialize, Deserialize)]
struct ReplyPayload {
    #[serde(rename = "headwordEnglish")]
    headword_english: String,
    #[serde(rename = "headwordRussian")]
    headword_russian: String,
    meanings: Vec<String>,
}

impl LlmTranslator {
    /// Creates a provider for the given endpoint and model.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        target: impl Into<String>,
    ) -> LlmTranslator {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        LlmTranslator {
            client,
            base_url,
            api_key: api_key.into(),
            model: model.into(),
            target: target.into(),
        }
    }

    async fn complete(&self, input: &TranslationInput) -> Result<ReplyPayload, TranslateError> {
        let payload = serde_json::json!({
            "headword": input.headword,
            "meanings": input.meanings,
        });
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(input.source_language, &self.target),
                },
                ChatMessage {
                    role: "user",
                    content: payload.to_string(),
                },
            ],
        };

        debug!(model = %self.model, "requesting chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(TranslateError::Request)?;

        match response.error_for_status() {
            Ok(response) => {
                let reply: ChatResponse =
                    response.json().await.map_err(TranslateError::Request)?;
                let content = reply
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| {
                        TranslateError::UnexpectedResponse("reply carries no choices".to_string())
                    })?;

                parse_reply(&content)
            }
            Err(err) => Err(TranslateError::Request(err)),
        }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate_word(
        &self,
        input: &TranslationInput,
    ) -> Result<TranslationOutput, TranslateError> {
        let reply = self.complete(input).await?;

        Ok(TranslationOutput {
            headword_english: non_empty(reply.headword_english),
            headword_russian: non_empty(reply.headword_russian),
            meanings: reply.meanings.into_iter().map(non_empty).collect(),
        })
    }
}

fn system_prompt(source: SourceLanguage, target: &str) -> String {
    format!(
        "You are a dictionary translator. The user sends a JSON object with a \
         {language} headword and a list of dictionary meanings written in \
         {language}. Reply with ONLY a JSON object of the shape \
         {{\"headwordEnglish\": string, \"headwordRussian\": string, \
         \"meanings\": [string, ...]}}. Translate the headword into English \
         and Russian, and translate every meaning into the language with ISO \
         639-1 code {target:?}, keeping the order.",
        language = language_name(source),
    )
}

const fn language_name(language: SourceLanguage) -> &'static str {
    match language {
        SourceLanguage::Danish => "Danish",
        SourceLanguage::Spanish => "Spanish",
    }
}

/// Models occasionally leave a field empty instead of omitting it; an empty
/// translation must not overwrite anything.
fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Parses the model's reply into the expected payload.
fn parse_reply(content: &str) -> Result<ReplyPayload, TranslateError> {
    serde_json::from_str(strip_code_fence(content)).map_err(|err| {
        TranslateError::UnexpectedResponse(format!("reply is not the expected JSON object: {err}"))
    })
}

/// Strips a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    rest.trim()
}
