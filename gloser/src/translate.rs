//! Translation augmentation.
//!
//! Lookups come back untranslated; a [`Translator`] fills in the optional
//! headword and meaning translations afterwards. The core never builds
//! provider requests itself - it derives one [`TranslationInput`] per
//! definition and merges the [`TranslationOutput`] back into the model, so
//! providers stay interchangeable.

pub mod google;
pub mod llm;

use async_trait::async_trait;

use crate::word::{Definition, SourceLanguage, Word};

/// Errors that can occur while translating.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The provider request failed.
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    /// The provider answered something other than the expected shape.
    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

/// Everything a provider needs to translate one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationInput {
    /// The language the word came from.
    pub source_language: SourceLanguage,
    /// The definition's headword.
    pub headword: String,
    /// Every meaning of the definition, flattened across contexts in order.
    pub meanings: Vec<String>,
}

impl TranslationInput {
    /// Derives the input for one definition.
    #[must_use]
    pub fn from_definition(language: SourceLanguage, definition: &Definition) -> TranslationInput {
        TranslationInput {
            source_language: language,
            headword: definition.headword.original.clone(),
            meanings: definition
                .contexts
                .iter()
                .flat_map(|context| &context.meanings)
                .map(|meaning| meaning.original.clone())
                .collect(),
        }
    }
}

/// Translated text for one definition, index-aligned with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationOutput {
    /// English translation of the headword.
    pub headword_english: Option<String>,
    /// Russian translation of the headword.
    pub headword_russian: Option<String>,
    /// One translation per input meaning; `None` leaves a meaning untouched.
    pub meanings: Vec<Option<String>>,
}

/// Translates definitions of the canonical word model.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates one definition worth of text.
    async fn translate_word(
        &self,
        input: &TranslationInput,
    ) -> Result<TranslationOutput, TranslateError>;
}

/// Fills in the translation fields of `word` in place.
///
/// Definitions are translated independently; each output's meaning list is
/// merged back in the same flattened order the input was derived in.
///
/// # Errors
///
/// Fails when the provider fails; definitions already processed keep their
/// translations.
pub async fn augment(word: &mut Word, translator: &dyn Translator) -> Result<(), TranslateError> {
    let language = word.source_language;

    for definition in &mut word.definitions {
        let input = TranslationInput::from_definition(language, definition);
        let output = translator.translate_word(&input).await?;

        merge(definition, output);
    }

    Ok(())
}

/// Merges a provider's output back into a definition.
fn merge(definition: &mut Definition, output: TranslationOutput) {
    if output.headword_english.is_some() {
        definition.headword.english = output.headword_english;
    }
    if output.headword_russian.is_some() {
        definition.headword.russian = output.headword_russian;
    }

    let meanings = definition
        .contexts
        .iter_mut()
        .flat_map(|context| context.meanings.iter_mut());

    for (meaning, translation) in meanings.zip(output.meanings) {
        if translation.is_some() {
            meaning.translation = translation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{Context, Example, Headword, Meaning};

    /// Upper-cases everything it is given, prefixing headwords per language.
    struct StubTranslator;

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate_word(
            &self,
            input: &TranslationInput,
        ) -> Result<TranslationOutput, TranslateError> {
            Ok(TranslationOutput {
                headword_english: Some(format!("en:{}", input.headword)),
                headword_russian: Some(format!("ru:{}", input.headword)),
                meanings: input
                    .meanings
                    .iter()
                    .map(|meaning| Some(meaning.to_uppercase()))
                    .collect(),
            })
        }
    }

    fn meaning(original: &str, position: &str) -> Meaning {
        Meaning {
            original: original.to_string(),
            translation: None,
            alphabetical_position: position.to_string(),
            tag: None,
            image_url: None,
            examples: vec![Example {
                original: "-".to_string(),
                translation: None,
            }],
        }
    }

    fn word() -> Word {
        Word {
            word: "coche".to_string(),
            source_language: SourceLanguage::Spanish,
            sound_url: None,
            sound_file_name: None,
            definitions: vec![Definition {
                headword: Headword {
                    original: "coche".to_string(),
                    english: None,
                    russian: None,
                },
                part_of_speech: "masculine noun".to_string(),
                endings: String::new(),
                contexts: vec![
                    Context {
                        context_en: "(vehicle)".to_string(),
                        position: "1".to_string(),
                        meanings: vec![meaning("car", "a"), meaning("automobile", "b")],
                    },
                    Context {
                        context_en: "(stroller)".to_string(),
                        position: "2".to_string(),
                        meanings: vec![meaning("baby carriage", "a")],
                    },
                ],
            }],
            variations: vec![],
        }
    }

    #[test]
    fn test_input_flattens_meanings_across_contexts() {
        let word = word();
        let input = TranslationInput::from_definition(word.source_language, &word.definitions[0]);

        assert_eq!(input.headword, "coche");
        assert_eq!(input.meanings, vec!["car", "automobile", "baby carriage"]);
    }

    #[tokio::test]
    async fn test_augment_merges_in_flattened_order() {
        let mut word = word();

        augment(&mut word, &StubTranslator).await.unwrap();

        let definition = &word.definitions[0];
        assert_eq!(definition.headword.english.as_deref(), Some("en:coche"));
        assert_eq!(definition.headword.russian.as_deref(), Some("ru:coche"));
        assert_eq!(
            definition.contexts[0].meanings[0].translation.as_deref(),
            Some("CAR")
        );
        assert_eq!(
            definition.contexts[0].meanings[1].translation.as_deref(),
            Some("AUTOMOBILE")
        );
        assert_eq!(
            definition.contexts[1].meanings[0].translation.as_deref(),
            Some("BABY CARRIAGE")
        );
    }

    #[test]
    fn test_merge_leaves_tail_untouched_on_short_output() {
        let mut word = word();
        let output = TranslationOutput {
            headword_english: None,
            headword_russian: None,
            meanings: vec![Some("машина".to_string())],
        };

        merge(&mut word.definitions[0], output);

        let definition = &word.definitions[0];
        assert_eq!(definition.headword.english, None);
        assert_eq!(
            definition.contexts[0].meanings[0].translation.as_deref(),
            Some("машина")
        );
        assert_eq!(definition.contexts[0].meanings[1].translation, None);
        assert_eq!(definition.contexts[1].meanings[0].translation, None);
    }
}
