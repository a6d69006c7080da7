//! The canonical word model.
//!
//! Both dictionaries fold into this one shape, so clients never need to know
//! which site a word came from. Everything here is plain data, assembled once
//! per lookup; the serialized form uses camelCase field names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The dictionary a word is looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Den Danske Ordbog (ordnet.dk)
    Danish,
    /// SpanishDict (spanishdict.com)
    Spanish,
}

impl SourceLanguage {
    /// Returns the other supported language.
    ///
    /// Used by the lookup retry heuristics when the requested dictionary has
    /// no match.
    #[must_use]
    pub const fn other(self) -> SourceLanguage {
        match self {
            SourceLanguage::Danish => SourceLanguage::Spanish,
            SourceLanguage::Spanish => SourceLanguage::Danish,
        }
    }

    /// Returns the ISO 639-1 code understood by translation providers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            SourceLanguage::Danish => "da",
            SourceLanguage::Spanish => "es",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Danish => f.write_str("danish"),
            SourceLanguage::Spanish => f.write_str("spanish"),
        }
    }
}

/// The error returned when parsing an unknown language name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported language {0:?} - expected \"danish\" or \"spanish\"")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for SourceLanguage {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<SourceLanguage, UnsupportedLanguage> {
        match s.to_ascii_lowercase().as_str() {
            "danish" | "da" => Ok(SourceLanguage::Danish),
            "spanish" | "es" => Ok(SourceLanguage::Spanish),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

/// A dictionary word with all of its definitions and variations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// The word as spelled by the dictionary entry.
    pub word: String,
    /// The dictionary the entry came from.
    pub source_language: SourceLanguage,
    /// Absolute URL of the pronunciation clip, if the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    /// Suggested download name for the clip, if the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file_name: Option<String>,
    /// The definitions of the word, one per word-form cluster.
    pub definitions: Vec<Definition>,
    /// Related words the client can follow up on.
    pub variations: Vec<Variant>,
}

/// One word-form cluster with its grammar and senses.
///
/// Danish entries always have exactly one definition; SpanishDict entries
/// have one per subheadword (`afeitar` and `afeitarse` for example).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// The headword of this cluster, with optional translations.
    pub headword: Headword,
    /// Part of speech, verbatim from the dictionary. Empty when unlisted.
    pub part_of_speech: String,
    /// Inflected forms. Empty when the dictionary lists none.
    pub endings: String,
    /// The senses of the cluster, grouped by usage context.
    pub contexts: Vec<Context>,
}

/// A headword and its translations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headword {
    /// The headword in the source language.
    pub original: String,
    /// English translation, filled in by augmentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    /// Russian translation, filled in by augmentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub russian: Option<String>,
}

/// A group of meanings that share a usage context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// English context label such as `(vehicle)`. Empty for Danish entries.
    pub context_en: String,
    /// Position of the context within the definition, starting at `"1"`.
    pub position: String,
    /// The meanings in this context.
    pub meanings: Vec<Meaning>,
}

/// A single sense of a word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    /// The meaning text in the dictionary's own words.
    pub original: String,
    /// Translated meaning text, filled in by augmentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Position within the context: `"a"`, `"b"`, … for Spanish entries and
    /// `"1"`, `"2"`, … for Danish ones.
    pub alphabetical_position: String,
    /// Usage tag such as `slang`, when the dictionary labels the sense.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Absolute URL of an illustration, when the dictionary has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Example sentences. Never empty; a sense without examples carries the
    /// `-` placeholder.
    pub examples: Vec<Example>,
}

/// An example sentence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    /// The sentence in the source language.
    pub original: String,
    /// Translated sentence, when the dictionary provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// A related word and the URL it resolves at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Display text for the related word.
    pub word: String,
    /// Absolute dictionary URL that looks the related word up.
    pub url: String,
}
