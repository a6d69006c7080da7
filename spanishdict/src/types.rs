//! Structured output of a parsed word page.

use serde::{Deserialize, Serialize};

/// A parsed word entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The headword as displayed by the site.
    pub headword: String,
    /// Link to the selected pronunciation video, when one was recorded.
    pub sound_url: Option<String>,
    /// One definition per word-form cluster, e.g. `afeitar` and `afeitarse`.
    pub definitions: Vec<Definition>,
    /// Follow-up lookups, one per word-form cluster.
    pub variants: Vec<Variant>,
}

/// The senses of one word form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The word form, e.g. `afeitarse`.
    pub word: String,
    /// English word class name. Empty when the site lists none.
    pub part_of_speech: String,
    /// The senses, in presentation order.
    pub contexts: Vec<Context>,
}

/// One sense with its translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// 1-based position within the definition, as a string.
    pub position: String,
    /// Combined context label, e.g. `(colloquial) (vehicle) (Latin America)`.
    pub label: String,
    /// The translations of this sense.
    pub meanings: Vec<Meaning>,
}

/// A single translation of a sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    /// Display text with any register label and gloss folded in, e.g.
    /// `automobile (formal)`.
    pub text: String,
    /// Alphabetical position within the context: `a`, `b`, …
    pub letter: String,
    /// Absolute illustration URL with its path re-encoded.
    pub image_url: Option<String>,
    /// Bilingual example sentences. May be empty.
    pub examples: Vec<Example>,
}

/// A bilingual example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// The Spanish sentence.
    pub spanish: String,
    /// Its English translation.
    pub english: String,
}

/// A follow-up lookup for a word form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Display text, e.g. `afeitarse (reflexive verb)`.
    pub word: String,
    /// Absolute translate-page URL.
    pub url: String,
}
