//! Structured output of a parsed dictionary page.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parsed dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// The headword, without superscript sense numbers.
    pub headword: String,
    /// The word class line, e.g. `substantiv, fælleskøn`.
    pub part_of_speech: Option<String>,
    /// The inflection line, with alternatives joined by `||`.
    pub endings: Option<String>,
    /// The IPA transcription.
    pub pronunciation: Option<String>,
    /// Link to the pronunciation clip. Always an MP3 when present.
    pub sound_url: Option<String>,
    /// Every sense on the page, flattened in document order.
    pub definitions: Vec<Definition>,
    /// Related words from the search result box.
    pub variants: Vec<Variant>,
}

/// A single sense of a dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Definition {
    /// The definition text.
    pub meaning: String,
    /// Usage label, e.g. `slang` or `overført`.
    pub tag: Option<String>,
    /// Example sentences. Never empty; a sense without examples carries a
    /// single `-` placeholder.
    pub examples: Vec<String>,
}

/// A related word linked from the search result box.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variant {
    /// Display text, e.g. `høj(1) adj.` or `skat -> skatte vb.`.
    pub word: String,
    /// Absolute lookup URL for the variant.
    pub url: String,
}
