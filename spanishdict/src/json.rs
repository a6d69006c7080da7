//! The subset of the embedded component data that the parser consumes.
//!
//! The site ships one large JavaScript object with every page; only the
//! header (headword and pronunciations) and the `neodict` dictionary entry
//! matter here. Unknown fields are ignored so cosmetic additions upstream do
//! not break deserialization.

use serde::Deserialize;

/// Top-level component data object.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentData {
    /// Result card header; absent when the site rendered its fallback
    /// translation widget instead of a dictionary entry.
    #[serde(rename = "resultCardHeaderProps")]
    pub header: Option<ResultCardHeader>,
    /// Dictionary results; absent for non-dictionary pages.
    #[serde(rename = "sdDictionaryResultsProps")]
    pub dictionary: Option<DictionaryResults>,
}

/// Props of the result card header.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultCardHeader {
    /// Headword block with pronunciations.
    #[serde(rename = "headwordAndQuickdefsProps")]
    pub headword_and_quickdefs: HeadwordAndQuickdefs,
}

/// Headword block.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadwordAndQuickdefs {
    /// The looked-up headword.
    pub headword: Headword,
}

/// The headword and its pronunciation recordings.
#[derive(Debug, Clone, Deserialize)]
pub struct Headword {
    /// Headword as displayed, e.g. `afeitar`.
    #[serde(rename = "displayText")]
    pub display_text: String,
    /// Pronunciation recordings in several regional accents.
    #[serde(default)]
    pub pronunciations: Vec<Pronunciation>,
}

/// One pronunciation recording.
#[derive(Debug, Clone, Deserialize)]
pub struct Pronunciation {
    /// Accent region, e.g. `SPAIN` or `LATAM`.
    #[serde(default)]
    pub region: String,
    /// Whether a speaker video was recorded. Entries without one play a
    /// synthetic voice.
    #[serde(rename = "hasVideo", default)]
    pub has_video: bool,
    /// Link to the speaker video.
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
}

/// Props of the dictionary results pane.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryResults {
    /// The dictionary entry, when one exists for the queried word.
    pub entry: Option<DictionaryEntry>,
}

/// A dictionary entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    /// Word-form clusters, e.g. `afeitar` and `afeitarse`.
    #[serde(default)]
    pub neodict: Vec<NeodictGroup>,
}

/// One word-form cluster of the entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NeodictGroup {
    /// The word form this cluster describes.
    pub subheadword: String,
    /// Sub-groups per word class; most words carry one, some carry two.
    #[serde(rename = "posGroups", default)]
    pub pos_groups: Vec<PosGroup>,
}

/// Senses sharing one word class.
#[derive(Debug, Clone, Deserialize)]
pub struct PosGroup {
    /// The word class.
    pub pos: Option<Pos>,
    /// The senses of this group.
    #[serde(default)]
    pub senses: Vec<Sense>,
}

/// A word class.
#[derive(Debug, Clone, Deserialize)]
pub struct Pos {
    /// English word class name, e.g. `transitive verb`.
    #[serde(rename = "nameEn", default)]
    pub name_en: String,
}

/// One sense of a word form.
#[derive(Debug, Clone, Deserialize)]
pub struct Sense {
    /// English context phrase, e.g. `vehicle`.
    #[serde(rename = "contextEn", default)]
    pub context_en: String,
    /// Register label, e.g. `colloquial`.
    #[serde(rename = "registerLabel", default)]
    pub register_label: Option<String>,
    /// Regions the sense is limited to, e.g. `Latin America`.
    #[serde(default)]
    pub regions: Vec<String>,
    /// Translations of the sense, in presentation order.
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// One translation of a sense.
#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    /// The translated text, e.g. `to shave`.
    #[serde(default)]
    pub translation: String,
    /// English gloss narrowing this particular translation.
    #[serde(rename = "contextEn", default)]
    pub context_en: Option<String>,
    /// Register label for this particular translation.
    #[serde(rename = "registerLabel", default)]
    pub register_label: Option<String>,
    /// Illustration path, when the sense has one.
    #[serde(rename = "imagePath", default)]
    pub image_path: Option<String>,
    /// Bilingual example sentences.
    #[serde(default)]
    pub examples: Vec<TranslationExample>,
}

/// A bilingual example sentence.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationExample {
    /// The Spanish sentence.
    #[serde(rename = "textEs", default)]
    pub text_es: String,
    /// Its English translation.
    #[serde(rename = "textEn", default)]
    pub text_en: String,
}
