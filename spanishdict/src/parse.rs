//! Extraction of the embedded component data and its projection into an
//! [`Entry`].
//!
//! The site renders every page from one JavaScript object assigned to a
//! global in an inline script. Parsing is a structural scan for that script
//! followed by a plain JSON deserialization; the projection below is pure,
//! so parsing the same page twice yields the same entry.

use scraper::{Html, Selector};

use crate::Error;
use crate::json::{ComponentData, NeodictGroup, Pronunciation, Sense, Translation};
use crate::types::{Context, Definition, Entry, Example, Meaning, Variant};

/// The JavaScript global that carries the embedded dictionary data.
const COMPONENT_DATA_MARKER: &str = "window.SD_COMPONENT_DATA";

/// Base URL for variant follow-up lookups.
const TRANSLATE_BASE_URL: &str = "https://www.spanishdict.com/translate/";

/// Base URL that relative illustration paths are served from.
const IMAGE_BASE_URL: &str = "https://www.spanishdict.com";

/// Accent regions in preference order.
const SOUND_REGIONS: [&str; 2] = ["SPAIN", "LATAM"];

/// Parses a word page.
///
/// Returns `Ok(None)` when the page carries no dictionary entry for the
/// word, i.e. the site fell back to its translation widget.
///
/// # Errors
///
/// Fails when no script on the page carries the component data, or when the
/// data does not deserialize.
pub fn parse(html: &str) -> Result<Option<Entry>, Error> {
    let data = extract_component_data(html)?;

    Ok(entry_from_data(&data))
}

/// Locates the component data script and deserializes its payload.
///
/// # Errors
///
/// Fails with [`Error::MissingComponentData`] when no script carries the
/// assignment, or [`Error::Json`] when the payload does not deserialize; the
/// latter names the path of the offending field.
pub fn extract_component_data(html: &str) -> Result<ComponentData, Error> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").expect("script selector");

    let json = document
        .select(&selector)
        .find_map(|script| {
            let text: String = script.text().collect();
            component_data_json(&text).map(ToOwned::to_owned)
        })
        .ok_or(Error::MissingComponentData)?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let data = serde_path_to_error::deserialize(&mut deserializer)?;

    Ok(data)
}

/// Strips the assignment prefix and trailing semicolon from the component
/// data script, leaving the raw JSON object.
fn component_data_json(script: &str) -> Option<&str> {
    let rest = script.trim().strip_prefix(COMPONENT_DATA_MARKER)?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let rest = rest.trim();

    Some(rest.strip_suffix(';').unwrap_or(rest).trim_end())
}

/// Projects component data into an [`Entry`].
///
/// Returns `None` when the data carries no dictionary entry: the header or
/// dictionary props are absent, or the entry lists no word forms.
#[must_use]
pub fn entry_from_data(data: &ComponentData) -> Option<Entry> {
    let headword = &data.header.as_ref()?.headword_and_quickdefs.headword;
    let neodict = &data.dictionary.as_ref()?.entry.as_ref()?.neodict;

    if neodict.is_empty() {
        return None;
    }

    Some(Entry {
        headword: headword.display_text.clone(),
        sound_url: sound_url(&headword.pronunciations).map(ToOwned::to_owned),
        definitions: neodict.iter().map(definition).collect(),
        variants: neodict.iter().map(variant).collect(),
    })
}

/// Picks the pronunciation recording to use as the sound source.
///
/// Castilian recordings win over Latin American ones; entries without a
/// speaker video play a synthetic voice and are never used.
#[must_use]
pub fn sound_url(pronunciations: &[Pronunciation]) -> Option<&str> {
    SOUND_REGIONS.iter().find_map(|region| {
        pronunciations
            .iter()
            .find(|pronunciation| pronunciation.region == *region && pronunciation.has_video)
            .and_then(|pronunciation| pronunciation.video_url.as_deref())
    })
}

/// Builds a context label out of the optional register label, the English
/// context phrase and an optional region list, in that order, each
/// parenthesized: `(colloquial) (vehicle) (Latin America)`.
#[must_use]
pub fn context_label(sense: &Sense) -> String {
    let mut parts = Vec::new();

    if let Some(register) = non_empty(sense.register_label.as_deref()) {
        parts.push(format!("({register})"));
    }
    if !sense.context_en.is_empty() {
        parts.push(format!("({})", sense.context_en));
    }
    if !sense.regions.is_empty() {
        parts.push(format!("({})", sense.regions.join(", ")));
    }

    parts.join(" ")
}

/// Returns the alphabetical position for a translation offset: `a`, `b`, …,
/// `z`, then `aa`, `ab`, … for the improbable overflow.
#[must_use]
pub fn letter(offset: usize) -> String {
    let mut remaining = offset;
    let mut out = String::new();

    loop {
        out.insert(0, char::from(b'a' + (remaining % 26) as u8));
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }

    out
}

/// Re-encodes an illustration path with a fixed escape set.
///
/// The path is percent-decoded first, then commas, semicolons, apostrophes,
/// parentheses, spaces and percent signs are re-escaped, so the result is
/// the same no matter how the input mixed literal and encoded characters,
/// and applying this twice is a no-op. Relative paths are made absolute.
#[must_use]
pub fn image_url(path: &str) -> String {
    let decoded = urlencoding::decode_binary(path.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let mut encoded = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        match ch {
            ',' => encoded.push_str("%2C"),
            ';' => encoded.push_str("%3B"),
            '\'' => encoded.push_str("%27"),
            '(' => encoded.push_str("%28"),
            ')' => encoded.push_str("%29"),
            ' ' => encoded.push_str("%20"),
            '%' => encoded.push_str("%25"),
            _ => encoded.push(ch),
        }
    }

    if encoded.starts_with('/') {
        format!("{IMAGE_BASE_URL}{encoded}")
    } else {
        encoded
    }
}

fn definition(group: &NeodictGroup) -> Definition {
    let contexts = group
        .pos_groups
        .iter()
        .flat_map(|pos_group| &pos_group.senses)
        .enumerate()
        .map(|(index, sense)| context(index, sense))
        .collect();

    Definition {
        word: group.subheadword.clone(),
        part_of_speech: group_part_of_speech(group).to_string(),
        contexts,
    }
}

fn context(index: usize, sense: &Sense) -> Context {
    let meanings = sense
        .translations
        .iter()
        .enumerate()
        .map(|(offset, translation)| meaning(offset, translation))
        .collect();

    Context {
        position: (index + 1).to_string(),
        label: context_label(sense),
        meanings,
    }
}

fn meaning(offset: usize, translation: &Translation) -> Meaning {
    Meaning {
        text: display_text(translation),
        letter: letter(offset),
        image_url: translation.image_path.as_deref().map(image_url),
        examples: translation
            .examples
            .iter()
            .map(|example| Example {
                spanish: example.text_es.clone(),
                english: example.text_en.clone(),
            })
            .collect(),
    }
}

/// The translated text with any register label and English gloss appended in
/// trailing parentheses.
fn display_text(translation: &Translation) -> String {
    let mut text = translation.translation.clone();

    if let Some(register) = non_empty(translation.register_label.as_deref()) {
        text.push_str(&format!(" ({register})"));
    }
    if let Some(gloss) = non_empty(translation.context_en.as_deref()) {
        text.push_str(&format!(" ({gloss})"));
    }

    text
}

fn variant(group: &NeodictGroup) -> Variant {
    let part_of_speech = group_part_of_speech(group);
    let word = if part_of_speech.is_empty() {
        group.subheadword.clone()
    } else {
        format!("{} ({part_of_speech})", group.subheadword)
    };

    Variant {
        word,
        url: format!(
            "{TRANSLATE_BASE_URL}{}",
            urlencoding::encode(&group.subheadword)
        ),
    }
}

fn group_part_of_speech(group: &NeodictGroup) -> &str {
    group
        .pos_groups
        .first()
        .and_then(|pos_group| pos_group.pos.as_ref())
        .map_or("", |pos| pos.name_en.as_str())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
