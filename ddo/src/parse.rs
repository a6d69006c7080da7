//! Field extraction for dictionary pages.
//!
//! Every function here is a pure function over a loaded [`Document`]; parsing
//! the same page twice yields the same result. Optional boxes return `None`
//! when absent, while markup that contradicts the known page format fails
//! with an [`Error`] so format regressions surface immediately instead of
//! producing silently wrong entries.

use regex::Regex;
use scraper::ElementRef;
use url::Url;

use crate::Error;
use crate::page::{self, Document};
use crate::types::{Definition, Entry, Variant};

/// Base URL that relative variant links are resolved against.
const LOOKUP_BASE_URL: &str = "https://ordnet.dk/ddo/ordbog";

/// Placeholder example for senses the dictionary lists without citations.
const PLACEHOLDER_EXAMPLE: &str = "-";

/// Characters accepted as terminal punctuation in example sentences.
const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Parses a dictionary page.
///
/// Returns `Ok(None)` when the page is the dictionary's "no results" layout,
/// which carries none of the entry markup at all.
///
/// # Errors
///
/// Fails when the input is empty or when a page that does carry entry markup
/// is missing a required element.
pub fn parse(html: &str) -> Result<Option<Entry>, Error> {
    let document = Document::parse(html)?;

    parse_document(&document)
}

/// Parses an already loaded [`Document`].
///
/// # Errors
///
/// Fails when a page that carries entry markup is missing a required element.
pub fn parse_document(document: &Document) -> Result<Option<Entry>, Error> {
    if document
        .try_find_first_by_class("div", "definitionBoxTop")
        .is_none()
    {
        return Ok(None);
    }

    let entry = Entry {
        headword: headword(document)?,
        part_of_speech: part_of_speech(document),
        endings: endings(document),
        pronunciation: pronunciation(document),
        sound_url: sound_url(document)?,
        definitions: definitions(document)?,
        variants: variants(document)?,
    };

    Ok(Some(entry))
}

/// Extracts the headword from the entry header.
///
/// Pages that collapse several numbered senses into one article wrap the
/// headword in a `diskret` span, which is unwrapped here. Superscript sense
/// numbers are presentation only and are stripped.
///
/// # Errors
///
/// Fails when the entry header or its match span is missing.
pub fn headword(document: &Document) -> Result<String, Error> {
    let top = document.find_first_by_class("div", "definitionBoxTop")?;
    let matched = page::select_first(top, "span.match")
        .ok_or_else(|| Error::MissingElement("span.match".into()))?;
    let inner = page::select_first(matched, "span.diskret").unwrap_or(matched);

    Ok(page::text_excluding_class(inner, "super"))
}

/// Extracts the word class line, e.g. `substantiv, fælleskøn`, when present.
#[must_use]
pub fn part_of_speech(document: &Document) -> Option<String> {
    let top = document.try_find_first_by_class("div", "definitionBoxTop")?;
    let pos = page::select_first(top, "span.tekstmedium")?;

    Some(page::normalized_text(pos))
}

/// Extracts the inflection line from the `id-boj` box, when present.
///
/// The line is a stream of text runs interleaved with `diskret` spans, and
/// two rules turn it into a `||`-separated list of alternatives:
///
/// * a `diskret`/`eller`/`diskret` triple is a pair of alternative forms and
///   collapses into the current segment as `first||second`;
/// * any other `diskret` span carries a sense label and starts a new segment.
#[must_use]
pub fn endings(document: &Document) -> Option<String> {
    let container = document.find_by_id("id-boj")?;
    let value = page::select_first(container, "span.tekstmedium")?;

    Some(join_endings(&endings_tokens(value)))
}

/// Extracts the IPA transcription from the pronunciation box, when present.
#[must_use]
pub fn pronunciation(document: &Document) -> Option<String> {
    let container = document.find_by_id("id-udt")?;
    let ipa = page::select_first(container, "span.lydskrift")?;

    Some(page::normalized_text(ipa))
}

/// Extracts the pronunciation audio link, when present.
///
/// # Errors
///
/// The dictionary serves pronunciation clips as MP3 files; a link to anything
/// else means the page format changed and fails with
/// [`Error::UnexpectedSoundUrl`].
pub fn sound_url(document: &Document) -> Result<Option<String>, Error> {
    let Some(container) = document.find_by_id("id-udt") else {
        return Ok(None);
    };
    let Some(anchor) = page::select_first(container, "a[href]") else {
        return Ok(None);
    };
    let href = anchor.attr("href").unwrap_or_default();

    if href.ends_with(".mp3") {
        Ok(Some(href.to_string()))
    } else {
        Err(Error::UnexpectedSoundUrl(href.to_string()))
    }
}

/// Extracts every sense on the page, flattened in document order.
///
/// Usage tags and example sentences are scoped to each sense's own indent
/// block so sibling senses never leak into one another. Examples get
/// terminal punctuation enforced, and a sense without any examples gets a
/// single `-` placeholder so the list is never empty.
///
/// # Errors
///
/// Fails when the definitions container is missing or holds no senses.
pub fn definitions(document: &Document) -> Result<Vec<Definition>, Error> {
    let container = definitions_container(document)?;
    let nodes = page::select_all(container, "span.definition");

    if nodes.is_empty() {
        return Err(Error::MissingElement("span.definition".into()));
    }

    Ok(nodes.into_iter().map(definition).collect())
}

/// Extracts related-word rows from the search result box.
///
/// The display text is the anchor's parent text so it keeps the trailing
/// word-class abbreviation. Zero rows is an ordinary outcome.
///
/// # Errors
///
/// Fails when a row's link cannot be resolved to an absolute URL.
pub fn variants(document: &Document) -> Result<Vec<Variant>, Error> {
    let Some(container) = document.try_find_first_by_class("div", "searchResultBox") else {
        return Ok(Vec::new());
    };

    let mut variants = Vec::new();

    for anchor in page::select_all(container, "a[href]") {
        let href = anchor.attr("href").unwrap_or_default();
        let parent = anchor.parent().and_then(ElementRef::wrap).unwrap_or(anchor);
        let raw: String = parent.text().collect();

        variants.push(Variant {
            word: variant_label(&raw),
            url: resolve_lookup_url(href)?,
        });
    }

    Ok(variants)
}

/// Normalizes a variant row's display text.
///
/// Whitespace runs collapse to single spaces, a bare sense number is wrapped
/// in parentheses (`høj 1` becomes `høj(1)`), and the non-breaking space that
/// marks a conjugated form pointing back to its lemma becomes ` -> `
/// (`skat\u{a0}skatte vb.` becomes `skat -> skatte vb.`).
#[must_use]
pub fn variant_label(text: &str) -> String {
    let whitespace = Regex::new(r"[ \t\r\n]+").expect("whitespace pattern");
    let sense_number = Regex::new(r" (\d+)\b").expect("sense number pattern");

    let collapsed = whitespace.replace_all(text, " ");
    let collapsed = collapsed.trim_matches([' ', '\u{00A0}']);
    let numbered = sense_number.replace_all(collapsed, "($1)");

    numbered.replace('\u{00A0}', " -> ")
}

fn definitions_container(document: &Document) -> Result<ElementRef<'_>, Error> {
    // Regular entries keep their senses in `content-betydninger`. Fixed
    // expressions ("Faste udtryk") render them inside the parent article
    // instead, some with an extra wrapper level that the descendant-scoped
    // selection below sees through.
    document
        .find_by_id("content-betydninger")
        .or_else(|| document.find_by_id("content-artikel"))
        .ok_or_else(|| Error::MissingElement("#content-betydninger".into()))
}

fn definition(node: ElementRef<'_>) -> Definition {
    let meaning = page::normalized_text(node);
    let indent = page::ancestor_with_class(node, "div", "definitionIndent");

    let tag = indent.and_then(|indent| {
        page::direct_child_with_class(indent, "span", "stempel").map(page::normalized_text)
    });

    let mut examples: Vec<String> = indent.map(scoped_examples).unwrap_or_default();

    if examples.is_empty() {
        examples.push(PLACEHOLDER_EXAMPLE.to_string());
    }

    Definition {
        meaning,
        tag,
        examples,
    }
}

/// Example sentences belonging to `indent` itself, skipping any that sit in
/// a nested indent block of a sub-sense.
fn scoped_examples(indent: ElementRef<'_>) -> Vec<String> {
    page::select_all(indent, "span.citat")
        .into_iter()
        .filter(|citat| {
            page::ancestor_with_class(*citat, "div", "definitionIndent")
                .is_some_and(|owner| owner.id() == indent.id())
        })
        .map(|citat| ensure_terminal_punctuation(page::normalized_text(citat)))
        .collect()
}

/// Appends a period when an example does not already end in terminal
/// punctuation.
fn ensure_terminal_punctuation(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with(TERMINAL_PUNCTUATION) {
        text.push('.');
    }

    text
}

/// A lexical piece of the inflection line.
#[derive(Debug)]
enum EndingsToken {
    /// Plain text between spans.
    Text(String),
    /// The contents of a `diskret` span.
    Diskret(String),
}

fn endings_tokens(value: ElementRef<'_>) -> Vec<EndingsToken> {
    let mut tokens = Vec::new();

    for node in value.children() {
        if let Some(text) = node.value().as_text() {
            let text = page::normalize_whitespace(text);
            if !text.is_empty() {
                tokens.push(EndingsToken::Text(text));
            }
        } else if let Some(element) = ElementRef::wrap(node) {
            let text = page::normalized_text(element);
            if text.is_empty() {
                continue;
            }

            if element.value().classes().any(|c| c == "diskret") {
                tokens.push(EndingsToken::Diskret(text));
            } else {
                tokens.push(EndingsToken::Text(text));
            }
        }
    }

    tokens
}

fn join_endings(tokens: &[EndingsToken]) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut index = 0;

    while index < tokens.len() {
        if let (
            Some(EndingsToken::Diskret(first)),
            Some(EndingsToken::Text(infix)),
            Some(EndingsToken::Diskret(second)),
        ) = (
            tokens.get(index),
            tokens.get(index + 1),
            tokens.get(index + 2),
        ) && infix == "eller"
        {
            push_piece(&mut current, &format!("{first}||{second}"));
            index += 3;
            continue;
        }

        match &tokens[index] {
            EndingsToken::Diskret(label) => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                current.push_str(label);
            }
            EndingsToken::Text(text) => push_piece(&mut current, text),
        }

        index += 1;
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments.join("||")
}

/// Appends `piece` to `segment`, space-separated unless the piece starts
/// with punctuation that glues to the previous word.
fn push_piece(segment: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }

    if !segment.is_empty() && !piece.starts_with([',', ';', '.']) {
        segment.push(' ');
    }

    segment.push_str(piece);
}

fn resolve_lookup_url(href: &str) -> Result<String, Error> {
    let base = Url::parse(LOOKUP_BASE_URL).expect("base lookup url");
    let url = base.join(href).map_err(|source| Error::InvalidVariantUrl {
        href: href.to_string(),
        source,
    })?;

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRILLSPYD: &str = include_str!("../tests/fixtures/grillspyd.html");
    const HAJ: &str = include_str!("../tests/fixtures/haj.html");
    const HOEJ: &str = include_str!("../tests/fixtures/hoej.html");
    const PAA_HOEJTRYK: &str = include_str!("../tests/fixtures/paa_hoejtryk.html");
    const TIL_SOES: &str = include_str!("../tests/fixtures/til_soes.html");

    fn entry(html: &str) -> Entry {
        parse(html)
            .expect("page should parse")
            .expect("page should contain an entry")
    }

    #[test]
    fn test_parse_grillspyd() {
        let entry = entry(GRILLSPYD);

        assert_eq!(entry.headword, "grillspyd");
        assert_eq!(entry.part_of_speech.as_deref(), Some("substantiv, intetkøn"));
        assert_eq!(entry.endings.as_deref(), Some("-det||-et, -dene"));
        assert_eq!(entry.pronunciation.as_deref(), Some("[ˈɡʁelˌsbyðˀ]"));
        assert_eq!(
            entry.sound_url.as_deref(),
            Some("https://static.ordnet.dk/mp3/11023/11023271_1.mp3")
        );

        assert_eq!(entry.definitions.len(), 1);
        assert_eq!(
            entry.definitions[0].meaning,
            "spids pind af træ eller metal til at stikke gennem kød og grøntsager under grilning"
        );
        assert_eq!(entry.definitions[0].tag, None);
        assert_eq!(
            entry.definitions[0].examples,
            vec!["marinerede grillspyd med svinekød og grøntsager."]
        );
        assert!(entry.variants.is_empty());
    }

    #[test]
    fn test_parse_haj() {
        let entry = entry(HAJ);

        assert_eq!(entry.headword, "haj");
        assert_eq!(entry.definitions.len(), 3);

        let tags: Vec<_> = entry
            .definitions
            .iter()
            .map(|definition| definition.tag.as_deref())
            .collect();
        assert_eq!(tags, vec![None, Some("slang"), Some("slang")]);

        assert_eq!(
            entry.sound_url.as_deref(),
            Some("https://static.ordnet.dk/mp3/11019/11019539_1.mp3")
        );
    }

    #[test]
    fn test_haj_examples_stay_with_their_sense() {
        let entry = entry(HAJ);

        assert_eq!(
            entry.definitions[0].examples,
            vec!["Det er forbudt at fiske hajer i EU-farvande."]
        );
        assert_eq!(
            entry.definitions[1].examples,
            vec!["de store hajer på ejendomsmarkedet tjener millioner."]
        );
        assert_eq!(
            entry.definitions[2].examples,
            vec!["han er lidt af en haj til billard."]
        );
    }

    #[test]
    fn test_parse_hoej_strips_superscript() {
        let entry = entry(HOEJ);

        assert_eq!(entry.headword, "høj");
    }

    #[test]
    fn test_parse_hoej_multi_sense_endings() {
        let entry = entry(HOEJ);

        assert_eq!(
            entry.endings.as_deref(),
            Some("i betydning 1: -en, -e, -ene||i betydning 2: -en, -er, -erne")
        );
    }

    #[test]
    fn test_parse_hoej_variants() {
        let entry = entry(HOEJ);
        let words: Vec<_> = entry
            .variants
            .iter()
            .map(|variant| variant.word.as_str())
            .collect();

        assert_eq!(words, vec!["høj(1) adj.", "høj(2) sb.", "høj -> højne vb."]);
        assert_eq!(
            entry.variants[0].url,
            "https://ordnet.dk/ddo/ordbog?select=h%C3%B8j,1&query=h%C3%B8j"
        );
    }

    #[test]
    fn test_parse_fixed_expression() {
        let entry = entry(PAA_HOEJTRYK);

        assert_eq!(entry.headword, "på højtryk");
        assert_eq!(entry.part_of_speech, None);
        assert_eq!(entry.endings, None);
        assert_eq!(entry.sound_url, None);

        assert_eq!(entry.definitions.len(), 1);
        assert_eq!(entry.definitions[0].tag.as_deref(), Some("overført"));
        assert_eq!(entry.definitions[0].examples, vec!["-"]);
    }

    #[test]
    fn test_parse_fixed_expression_with_nested_article() {
        let entry = entry(TIL_SOES);

        assert_eq!(entry.headword, "til søs");
        assert_eq!(entry.definitions.len(), 1);
        assert_eq!(
            entry.definitions[0].examples,
            vec!["han havde været til søs i mange år."]
        );
    }

    #[test]
    fn test_parse_no_results_page() {
        let html = r#"<!DOCTYPE html>
            <html><body>
              <div id="content"><p>Der er ingen resultater med "xyzzy".</p></div>
            </body></html>"#;

        assert_eq!(parse(html).unwrap(), None);
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(matches!(parse(""), Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let document = Document::parse(HAJ).unwrap();

        let first = parse_document(&document).unwrap();
        let second = parse_document(&document).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sound_url_must_point_to_mp3() {
        let html = r#"<html><body>
            <div class="definitionBox" id="id-udt">
              <span class="stempel">Udtale</span>
              <a href="https://static.ordnet.dk/wav/11019539.wav">udtale</a>
            </div>
        </body></html>"#;
        let document = Document::parse(html).unwrap();

        assert!(matches!(
            sound_url(&document),
            Err(Error::UnexpectedSoundUrl(url)) if url.ends_with(".wav")
        ));
    }

    #[test]
    fn test_eller_pair_merges_into_one_segment() {
        let html = r#"<html><body>
            <div class="definitionBox" id="id-boj">
              <span class="stempel">Bøjning</span>
              <span class="tekstmedium">
                <span class="diskret">-det</span> eller <span class="diskret">-et</span>, -dene
              </span>
            </div>
        </body></html>"#;
        let document = Document::parse(html).unwrap();

        let endings = endings(&document).unwrap();
        assert_eq!(endings, "-det||-et, -dene");
        assert_eq!(endings.matches("||").count(), 1);
    }

    #[test]
    fn test_examples_scoped_to_their_own_indent() {
        let html = r#"<html><body>
            <div id="content-betydninger">
              <div class="definitionIndent">
                <span class="definition">outer sense</span>
                <span class="tekstmedium"><span class="citat">outer example</span></span>
                <div class="definitionIndent">
                  <span class="definition">inner sense</span>
                  <span class="citat">inner example</span>
                </div>
              </div>
            </div>
        </body></html>"#;
        let document = Document::parse(html).unwrap();

        let definitions = definitions(&document).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].examples, vec!["outer example."]);
        assert_eq!(definitions[1].examples, vec!["inner example."]);
    }

    #[test]
    fn test_variant_label() {
        assert_eq!(variant_label("  høj \n 1   adj."), "høj(1) adj.");
        assert_eq!(variant_label("skat\u{00A0}skatte vb."), "skat -> skatte vb.");
        assert_eq!(variant_label("hajfisk sb."), "hajfisk sb.");
    }

    #[test]
    fn test_ensure_terminal_punctuation() {
        assert_eq!(ensure_terminal_punctuation("en stor haj".into()), "en stor haj.");
        assert_eq!(ensure_terminal_punctuation("en haj!".into()), "en haj!");
        assert_eq!(ensure_terminal_punctuation("er det en haj?".into()), "er det en haj?");
    }

    #[test]
    fn test_parse_query_fixtures() {
        let fixtures = std::fs::read_dir("tests/fixtures").expect("fixtures directory");

        for fixture in fixtures {
            let path = fixture.expect("fixture entry").path();
            let html = std::fs::read_to_string(&path).expect("fixture contents");

            let entry = parse(&html)
                .unwrap_or_else(|err| panic!("{} should parse: {err}", path.display()))
                .unwrap_or_else(|| panic!("{} should contain an entry", path.display()));

            assert!(!entry.definitions.is_empty(), "{}", path.display());
            for definition in &entry.definitions {
                assert!(!definition.examples.is_empty(), "{}", path.display());
            }
        }
    }
}
