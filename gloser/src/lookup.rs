//! Word lookup orchestration.
//!
//! A lookup turns a request into an ordered list of attempts, downloads each
//! page through the [`PageFetcher`] collaborator and folds the first match
//! into the canonical [`Word`] model. The site parsers stay pure; all retry
//! policy lives here.

use tracing::debug;
use url::Url;

use crate::fetch::{FetchError, PageFetcher};
use crate::word::{
    Context, Definition, Example, Headword, Meaning, SourceLanguage, Variant, Word,
};

/// Base URL for Den Danske Ordbog queries.
const DDO_BASE_URL: &str = "https://ordnet.dk/ddo/ordbog";

/// Base URL for SpanishDict word pages.
const SPANISHDICT_BASE_URL: &str = "https://www.spanishdict.com/translate/";

/// Placeholder example for senses the dictionary lists without citations.
const PLACEHOLDER_EXAMPLE: &str = "-";

/// Danish infinitive marker stripped before retrying.
const INFINITIVE_PREFIX: &str = "at ";

/// Errors that can occur during a lookup.
///
/// A page that does not exist or carries no entry is not an error; these only
/// surface when a download fails outright or a page no longer matches the
/// format the parsers know.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// A page could not be downloaded.
    #[error("could not download {url}: {source}")]
    Fetch {
        /// The page that could not be downloaded.
        url: Url,
        /// The underlying fetch error.
        #[source]
        source: FetchError,
    },
    /// A Den Danske Ordbog page did not parse.
    #[error("could not parse dictionary page {url}: {source}")]
    Danish {
        /// The page that did not parse.
        url: Url,
        /// The underlying parse error.
        #[source]
        source: ddo::Error,
    },
    /// A SpanishDict page did not parse.
    #[error("could not parse word page {url}: {source}")]
    Spanish {
        /// The page that did not parse.
        url: Url,
        /// The underlying parse error.
        #[source]
        source: spanishdict::Error,
    },
}

/// One lookup attempt: a parser to dispatch to and the URL to try.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attempt {
    language: SourceLanguage,
    url: Url,
}

/// Looks words up and folds them into the canonical model.
pub struct WordLookup<F> {
    fetcher: F,
}

impl<F: PageFetcher> WordLookup<F> {
    /// Creates a lookup on top of the given fetcher.
    #[must_use]
    pub fn new(fetcher: F) -> WordLookup<F> {
        WordLookup { fetcher }
    }

    /// Looks `term` up in the dictionary for `language`.
    ///
    /// When the requested dictionary has no match the lookup retries: Danish
    /// terms lose a leading `at ` (the infinitive marker search does not
    /// understand), and both languages finally fall back to the other
    /// dictionary. A term that is already a full dictionary URL - the client
    /// followed a variation link - gets exactly one attempt.
    ///
    /// # Errors
    ///
    /// Fails when a page cannot be downloaded for a reason other than 404, or
    /// when a downloaded page no longer matches the known page format.
    pub async fn look_up(
        &self,
        language: SourceLanguage,
        term: &str,
    ) -> Result<Option<Word>, LookupError> {
        for attempt in attempts(language, term) {
            debug!(language = %attempt.language, url = %attempt.url, "attempting lookup");

            if let Some(word) = self.attempt(&attempt).await? {
                return Ok(Some(word));
            }
        }

        debug!(%term, "no dictionary had a match");

        Ok(None)
    }

    async fn attempt(&self, attempt: &Attempt) -> Result<Option<Word>, LookupError> {
        let page = self
            .fetcher
            .fetch_text(&attempt.url)
            .await
            .map_err(|source| LookupError::Fetch {
                url: attempt.url.clone(),
                source,
            })?;

        let Some(html) = page else {
            return Ok(None);
        };

        match attempt.language {
            SourceLanguage::Danish => {
                let entry = ddo::parse(&html).map_err(|source| LookupError::Danish {
                    url: attempt.url.clone(),
                    source,
                })?;

                Ok(entry.map(from_danish))
            }
            SourceLanguage::Spanish => {
                let entry = spanishdict::parse(&html).map_err(|source| LookupError::Spanish {
                    url: attempt.url.clone(),
                    source,
                })?;

                Ok(entry.map(from_spanish))
            }
        }
    }
}

/// Resolves a term into the ordered list of lookup attempts.
fn attempts(language: SourceLanguage, term: &str) -> Vec<Attempt> {
    if let Some(url) = dictionary_url(language, term) {
        // Variation follow-ups already carry the exact page; never retried.
        return vec![Attempt { language, url }];
    }

    let mut attempts = vec![Attempt {
        language,
        url: query_url(language, term),
    }];

    if language == SourceLanguage::Danish
        && let Some(stripped) = term.strip_prefix(INFINITIVE_PREFIX)
        && !stripped.trim().is_empty()
    {
        attempts.push(Attempt {
            language,
            url: query_url(language, stripped),
        });
    }

    let other = language.other();
    attempts.push(Attempt {
        language: other,
        url: query_url(other, term),
    });

    attempts
}

/// Recognizes a term that is already a dictionary URL for `language`.
///
/// SpanishDict URLs lose their query string here; shared links carry tracking
/// parameters the site does not need.
fn dictionary_url(language: SourceLanguage, term: &str) -> Option<Url> {
    let mut url = Url::parse(term).ok()?;
    let host = url.host_str()?;

    match language {
        SourceLanguage::Danish if matches!(host, "ordnet.dk" | "www.ordnet.dk") => Some(url),
        SourceLanguage::Spanish if matches!(host, "spanishdict.com" | "www.spanishdict.com") => {
            url.set_query(None);
            Some(url)
        }
        _ => None,
    }
}

/// Builds the search URL for a term.
fn query_url(language: SourceLanguage, term: &str) -> Url {
    let encoded = urlencoding::encode(term);
    let url = match language {
        SourceLanguage::Danish => format!("{DDO_BASE_URL}?query={encoded}"),
        SourceLanguage::Spanish => format!("{SPANISHDICT_BASE_URL}{encoded}"),
    };

    Url::parse(&url).expect("query url")
}

/// Folds a parsed Den Danske Ordbog entry into the canonical model.
///
/// Danish senses are flat, so the entry becomes a single definition with a
/// single context; meanings are numbered `1`, `2`, … in page order.
fn from_danish(entry: ddo::Entry) -> Word {
    let meanings = entry
        .definitions
        .iter()
        .enumerate()
        .map(|(index, definition)| Meaning {
            original: definition.meaning.clone(),
            translation: None,
            alphabetical_position: (index + 1).to_string(),
            tag: definition.tag.clone(),
            image_url: None,
            examples: definition
                .examples
                .iter()
                .map(|example| Example {
                    original: example.clone(),
                    translation: None,
                })
                .collect(),
        })
        .collect();

    let sound_file_name = entry
        .sound_url
        .as_ref()
        .map(|_| format!("{}.mp3", entry.headword));

    Word {
        word: entry.headword.clone(),
        source_language: SourceLanguage::Danish,
        sound_url: entry.sound_url,
        sound_file_name,
        definitions: vec![Definition {
            headword: Headword {
                original: entry.headword,
                english: None,
                russian: None,
            },
            part_of_speech: entry.part_of_speech.unwrap_or_default(),
            endings: entry.endings.unwrap_or_default(),
            contexts: vec![Context {
                context_en: String::new(),
                position: "1".to_string(),
                meanings,
            }],
        }],
        variations: entry
            .variants
            .into_iter()
            .map(|variant| Variant {
                word: variant.word,
                url: variant.url,
            })
            .collect(),
    }
}

/// Folds a parsed SpanishDict entry into the canonical model.
///
/// Each word-form cluster keeps its own headword (`afeitar` next to
/// `afeitarse`); the site lists no inflections, so endings stay empty. A
/// meaning without examples gets the `-` placeholder.
fn from_spanish(entry: spanishdict::Entry) -> Word {
    let sound_file_name = entry
        .sound_url
        .as_ref()
        .map(|_| format!("{}.mp4", entry.headword));

    Word {
        word: entry.headword,
        source_language: SourceLanguage::Spanish,
        sound_url: entry.sound_url,
        sound_file_name,
        definitions: entry
            .definitions
            .into_iter()
            .map(spanish_definition)
            .collect(),
        variations: entry
            .variants
            .into_iter()
            .map(|variant| Variant {
                word: variant.word,
                url: variant.url,
            })
            .collect(),
    }
}

fn spanish_definition(definition: spanishdict::Definition) -> Definition {
    Definition {
        headword: Headword {
            original: definition.word,
            english: None,
            russian: None,
        },
        part_of_speech: definition.part_of_speech,
        endings: String::new(),
        contexts: definition.contexts.into_iter().map(spanish_context).collect(),
    }
}

fn spanish_context(context: spanishdict::Context) -> Context {
    Context {
        context_en: context.label,
        position: context.position,
        meanings: context.meanings.into_iter().map(spanish_meaning).collect(),
    }
}

fn spanish_meaning(meaning: spanishdict::Meaning) -> Meaning {
    let examples = if meaning.examples.is_empty() {
        vec![Example {
            original: PLACEHOLDER_EXAMPLE.to_string(),
            translation: None,
        }]
    } else {
        meaning
            .examples
            .into_iter()
            .map(|example| Example {
                original: example.spanish,
                translation: Some(example.english),
            })
            .collect()
    };

    Meaning {
        original: meaning.text,
        translation: None,
        alphabetical_position: meaning.letter,
        tag: None,
        image_url: meaning.image_url,
        examples,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    const HYGGE: &str = include_str!("../tests/fixtures/hygge.html");
    const LOEBE: &str = include_str!("../tests/fixtures/loebe.html");
    const CAFE: &str = include_str!("../tests/fixtures/cafe.html");
    const DDO_NO_RESULTS: &str = include_str!("../tests/fixtures/ddo_no_results.html");

    /// Serves canned pages and records every requested URL.
    #[derive(Default)]
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn with_page(mut self, url: &str, body: &str) -> ScriptedFetcher {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_text(&self, url: &Url) -> Result<Option<String>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());

            Ok(self.pages.get(url.as_str()).cloned())
        }
    }

    fn urls(attempts: &[Attempt]) -> Vec<&str> {
        attempts.iter().map(|attempt| attempt.url.as_str()).collect()
    }

    #[test]
    fn test_attempts_for_danish_term() {
        let attempts = attempts(SourceLanguage::Danish, "haj");

        assert_eq!(
            urls(&attempts),
            vec![
                "https://ordnet.dk/ddo/ordbog?query=haj",
                "https://www.spanishdict.com/translate/haj",
            ]
        );
        assert_eq!(attempts[1].language, SourceLanguage::Spanish);
    }

    #[test]
    fn test_attempts_strip_infinitive_marker() {
        let attempts = attempts(SourceLanguage::Danish, "at løbe");

        assert_eq!(
            urls(&attempts),
            vec![
                "https://ordnet.dk/ddo/ordbog?query=at%20l%C3%B8be",
                "https://ordnet.dk/ddo/ordbog?query=l%C3%B8be",
                "https://www.spanishdict.com/translate/at%20l%C3%B8be",
            ]
        );
    }

    #[test]
    fn test_attempts_for_spanish_term() {
        let attempts = attempts(SourceLanguage::Spanish, "coche");

        assert_eq!(
            urls(&attempts),
            vec![
                "https://www.spanishdict.com/translate/coche",
                "https://ordnet.dk/ddo/ordbog?query=coche",
            ]
        );
    }

    #[test]
    fn test_attempts_use_variation_url_verbatim() {
        let attempts = attempts(
            SourceLanguage::Danish,
            "https://ordnet.dk/ddo/ordbog?select=h%C3%B8j,1&query=h%C3%B8j",
        );

        assert_eq!(
            urls(&attempts),
            vec!["https://ordnet.dk/ddo/ordbog?select=h%C3%B8j,1&query=h%C3%B8j"]
        );
    }

    #[test]
    fn test_attempts_strip_spanishdict_query_string() {
        let attempts = attempts(
            SourceLanguage::Spanish,
            "https://www.spanishdict.com/translate/afeitar?langFrom=es",
        );

        assert_eq!(
            urls(&attempts),
            vec!["https://www.spanishdict.com/translate/afeitar"]
        );
    }

    #[tokio::test]
    async fn test_look_up_folds_danish_entry() {
        let fetcher =
            ScriptedFetcher::default().with_page("https://ordnet.dk/ddo/ordbog?query=hygge", HYGGE);
        let lookup = WordLookup::new(fetcher);

        let word = lookup
            .look_up(SourceLanguage::Danish, "hygge")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(word.word, "hygge");
        assert_eq!(word.source_language, SourceLanguage::Danish);
        assert_eq!(
            word.sound_url.as_deref(),
            Some("https://static.ordnet.dk/mp3/11018/11018216_1.mp3")
        );
        assert_eq!(word.sound_file_name.as_deref(), Some("hygge.mp3"));

        assert_eq!(word.definitions.len(), 1);
        let definition = &word.definitions[0];
        assert_eq!(definition.headword.original, "hygge");
        assert_eq!(definition.part_of_speech, "substantiv, fælleskøn");
        assert_eq!(definition.endings, "-n");

        assert_eq!(definition.contexts.len(), 1);
        let context = &definition.contexts[0];
        assert_eq!(context.context_en, "");
        assert_eq!(context.position, "1");

        assert_eq!(context.meanings.len(), 2);
        assert_eq!(context.meanings[0].original, "rar og afslappet stemning");
        assert_eq!(context.meanings[0].alphabetical_position, "1");
        assert_eq!(context.meanings[0].tag, None);
        assert_eq!(
            context.meanings[0].examples,
            vec![Example {
                original: "der var hygge omkring middagsbordet.".to_string(),
                translation: None,
            }]
        );
        assert_eq!(context.meanings[1].alphabetical_position, "2");
        assert_eq!(context.meanings[1].tag.as_deref(), Some("uformelt"));
        assert_eq!(context.meanings[1].examples[0].original, "-");

        assert_eq!(word.variations.len(), 1);
        assert_eq!(word.variations[0].word, "hygge(1) sb.");
        assert_eq!(
            word.variations[0].url,
            "https://ordnet.dk/ddo/ordbog?select=hygge,1&query=hygge"
        );
    }

    #[tokio::test]
    async fn test_look_up_folds_spanish_entry() {
        let fetcher = ScriptedFetcher::default()
            .with_page("https://www.spanishdict.com/translate/caf%C3%A9", CAFE);
        let lookup = WordLookup::new(fetcher);

        let word = lookup
            .look_up(SourceLanguage::Spanish, "café")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(word.word, "café");
        assert_eq!(word.source_language, SourceLanguage::Spanish);
        assert_eq!(
            word.sound_url.as_deref(),
            Some("https://pronounce.spanishdict.com/speakers/cafe-11901.mp4")
        );
        assert_eq!(word.sound_file_name.as_deref(), Some("café.mp4"));

        assert_eq!(word.definitions.len(), 1);
        let definition = &word.definitions[0];
        assert_eq!(definition.headword.original, "café");
        assert_eq!(definition.part_of_speech, "masculine noun");
        assert_eq!(definition.endings, "");

        assert_eq!(definition.contexts.len(), 2);
        assert_eq!(definition.contexts[0].context_en, "(beverage)");
        assert_eq!(definition.contexts[0].position, "1");
        assert_eq!(definition.contexts[1].context_en, "(place)");
        assert_eq!(definition.contexts[1].position, "2");

        let coffee = &definition.contexts[0].meanings[0];
        assert_eq!(coffee.original, "coffee");
        assert_eq!(coffee.alphabetical_position, "a");
        assert_eq!(
            coffee.examples,
            vec![Example {
                original: "¿Quieres un café?".to_string(),
                translation: Some("Would you like a coffee?".to_string()),
            }]
        );

        let shop = &definition.contexts[1].meanings[1];
        assert_eq!(shop.original, "coffee shop");
        assert_eq!(shop.alphabetical_position, "b");
        assert_eq!(
            shop.examples,
            vec![Example {
                original: "-".to_string(),
                translation: None,
            }]
        );

        assert_eq!(word.variations.len(), 1);
        assert_eq!(word.variations[0].word, "café (masculine noun)");
        assert_eq!(
            word.variations[0].url,
            "https://www.spanishdict.com/translate/caf%C3%A9"
        );
    }

    #[tokio::test]
    async fn test_look_up_falls_back_to_other_language() {
        let fetcher = ScriptedFetcher::default()
            .with_page("https://www.spanishdict.com/translate/caf%C3%A9", CAFE);
        let lookup = WordLookup::new(fetcher);

        let word = lookup
            .look_up(SourceLanguage::Danish, "café")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(word.source_language, SourceLanguage::Spanish);
        assert_eq!(
            lookup.fetcher.requested(),
            vec![
                "https://ordnet.dk/ddo/ordbog?query=caf%C3%A9",
                "https://www.spanishdict.com/translate/caf%C3%A9",
            ]
        );
    }

    #[tokio::test]
    async fn test_look_up_retries_without_infinitive_marker() {
        let fetcher = ScriptedFetcher::default()
            .with_page(
                "https://ordnet.dk/ddo/ordbog?query=at%20l%C3%B8be",
                DDO_NO_RESULTS,
            )
            .with_page("https://ordnet.dk/ddo/ordbog?query=l%C3%B8be", LOEBE);
        let lookup = WordLookup::new(fetcher);

        let word = lookup
            .look_up(SourceLanguage::Danish, "at løbe")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(word.word, "løbe");
        assert_eq!(word.definitions[0].part_of_speech, "verbum");
        assert_eq!(word.sound_url, None);
        assert_eq!(word.sound_file_name, None);
        assert_eq!(
            lookup.fetcher.requested(),
            vec![
                "https://ordnet.dk/ddo/ordbog?query=at%20l%C3%B8be",
                "https://ordnet.dk/ddo/ordbog?query=l%C3%B8be",
            ]
        );
    }

    #[tokio::test]
    async fn test_look_up_exhausts_all_attempts() {
        let lookup = WordLookup::new(ScriptedFetcher::default());

        let word = lookup.look_up(SourceLanguage::Spanish, "xyzzy").await.unwrap();

        assert_eq!(word, None);
        assert_eq!(lookup.fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_look_up_fails_on_format_regression() {
        let broken = r#"<html><body>
            <div class="definitionBoxTop"><span class="match">haj</span></div>
            <div id="id-udt"><a href="https://static.ordnet.dk/wav/1.wav">udtale</a></div>
            <div id="content-betydninger">
              <span class="definition">stor rovfisk</span>
            </div>
        </body></html>"#;
        let fetcher =
            ScriptedFetcher::default().with_page("https://ordnet.dk/ddo/ordbog?query=haj", broken);
        let lookup = WordLookup::new(fetcher);

        let err = lookup
            .look_up(SourceLanguage::Danish, "haj")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Danish { .. }));
    }
}
