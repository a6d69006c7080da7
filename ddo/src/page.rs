//! A loaded dictionary page and the DOM helpers the field extractors build on.
//!
//! HTML entities are decoded by the HTML5 tokenizer when the page is loaded,
//! so the helpers here only deal with element lookup and whitespace. The
//! non-breaking space (U+00A0) is deliberately preserved by
//! [`normalize_whitespace`] since the dictionary uses it as a marker in
//! search result rows.

use scraper::{ElementRef, Html, Selector};

use crate::Error;

/// A parsed dictionary page.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Loads a page from raw HTML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] when the input is empty or contains
    /// only whitespace.
    pub fn parse(html: &str) -> Result<Document, Error> {
        if html.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        Ok(Document {
            html: Html::parse_document(html),
        })
    }

    /// Returns the element with the given `id`, if any.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!("#{id}")).expect("id selector");
        self.html.select(&selector).next()
    }

    /// Returns the first `tag` element carrying `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingElement`] when no element matches; use
    /// [`Document::try_find_first_by_class`] where absence is an ordinary
    /// outcome.
    pub fn find_first_by_class(&self, tag: &str, class: &str) -> Result<ElementRef<'_>, Error> {
        self.try_find_first_by_class(tag, class)
            .ok_or_else(|| Error::MissingElement(format!("{tag}.{class}")))
    }

    /// Returns the first `tag` element carrying `class`, if any.
    #[must_use]
    pub fn try_find_first_by_class(&self, tag: &str, class: &str) -> Option<ElementRef<'_>> {
        let selector = class_selector(tag, class);
        self.html.select(&selector).next()
    }

    /// Returns every `tag` element carrying `class`.
    ///
    /// # Errors
    ///
    /// Zero matches is [`Error::MissingElement`]; callers that tolerate an
    /// empty result select from a scope element instead.
    pub fn find_all_by_class(&self, tag: &str, class: &str) -> Result<Vec<ElementRef<'_>>, Error> {
        let selector = class_selector(tag, class);
        let elements: Vec<_> = self.html.select(&selector).collect();

        if elements.is_empty() {
            return Err(Error::MissingElement(format!("{tag}.{class}")));
        }

        Ok(elements)
    }
}

fn class_selector(tag: &str, class: &str) -> Selector {
    Selector::parse(&format!("{tag}.{class}")).expect("class selector")
}

/// Returns the first descendant of `scope` matching `selector`.
#[must_use]
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("descendant selector");
    scope.select(&selector).next()
}

/// Returns every descendant of `scope` matching `selector`.
#[must_use]
pub fn select_all<'a>(scope: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("descendant selector");
    scope.select(&selector).collect()
}

/// Returns the first direct child of `scope` that is a `tag` element
/// carrying `class`.
#[must_use]
pub fn direct_child_with_class<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    class: &str,
) -> Option<ElementRef<'a>> {
    scope.children().find_map(|node| {
        let child = ElementRef::wrap(node)?;
        let value = child.value();

        (value.name() == tag && value.classes().any(|c| c == class)).then_some(child)
    })
}

/// Returns the nearest ancestor of `element` that is a `tag` element
/// carrying `class`.
#[must_use]
pub fn ancestor_with_class<'a>(
    element: ElementRef<'a>,
    tag: &str,
    class: &str,
) -> Option<ElementRef<'a>> {
    element.ancestors().find_map(|node| {
        let ancestor = ElementRef::wrap(node)?;
        let value = ancestor.value();

        (value.name() == tag && value.classes().any(|c| c == class)).then_some(ancestor)
    })
}

/// Returns the text content of `element` with normalized whitespace.
#[must_use]
pub fn normalized_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    normalize_whitespace(&text)
}

/// Returns the text content of `element`, skipping any descendant element
/// carrying `class`.
#[must_use]
pub fn text_excluding_class(element: ElementRef<'_>, class: &str) -> String {
    let mut text = String::new();
    collect_text_excluding_class(element, class, &mut text);

    normalize_whitespace(&text)
}

fn collect_text_excluding_class(element: ElementRef<'_>, class: &str, out: &mut String) {
    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(node) {
            if child.value().classes().any(|c| c == class) {
                continue;
            }
            collect_text_excluding_class(child, class, out);
        }
    }
}

/// Collapses runs of ASCII whitespace to single spaces and trims the ends.
///
/// U+00A0 is kept as-is: search result rows use it to mark a conjugated form
/// pointing back to its lemma.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\r' | '\n') {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out.trim_matches('\u{00A0}').to_string()
}
