use thiserror::Error;

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied document was empty.
    #[error("document is empty")]
    EmptyDocument,
    /// A required element was missing from the page.
    #[error("could not find element using selector: {0}")]
    MissingElement(String),
    /// The pronunciation link did not point to an MP3 file.
    #[error("sound link does not point to an mp3 file: {0}")]
    UnexpectedSoundUrl(String),
    /// A variant link could not be resolved to an absolute URL.
    #[error("could not resolve variant link {href:?}")]
    InvalidVariantUrl {
        /// The href attribute as it appeared on the page.
        href: String,
        /// The underlying parse error.
        source: url::ParseError,
    },
}
