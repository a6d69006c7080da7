//! Dictionary lookup service for Danish and Spanish.
//!
//! Folds Den Danske Ordbog and SpanishDict entries into one canonical word
//! model, optionally augments it with translations, and serves it over HTTP
//! together with a pronunciation sound proxy.

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

pub mod config;
pub mod consts;
mod error;
pub mod fetch;
pub mod http;
pub mod lookup;
pub mod server;
pub mod sound;
pub mod tracing;
pub mod translate;
pub mod word;

pub use error::Error;
pub use fetch::{HttpFetcher, PageFetcher};
pub use lookup::WordLookup;
pub use word::{SourceLanguage, Word};
