//! Parser for word pages served by SpanishDict at
//! <https://www.spanishdict.com>.
//!
//! The site embeds every lookup result as a JSON object in an inline script.
//! This crate digs that object out of the page, deserializes the parts that
//! matter and projects them into the [`Entry`] model.

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

mod error;
pub mod json;
pub mod parse;
pub mod types;

pub use error::Error;
pub use parse::{entry_from_data, extract_component_data, parse};
pub use types::{Context, Definition, Entry, Example, Meaning, Variant};
