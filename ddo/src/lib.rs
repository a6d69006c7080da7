//! Parser for dictionary pages served by Den Danske Ordbog at
//! <https://ordnet.dk/ddo>.

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

mod error;
pub mod page;
pub mod parse;
pub mod types;

pub use error::Error;
pub use page::Document;
pub use parse::{parse, parse_document};
pub use types::{Definition, Entry, Variant};
