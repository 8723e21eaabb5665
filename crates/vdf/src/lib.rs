//! Valve's text KeyValues format, as used by `libraryfolders.vdf` and
//! `appmanifest_<id>.acf`.
//!
//! ```text
//! "AppState"
//! {
//!     "appid"     "546430"
//!     "name"      "Pathway"
//! }
//! ```
//!
//! Documents parse into an ordered [`Object`] tree of [`Value`]s and can be
//! written back with [`to_string`]. Comments, unquoted tokens and `[$COND]`
//! conditionals are rejected.

pub mod parse;
pub mod value;
pub mod write;

pub use parse::{parse, parse_bytes};
pub use value::{Object, Value};
pub use write::to_string;

/// Errors produced while parsing KeyValues text.
///
/// Line and column are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VdfError {
    #[error("unexpected end of input at {line}:{column}, expected {expected}")]
    UnexpectedEof {
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("unexpected character {found:?} at {line}:{column}, expected {expected}")]
    UnexpectedChar {
        found: char,
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("unterminated string starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unmatched '}}' at {line}:{column}")]
    UnmatchedClose { line: usize, column: usize },

    #[error("invalid UTF-8 at {line}:{column}")]
    InvalidUtf8 { line: usize, column: usize },

    #[error("block {key:?} opened at {line}:{column} is never closed")]
    UnclosedBlock {
        key: String,
        line: usize,
        column: usize,
    },
}
