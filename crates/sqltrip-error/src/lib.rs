//! Error types for sqltrip.
//!
//! The parser has exactly two failure modes: the input text cannot be derived
//! from the active dialect's grammar ([`SyntaxError`]), or the supplied
//! options are rejected before parsing even starts ([`ConfigError`]).
//! Rendering a well-formed tree cannot fail and has no error type.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Result alias used throughout the sqltrip crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input is not valid SQL under the active dialect.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The parse options are invalid; reported before any text is consumed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A syntax error at the furthest position any grammar alternative reached.
///
/// `expected` is the merged set of descriptions from every alternative that
/// was tried at that position, so the message names everything that would
/// have been accepted there rather than whichever alternative happened to be
/// tried last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset into the source where the failure occurred.
    pub offset: usize,
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based).
    pub column: u32,
    /// Descriptions of what the grammar would have accepted here.
    pub expected: BTreeSet<String>,
    /// The offending token text, or `None` at end of input.
    pub found: Option<String>,
}

impl SyntaxError {
    /// Human-readable form of the expectation set: `"A, B or C"`.
    #[must_use]
    pub fn expected_description(&self) -> String {
        let items: Vec<&str> = self.expected.iter().map(String::as_str).collect();
        match items.as_slice() {
            [] => "valid SQL".to_owned(),
            [one] => (*one).to_owned(),
            [init @ .., last] => format!("{} or {last}", init.join(", ")),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "syntax error at line {}, column {}: expected {}, found {}",
            self.line,
            self.column,
            self.expected_description(),
            match &self.found {
                Some(text) => format!("\"{text}\""),
                None => "end of input".to_owned(),
            }
        )
    }
}

impl std::error::Error for SyntaxError {}

/// An invalid option combination, rejected before parsing begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The dialect name is not one of the recognized dialects.
    #[error("unknown dialect: \"{name}\"")]
    UnknownDialect { name: String },

    /// The requested parameter placeholder style is not available under the
    /// selected dialect.
    #[error("parameter style {param} is not supported by the {dialect} dialect")]
    UnsupportedParamType { dialect: String, param: String },
}
