//! Parse SQL into a lossless concrete syntax tree and print it back
//! byte-identically.
//!
//! The tree keeps everything the source contained: keyword casing, quote
//! styles, redundant parentheses, whitespace and comments. Under
//! [`ParseOptions::preserve_all`] the round-trip law holds exactly:
//! `render(&parse(sql, &options)?) == sql`, byte for byte. The default
//! options collapse insignificant whitespace instead, keeping only what the
//! output needs to re-parse the same way.
//!
//! ```
//! use sqltrip::{parse, render, Dialect, ParseOptions};
//!
//! let options = ParseOptions::preserve_all(Dialect::Sqlite);
//! let program = parse("SELECT 1 /* one */, 2", &options)?;
//! assert_eq!(render(&program), "SELECT 1 /* one */, 2");
//! # Ok::<(), sqltrip::Error>(())
//! ```
//!
//! Dialect-specific grammar is selected per call:
//!
//! ```
//! use sqltrip::{parse, Dialect, ParseOptions};
//!
//! let sql = "CREATE ROLE my_role WITH LOGIN";
//! assert!(parse(sql, &ParseOptions::new(Dialect::Postgresql)).is_ok());
//! assert!(parse(sql, &ParseOptions::new(Dialect::Sqlite)).is_err());
//! ```

use tracing::debug;

pub use sqltrip_cst::*;
pub use sqltrip_error::{ConfigError, Error, Result, SyntaxError};
pub use sqltrip_parser::{Dialect, ParamType, ParseOptions, Parser};

/// Parse SQL source into a program tree.
///
/// Fails with [`Error::Config`] before consuming any text when the options
/// are invalid, or with [`Error::Syntax`] at the furthest position the
/// grammar reached. No partial tree is ever returned.
pub fn parse(sql: &str, options: &ParseOptions) -> Result<Node<Program>> {
    debug!(dialect = %options.dialect, bytes = sql.len(), "parse");
    let result = Parser::new(sql, options.clone())?.parse_program();
    if let Err(err) = &result {
        debug!(%err, "parse failed");
    }
    result
}

/// Parse a single expression (the whole input must be one expression).
pub fn parse_expr(sql: &str, options: &ParseOptions) -> Result<Node<Expr>> {
    debug!(dialect = %options.dialect, bytes = sql.len(), "parse expression");
    Parser::new(sql, options.clone())?.parse_expression()
}
