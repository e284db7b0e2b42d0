//! Lossless SQL concrete syntax tree.
//!
//! Unlike an abstract syntax tree, every node here retains the exact source
//! text it was parsed from: keyword casing, quote styles, redundant
//! parentheses, and (via [`trivia`]) the whitespace and comments around it.
//! Rendering a tree parsed with full preservation reproduces the original
//! input byte-for-byte.
//!
//! The tree is fully owned, immutable after construction, and `Send + Sync`;
//! there are no back-references and no sharing between siblings.

pub mod trivia;

mod ddl;
mod expr;
mod render;
mod select;
mod stmt;

pub use ddl::*;
pub use expr::*;
pub use render::{render, render_all, Render};
pub use select::*;
pub use stmt::*;
pub use trivia::{Trivia, TriviaPolicy, Whitespace};

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Span — source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the original source text.
///
/// Spans are only produced when position tracking is requested and are used
/// for diagnostics; rendering never consults them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive) offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Node — the uniform trivia carrier
// ---------------------------------------------------------------------------

/// A tree node together with the trivia attached to it.
///
/// Each whitespace atom captured from the source is attached to exactly one
/// node, either before it (`leading`) or after it (`trailing`). Rendering a
/// node emits `leading`, the node's own content, then `trailing`, so the
/// concatenation of a whole tree reproduces the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<T> {
    /// Trivia preceding this node's first token.
    pub leading: Trivia,
    /// The node itself.
    pub inner: T,
    /// Trivia following this node's last token.
    pub trailing: Trivia,
    /// Source span, present when position tracking was requested.
    pub range: Option<Span>,
}

impl<T> Node<T> {
    /// Wrap a bare node with no trivia and no span.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self {
            leading: Vec::new(),
            inner,
            trailing: Vec::new(),
            range: None,
        }
    }

    /// Attach trivia before this node, after any already present.
    #[must_use]
    pub fn with_leading(mut self, trivia: Trivia) -> Self {
        self.leading.extend(trivia);
        self
    }

    /// Attach trivia after this node, after any already present.
    #[must_use]
    pub fn with_trailing(mut self, trivia: Trivia) -> Self {
        self.trailing.extend(trivia);
        self
    }

    /// Set the source span.
    #[must_use]
    pub fn with_range(mut self, span: Span) -> Self {
        self.range = Some(span);
        self
    }

    /// Box the inner node, keeping trivia and span in place.
    #[must_use]
    pub fn boxed(self) -> Node<Box<T>> {
        Node {
            leading: self.leading,
            inner: Box::new(self.inner),
            trailing: self.trailing,
            range: self.range,
        }
    }

    /// Map the inner node, keeping trivia and span in place.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Node<U> {
        Node {
            leading: self.leading,
            inner: f(self.inner),
            trailing: self.trailing,
            range: self.range,
        }
    }
}

// ---------------------------------------------------------------------------
// Leaf nodes
// ---------------------------------------------------------------------------

/// A keyword with its exact source casing.
///
/// The set of spellings admissible at a given grammatical position is closed;
/// [`Keyword::one_of`] asserts membership at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    /// The keyword exactly as written (`SELECT`, `select`, `Select`, …).
    pub text: String,
}

impl Keyword {
    /// A keyword whose admissible set is the single canonical spelling.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// A keyword restricted to a closed set of spellings for its position.
    ///
    /// The check is case-insensitive; `text` keeps the source casing.
    #[must_use]
    pub fn one_of(text: impl Into<String>, admissible: &[&str]) -> Self {
        let text = text.into();
        debug_assert!(
            admissible.iter().any(|k| k.eq_ignore_ascii_case(&text)),
            "keyword {text:?} is not admissible here (expected one of {admissible:?})"
        );
        Self { text }
    }
}

/// An identifier, stored verbatim including any quoting (`foo`, `"foo"`,
/// `` `foo` ``, `[foo]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub text: String,
}

/// A string literal, quotes included, escapes untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    pub text: String,
}

/// A numeric literal, stored verbatim (`42`, `.5`, `1e10`, `0xFF`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberLiteral {
    pub text: String,
}

/// `TRUE` or `FALSE` in its source casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoolLiteral {
    pub text: String,
}

/// `NULL` in its source casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullLiteral {
    pub text: String,
}

/// A blob literal (`X'CAFE'`), stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobLiteral {
    pub text: String,
}

/// A bind-parameter placeholder (`?`, `?3`, `:name`, `@name`, `$1`),
/// stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub text: String,
}

/// The `*` of `SELECT *` or `tbl.*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllColumns;

// ---------------------------------------------------------------------------
// Generic composites
// ---------------------------------------------------------------------------

/// A comma-separated list.
///
/// Separators render as `,`; the whitespace around each separator lives in
/// the adjacent items' trailing/leading trivia, so separator placement
/// round-trips exactly. `trailing_comma` records a separator after the last
/// item, for the call sites that admit one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListExpr<T> {
    pub items: Vec<Node<T>>,
    pub trailing_comma: bool,
}

impl<T> ListExpr<T> {
    /// A list with no trailing separator.
    #[must_use]
    pub fn new(items: Vec<Node<T>>) -> Self {
        Self {
            items,
            trailing_comma: false,
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An explicitly parenthesized node.
///
/// Parentheses are never discarded; redundant parens in the source appear in
/// the tree and round-trip exactly as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenExpr<T> {
    pub expr: Box<Node<T>>,
}

impl<T> ParenExpr<T> {
    #[must_use]
    pub fn new(expr: Node<T>) -> Self {
        Self {
            expr: Box::new(expr),
        }
    }
}

/// A node wrapped with an alias (`expr [AS] name`), generic over the inner
/// node so the alias grammar is written once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alias<T> {
    pub expr: Box<Node<T>>,
    pub as_kw: Option<Node<Keyword>>,
    pub name: Node<AliasName>,
}

/// The name position of an alias: a plain identifier or (in the dialects
/// that allow it) a string literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AliasName {
    Ident(Ident),
    String(StringLiteral),
}

/// Either a bare node or an aliased one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Aliased<T> {
    Bare(T),
    Alias(Alias<T>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_covers_both() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
    }

    #[test]
    fn node_trivia_attachment_appends() {
        let n = Node::new(Ident {
            text: "t".to_owned(),
        })
        .with_leading(vec![Whitespace::Space(" ".to_owned())])
        .with_leading(vec![Whitespace::BlockComment("/*c*/".to_owned())]);
        assert_eq!(n.leading.len(), 2);
        assert_eq!(n.leading[1].text(), "/*c*/");
    }

    #[test]
    fn keyword_keeps_source_casing() {
        let kw = Keyword::one_of("select", &["SELECT"]);
        assert_eq!(kw.text, "select");
    }

    #[test]
    #[should_panic(expected = "not admissible")]
    #[cfg(debug_assertions)]
    fn keyword_rejects_wrong_spelling() {
        let _ = Keyword::one_of("DELETE", &["RENAME"]);
    }

    #[test]
    fn nodes_serialize_to_json() {
        let n = Node::new(NumberLiteral {
            text: "42".to_owned(),
        });
        let json = serde_json::to_value(&n).expect("serializable");
        assert_eq!(json["inner"]["text"], "42");
    }
}
