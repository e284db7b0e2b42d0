//! Whitespace and comments as data.
//!
//! A conventional SQL lexer throws whitespace away; here every run of spaces,
//! every line break and every comment is captured as a [`Whitespace`] atom and
//! attached to exactly one tree node, so that re-concatenating the tree in
//! order reproduces the source byte-for-byte.
//!
//! The preservation options are applied once, at collection time, by
//! [`normalize`]. Code downstream of the lexer never observes filtered atoms.

use serde::Serialize;

/// One atom of insignificant source material.
///
/// Atoms store their exact source text, delimiters included, and are kept in
/// source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Whitespace {
    /// A run of space and/or tab characters.
    Space(String),
    /// One or more consecutive line breaks (`\n` or `\r\n`).
    Newline(String),
    /// A `-- ...` comment, excluding the terminating line break.
    LineComment(String),
    /// A `/* ... */` comment, delimiters included.
    BlockComment(String),
}

impl Whitespace {
    /// The exact source text of this atom.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Space(t) | Self::Newline(t) | Self::LineComment(t) | Self::BlockComment(t) => t,
        }
    }

    /// Whether this atom is a line or block comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }
}

/// An ordered run of whitespace atoms attached to one side of a node.
pub type Trivia = Vec<Whitespace>;

/// Which kinds of trivia survive collection.
///
/// The default drops everything that is not needed to re-parse the output;
/// [`TriviaPolicy::PRESERVE_ALL`] keeps every atom byte-exact and is what the
/// round-trip guarantee is stated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaPolicy {
    /// Keep line and block comments.
    pub comments: bool,
    /// Keep line breaks.
    pub newlines: bool,
    /// Keep space/tab runs.
    pub spaces: bool,
}

impl TriviaPolicy {
    /// Keep every atom; rendering reproduces the source exactly.
    pub const PRESERVE_ALL: Self = Self {
        comments: true,
        newlines: true,
        spaces: true,
    };

    /// Keep nothing beyond what re-parsing requires.
    pub const MINIMAL: Self = Self {
        comments: false,
        newlines: false,
        spaces: false,
    };

    /// Whether every atom kind is preserved.
    #[must_use]
    pub fn preserves_all(&self) -> bool {
        self.comments && self.newlines && self.spaces
    }
}

impl Default for TriviaPolicy {
    fn default() -> Self {
        Self::MINIMAL
    }
}

/// Apply a preservation policy to the trivia run collected between two tokens.
///
/// `prev` is the text of the token before the run (`None` at the start of the
/// input) and `next` the text of the token after it (empty at end of input).
/// When filtering empties a run whose neighbors would otherwise fuse into a
/// different token sequence, a single canonical space is kept in its place.
/// A retained line comment whose terminating line break was filtered keeps
/// one `\n` so the comment cannot swallow the following token.
///
/// This layer cannot fail; it only transforms.
#[must_use]
pub fn normalize(
    raw: Trivia,
    policy: &TriviaPolicy,
    prev: Option<&str>,
    next: &str,
) -> Trivia {
    if policy.preserves_all() {
        return raw;
    }
    let had_any = !raw.is_empty();
    let mut kept: Trivia = Vec::new();
    for atom in raw {
        let keep = match atom {
            Whitespace::Space(_) => policy.spaces,
            Whitespace::Newline(_) => policy.newlines,
            Whitespace::LineComment(_) | Whitespace::BlockComment(_) => policy.comments,
        };
        if keep {
            // Anything following a line comment must sit on the next line.
            if matches!(kept.last(), Some(Whitespace::LineComment(_)))
                && !matches!(atom, Whitespace::Newline(_))
            {
                kept.push(Whitespace::Newline("\n".to_owned()));
            }
            kept.push(atom);
        }
    }
    if matches!(kept.last(), Some(Whitespace::LineComment(_))) && !next.is_empty() {
        kept.push(Whitespace::Newline("\n".to_owned()));
    }
    if kept.is_empty() && had_any && would_fuse(prev, next) {
        kept.push(Whitespace::Space(" ".to_owned()));
    }
    kept
}

/// Whether dropping all trivia between `prev` and `next` would merge them
/// into a different token sequence when the output is re-parsed.
fn would_fuse(prev: Option<&str>, next: &str) -> bool {
    let Some(p) = prev.and_then(|s| s.chars().last()) else {
        return false;
    };
    let Some(n) = next.chars().next() else {
        return false;
    };
    let word = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    (word(p) && word(n))
        || (p == '-' && n == '-')
        || (p == '/' && n == '*')
        || (p == '*' && n == '/')
        || (p == n && (p == '\'' || p == '"' || p == '`'))
        || (p == '?' && n.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> Whitespace {
        Whitespace::Space(" ".to_owned())
    }

    fn comment() -> Whitespace {
        Whitespace::BlockComment("/*c*/".to_owned())
    }

    #[test]
    fn preserve_all_is_identity() {
        let run = vec![space(), comment(), space()];
        let out = normalize(run.clone(), &TriviaPolicy::PRESERVE_ALL, Some("a"), "b");
        assert_eq!(out, run);
    }

    #[test]
    fn minimal_keeps_separator_between_words() {
        let out = normalize(vec![space()], &TriviaPolicy::MINIMAL, Some("SELECT"), "1");
        assert_eq!(out, vec![Whitespace::Space(" ".to_owned())]);
    }

    #[test]
    fn minimal_drops_cosmetic_space() {
        let out = normalize(vec![space()], &TriviaPolicy::MINIMAL, Some("("), "1");
        assert!(out.is_empty());
    }

    #[test]
    fn comment_survives_as_separator() {
        let policy = TriviaPolicy {
            comments: true,
            ..TriviaPolicy::MINIMAL
        };
        let out = normalize(
            vec![space(), comment(), space()],
            &policy,
            Some("SELECT"),
            "1",
        );
        assert_eq!(out, vec![comment()]);
    }

    #[test]
    fn kept_line_comment_stays_terminated() {
        let policy = TriviaPolicy {
            comments: true,
            ..TriviaPolicy::MINIMAL
        };
        let out = normalize(
            vec![
                Whitespace::LineComment("-- hi".to_owned()),
                Whitespace::Newline("\n".to_owned()),
            ],
            &policy,
            Some("1"),
            "FROM",
        );
        assert_eq!(
            out,
            vec![
                Whitespace::LineComment("-- hi".to_owned()),
                Whitespace::Newline("\n".to_owned()),
            ]
        );
    }

    #[test]
    fn adjacent_minus_tokens_keep_a_space() {
        let out = normalize(vec![space()], &TriviaPolicy::MINIMAL, Some("-"), "-");
        assert_eq!(out, vec![Whitespace::Space(" ".to_owned())]);
    }

    #[test]
    fn no_separator_invented_where_source_had_none() {
        let out = normalize(Vec::new(), &TriviaPolicy::MINIMAL, Some("a"), "b");
        assert!(out.is_empty());
    }
}
