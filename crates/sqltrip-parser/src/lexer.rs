//! SQL lexer.
//!
//! Converts SQL text into a stream of tokens. Uses memchr for accelerated
//! terminator scans and tracks line/column for error reporting.
//!
//! Where a conventional lexer skips whitespace and comments, this one
//! collects them into [`Whitespace`] atoms on the *following* token's
//! `leading` run; the parser then attaches each run to the node it belongs
//! to. Quoting rules are dialect-dependent: `"…"` is a string under MySQL
//! and an identifier elsewhere, `` `…` `` is rejected under PostgreSQL, and
//! `[…]` is SQLite-only.

use memchr::memchr;

use sqltrip_cst::trivia::{normalize, Trivia, TriviaPolicy, Whitespace};
use sqltrip_cst::Span;

use crate::keywords::Kw;
use crate::options::{Dialect, ParseOptions};
use crate::token::{Token, TokenKind};

/// SQL lexer producing trivia-carrying tokens.
pub struct Lexer<'a> {
    /// The source text.
    text: &'a str,
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Active dialect; decides quoting rules and string escapes.
    dialect: Dialect,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given SQL source text.
    #[must_use]
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            text: source,
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            dialect,
        }
    }

    /// Tokenize the entire input, with raw (unfiltered) trivia.
    #[must_use]
    pub fn tokenize(source: &'a str, dialect: Dialect) -> Vec<Token> {
        let mut lexer = Self::new(source, dialect);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Tokenize and apply the options' trivia policy to every leading run.
    #[must_use]
    pub fn tokenize_with_options(source: &'a str, options: &ParseOptions) -> Vec<Token> {
        let mut tokens = Self::tokenize(source, options.dialect);
        let policy = options.trivia_policy();
        if policy != TriviaPolicy::PRESERVE_ALL {
            let mut prev: Option<String> = None;
            for tok in &mut tokens {
                let raw = std::mem::take(&mut tok.leading);
                tok.leading = normalize(raw, &policy, prev.as_deref(), &tok.text);
                prev = Some(tok.text.clone());
            }
        }
        tokens
    }

    /// Produce the next token, collecting any preceding trivia.
    pub fn next_token(&mut self) -> Token {
        let leading = self.collect_trivia();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;

        if self.pos >= self.src.len() {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                leading,
                span: Span::new(start as u32, start as u32),
                line: start_line,
                col: start_col,
            };
        }

        let ch = self.src[self.pos];
        let kind = match ch {
            // String literal (single-quoted)
            b'\'' => self.lex_string(b'\''),

            // Double quotes: a string under MySQL, an identifier elsewhere
            b'"' => {
                if self.dialect == Dialect::Mysql {
                    self.lex_string(b'"')
                } else {
                    self.lex_quoted_ident(b'"', b'"')
                }
            }

            // Backtick-quoted identifier (MySQL, SQLite)
            b'`' => {
                if self.dialect == Dialect::Postgresql {
                    self.lex_unexpected()
                } else {
                    self.lex_quoted_ident(b'`', b'`')
                }
            }

            // Bracket-quoted identifier (SQLite)
            b'[' => {
                if self.dialect == Dialect::Sqlite {
                    self.lex_quoted_ident(b'[', b']')
                } else {
                    self.lex_unexpected()
                }
            }

            // Blob literal
            b'X' | b'x' if self.peek_at(1) == Some(b'\'') => self.lex_blob(),

            // Numbers
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),

            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(),

            // Bind parameters
            b'?' => self.lex_question(),
            b':' => self.lex_prefixed_param(TokenKind::ColonParam),
            b'@' => self.lex_prefixed_param(TokenKind::AtParam),
            b'$' => self.lex_dollar_param(),

            // Operators and punctuation
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'.' => self.single(TokenKind::Dot),
            b'+' => self.single(TokenKind::Plus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'&' => self.single(TokenKind::Ampersand),
            b'~' => self.single(TokenKind::Tilde),
            b'-' => self.lex_minus(),
            b'<' => self.lex_lt(),
            b'>' => self.lex_gt(),
            b'=' => self.lex_eq(),
            b'!' => self.lex_bang(),
            b'|' => self.lex_pipe(),

            _ => self.lex_unexpected(),
        };

        Token {
            kind,
            text: self.text[start..self.pos].to_owned(),
            leading,
            span: Span::new(start as u32, self.pos as u32),
            line: start_line,
            col: start_col,
        }
    }

    // -----------------------------------------------------------------------
    // Trivia collection
    // -----------------------------------------------------------------------

    /// Collect spaces, line breaks, and comments into atoms, in source order.
    fn collect_trivia(&mut self) -> Trivia {
        let mut run = Vec::new();
        loop {
            let start = self.pos;
            match self.peek() {
                Some(b' ' | b'\t') => {
                    while matches!(self.peek(), Some(b' ' | b'\t')) {
                        self.advance();
                    }
                    run.push(Whitespace::Space(self.text[start..self.pos].to_owned()));
                }
                Some(b'\n' | b'\r') => {
                    while matches!(self.peek(), Some(b'\n' | b'\r')) {
                        self.advance();
                    }
                    run.push(Whitespace::Newline(self.text[start..self.pos].to_owned()));
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    let end = memchr(b'\n', &self.src[self.pos..])
                        .map_or(self.src.len(), |i| self.pos + i);
                    self.advance_to(end);
                    run.push(Whitespace::LineComment(self.text[start..self.pos].to_owned()));
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    // Scan for the terminating `*/`; an unterminated comment
                    // runs to end of input, as in SQLite.
                    loop {
                        match memchr(b'*', &self.src[self.pos..]) {
                            Some(i) => {
                                self.advance_to(self.pos + i);
                                self.advance();
                                if self.peek() == Some(b'/') {
                                    self.advance();
                                    break;
                                }
                            }
                            None => {
                                self.advance_to(self.src.len());
                                break;
                            }
                        }
                    }
                    run.push(Whitespace::BlockComment(
                        self.text[start..self.pos].to_owned(),
                    ));
                }
                _ => break,
            }
        }
        run
    }

    // -----------------------------------------------------------------------
    // Byte navigation
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    /// Advance to an absolute byte offset, keeping line/col accurate.
    fn advance_to(&mut self, end: usize) {
        while self.pos < end {
            self.advance();
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    // -----------------------------------------------------------------------
    // Token scanners
    // -----------------------------------------------------------------------

    /// A quoted string. The closing quote doubled escapes itself; MySQL
    /// additionally honors backslash escapes.
    fn lex_string(&mut self, quote: u8) -> TokenKind {
        self.advance();
        loop {
            match self.peek() {
                None => return TokenKind::Error,
                Some(b'\\') if self.dialect == Dialect::Mysql => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return TokenKind::String;
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// A quoted identifier; the closing delimiter doubled escapes itself.
    fn lex_quoted_ident(&mut self, open: u8, close: u8) -> TokenKind {
        debug_assert_eq!(self.peek(), Some(open));
        self.advance();
        loop {
            match self.peek() {
                None => return TokenKind::Error,
                Some(c) if c == close => {
                    self.advance();
                    if close != b']' && self.peek() == Some(close) {
                        self.advance();
                    } else {
                        return TokenKind::QuotedIdent;
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// `X'…'`, kept verbatim; hex validity is not this layer's concern.
    fn lex_blob(&mut self) -> TokenKind {
        self.advance(); // x
        match self.lex_string(b'\'') {
            TokenKind::String => TokenKind::Blob,
            other => other,
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.advance();
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return TokenKind::Number;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some(b'+' | b'-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..=lookahead {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        TokenKind::Number
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'$')
        {
            self.advance();
        }
        match Kw::lookup(&self.text[start..self.pos]) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        }
    }

    fn lex_question(&mut self) -> TokenKind {
        self.advance();
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            TokenKind::QuestionNum
        } else {
            TokenKind::Question
        }
    }

    fn lex_prefixed_param(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == b'_')
        {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
            {
                self.advance();
            }
            kind
        } else {
            TokenKind::Error
        }
    }

    fn lex_dollar_param(&mut self) -> TokenKind {
        self.advance();
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
            {
                self.advance();
            }
            TokenKind::DollarParam
        } else {
            TokenKind::Error
        }
    }

    fn lex_minus(&mut self) -> TokenKind {
        self.advance();
        if self.peek() == Some(b'>') {
            self.advance();
            if self.peek() == Some(b'>') {
                self.advance();
                TokenKind::DoubleArrow
            } else {
                TokenKind::Arrow
            }
        } else {
            TokenKind::Minus
        }
    }

    fn lex_lt(&mut self) -> TokenKind {
        self.advance();
        match self.peek() {
            Some(b'=') => {
                self.advance();
                if self.peek() == Some(b'>') {
                    self.advance();
                    TokenKind::NullSafeEq
                } else {
                    TokenKind::Le
                }
            }
            Some(b'<') => {
                self.advance();
                TokenKind::ShiftLeft
            }
            Some(b'>') => {
                self.advance();
                TokenKind::LtGt
            }
            _ => TokenKind::Lt,
        }
    }

    fn lex_gt(&mut self) -> TokenKind {
        self.advance();
        match self.peek() {
            Some(b'=') => {
                self.advance();
                TokenKind::Ge
            }
            Some(b'>') => {
                self.advance();
                TokenKind::ShiftRight
            }
            _ => TokenKind::Gt,
        }
    }

    fn lex_eq(&mut self) -> TokenKind {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            TokenKind::EqEq
        } else {
            TokenKind::Eq
        }
    }

    fn lex_bang(&mut self) -> TokenKind {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            TokenKind::Ne
        } else {
            TokenKind::Error
        }
    }

    fn lex_pipe(&mut self) -> TokenKind {
        self.advance();
        if self.peek() == Some(b'|') {
            self.advance();
            TokenKind::Concat
        } else {
            TokenKind::Pipe
        }
    }

    /// Consume one (possibly multi-byte) character as an error token.
    fn lex_unexpected(&mut self) -> TokenKind {
        self.advance();
        while self.peek().is_some_and(|c| c & 0xC0 == 0x80) {
            self.advance();
        }
        TokenKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src, Dialect::Sqlite)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(src: &str) -> Vec<String> {
        Lexer::tokenize(src, Dialect::Sqlite)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        let tokens = kinds("SELECT foo");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Keyword(Kw::Select),
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_text_keeps_casing() {
        assert_eq!(texts("select Foo"), vec!["select", "Foo", ""]);
    }

    #[test]
    fn lex_numbers_verbatim() {
        assert_eq!(texts("42 3.14 .5 1e10 0xFF"), vec![
            "42", "3.14", ".5", "1e10", "0xFF", ""
        ]);
        assert!(kinds("42").iter().take(1).all(|k| *k == TokenKind::Number));
    }

    #[test]
    fn lex_string_with_doubled_quote() {
        let tokens = Lexer::tokenize("'it''s'", Dialect::Sqlite);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "'it''s'");
    }

    #[test]
    fn double_quotes_are_strings_only_under_mysql() {
        assert_eq!(
            Lexer::tokenize("\"x\"", Dialect::Mysql)[0].kind,
            TokenKind::String
        );
        assert_eq!(
            Lexer::tokenize("\"x\"", Dialect::Sqlite)[0].kind,
            TokenKind::QuotedIdent
        );
    }

    #[test]
    fn brackets_are_sqlite_only() {
        assert_eq!(
            Lexer::tokenize("[col]", Dialect::Sqlite)[0].kind,
            TokenKind::QuotedIdent
        );
        assert_eq!(
            Lexer::tokenize("[col]", Dialect::Postgresql)[0].kind,
            TokenKind::Error
        );
    }

    #[test]
    fn trivia_is_captured_not_skipped() {
        let tokens = Lexer::tokenize("SELECT /*c*/ 1", Dialect::Sqlite);
        let leading = &tokens[1].leading;
        assert_eq!(leading.len(), 3);
        assert_eq!(leading[1].text(), "/*c*/");
    }

    #[test]
    fn line_comment_excludes_newline() {
        let tokens = Lexer::tokenize("1 -- c\n2", Dialect::Sqlite);
        let leading = &tokens[1].leading;
        assert_eq!(
            leading,
            &vec![
                Whitespace::Space(" ".to_owned()),
                Whitespace::LineComment("-- c".to_owned()),
                Whitespace::Newline("\n".to_owned()),
            ]
        );
    }

    #[test]
    fn eof_token_holds_trailing_trivia() {
        let tokens = Lexer::tokenize("1 -- done", Dialect::Sqlite);
        let eof = tokens.last().expect("eof token");
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.leading[1].text(), "-- done");
    }

    #[test]
    fn lex_params() {
        let tokens = kinds("? ?3 :name @name $1");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Question,
                TokenKind::QuestionNum,
                TokenKind::ColonParam,
                TokenKind::AtParam,
                TokenKind::DollarParam,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_operators() {
        let tokens = kinds("<= >= <> != || << >> == -> ->>");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::LtGt,
                TokenKind::Ne,
                TokenKind::Concat,
                TokenKind::ShiftLeft,
                TokenKind::ShiftRight,
                TokenKind::EqEq,
                TokenKind::Arrow,
                TokenKind::DoubleArrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_blob_literal() {
        let tokens = Lexer::tokenize("X'CAFE'", Dialect::Sqlite);
        assert_eq!(tokens[0].kind, TokenKind::Blob);
        assert_eq!(tokens[0].text, "X'CAFE'");
    }

    #[test]
    fn spans_and_positions_track_lines() {
        let tokens = Lexer::tokenize("SELECT\n  foo", Dialect::Sqlite);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].col, 3);
        assert_eq!(tokens[1].span, Span::new(9, 12));
    }

    #[test]
    fn minimal_policy_drops_cosmetic_trivia() {
        let opts = ParseOptions::new(Dialect::Sqlite);
        let tokens = Lexer::tokenize_with_options("SELECT  ( 1 )", &opts);
        // Word boundary keeps one space, parens keep none.
        assert_eq!(tokens[1].leading.len(), 0); // before `(`
        assert_eq!(tokens[2].leading.len(), 0); // before `1`
    }

    mod proptest_lossless {
        use super::*;
        use proptest::prelude::*;

        proptest::proptest! {
            /// Every byte of the input ends up either in some token's text
            /// or in some token's leading trivia — even for inputs that are
            /// not valid SQL.
            #[test]
            fn tokens_account_for_every_byte(
                src in "[a-zA-Z0-9_ \t\n',.()*/=<>+-]{0,40}"
            ) {
                let tokens = Lexer::tokenize(&src, Dialect::Sqlite);
                let mut rebuilt = String::new();
                for tok in &tokens {
                    for ws in &tok.leading {
                        rebuilt.push_str(ws.text());
                    }
                    rebuilt.push_str(&tok.text);
                }
                prop_assert_eq!(rebuilt, src);
            }
        }
    }
}
