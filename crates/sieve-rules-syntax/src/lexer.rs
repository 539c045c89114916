//! # Lexer - Tokenizing Sieve Source
//!
//! This module provides the first stage of parsing: breaking script text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** Nothing is
//! skipped, not even whitespace or comments, which is what lets unsupported
//! constructs be carried through an edit cycle verbatim:
//!
//! ```
//! use sieve_rules_syntax::lexer::lex;
//!
//! let input = "if header :is \"subject\" \"hi\" { keep; } # done\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Irregular Input
//!
//! Unterminated strings, `/* */` comments and `text:` literals simply run to
//! end of input. The lexer never fails; bytes it has no rule for become
//! [`SyntaxKind::UNKNOWN`] tokens and the recognizer treats the surrounding
//! construct as raw text.
//!
//! ## Public API
//!
//! - [`lex`] - Tokenize input, returning `Vec<Token>`
//! - [`lex_with_spans`] - Tokenize with byte offset spans
//! - [`string_value`] / [`quote`] - Decode and encode quoted-string literals
//!
//! [`SyntaxKind::UNKNOWN`]: crate::syntax_kind::SyntaxKind::UNKNOWN

use logos::{Lexer, Logos};

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `#` comment up to (not including) the line ending
    #[token("#", hash_comment)]
    Comment,

    /// `/* ... */` comment
    #[token("/*", block_comment)]
    BlockComment,

    /// Double-quoted string
    #[token("\"", quoted_string)]
    String,

    /// `text:` multi-line string, terminated by a line holding a lone `.`
    #[regex(r"[tT][eE][xX][tT]:", multiline_string)]
    MultilineString,

    /// Number with optional quantifier (`100K`)
    #[regex(r"[0-9]+[KkMmGg]?")]
    Number,

    /// Keyword or identifier
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// `:tag`
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*")]
    Tag,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,
}

fn hash_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let mut end = rest.find('\n').unwrap_or(rest.len());
    if rest[..end].ends_with('\r') {
        end -= 1;
    }
    lex.bump(end);
    true
}

fn block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let end = rest.find("*/").map(|i| i + 2).unwrap_or(rest.len());
    lex.bump(end);
    true
}

fn quoted_string(lex: &mut Lexer<TokenKind>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(bytes.len());
    true
}

fn multiline_string(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let Some(header_len) = rest.find('\n').map(|i| i + 1) else {
        lex.bump(rest.len());
        return true;
    };

    // Only blanks or a hash comment may follow `text:` on its own line
    let header = rest[..header_len]
        .trim_end_matches(['\r', '\n'])
        .trim_start_matches([' ', '\t']);
    if !(header.is_empty() || header.starts_with('#')) {
        return false;
    }

    let mut consumed = header_len;
    for line in rest[header_len..].split_inclusive('\n') {
        consumed += line.len();
        if line.trim_end_matches(['\r', '\n']) == "." {
            break;
        }
    }
    lex.bump(consumed);
    true
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::BlockComment => SyntaxKind::BLOCK_COMMENT,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::MultilineString => SyntaxKind::MULTILINE_STRING,
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Tag => SyntaxKind::TAG,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Case-insensitive keyword check; Sieve identifiers ignore case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == SyntaxKind::IDENT && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Case-insensitive tag check, `name` given without the colon.
    pub fn is_tag(&self, name: &str) -> bool {
        self.kind == SyntaxKind::TAG && self.text[1..].eq_ignore_ascii_case(name)
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognized bytes are kept; the recognizer demotes around them
            Err(()) => SyntaxKind::UNKNOWN,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

/// Decode a quoted-string token into its value.
///
/// Returns `None` for unterminated strings and for escapes other than `\"`
/// and `\\`. Such strings are never modeled, so regenerating a script cannot
/// reinterpret their bytes.
pub fn string_value(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                escaped @ ('"' | '\\') => value.push(escaped),
                _ => return None,
            },
            '"' => return None,
            c => value.push(c),
        }
    }
    Some(value)
}

/// Encode a value as a quoted-string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_whitespace_and_newlines() {
        let tokens = lex("  \t\n\r\n");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::WHITESPACE, "  \t"),
                token(SyntaxKind::NEWLINE, "\n"),
                token(SyntaxKind::NEWLINE, "\r\n"),
            ]
        );
    }

    #[test]
    fn lex_require_statement() {
        let tokens = lex(r#"require ["fileinto", "copy"];"#);
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::IDENT, "require"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::L_BRACKET, "["),
                token(SyntaxKind::STRING, "\"fileinto\""),
                token(SyntaxKind::COMMA, ","),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::STRING, "\"copy\""),
                token(SyntaxKind::R_BRACKET, "]"),
                token(SyntaxKind::SEMICOLON, ";"),
            ]
        );
    }

    #[test]
    fn lex_test_with_tags() {
        let tokens = lex(r#"address :contains "from" "github.com""#);
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::IDENT, "address"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::TAG, ":contains"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::STRING, "\"from\""),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::STRING, "\"github.com\""),
            ]
        );
    }

    #[test]
    fn lex_punctuation() {
        let tokens = lex("{}(),;");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::L_BRACE,
                SyntaxKind::R_BRACE,
                SyntaxKind::L_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::COMMA,
                SyntaxKind::SEMICOLON,
            ]
        );
    }

    #[test]
    fn lex_size_with_quantifier() {
        let tokens = lex("size :over 1M");
        assert_eq!(tokens[2], token(SyntaxKind::TAG, ":over"));
        assert_eq!(tokens[4], token(SyntaxKind::NUMBER, "1M"));
    }

    #[test]
    fn lex_hash_comment_stops_before_line_ending() {
        let tokens = lex("# note { not a brace\r\nkeep;");
        assert_eq!(tokens[0], token(SyntaxKind::COMMENT, "# note { not a brace"));
        assert_eq!(tokens[1], token(SyntaxKind::NEWLINE, "\r\n"));
        assert_eq!(tokens[2], token(SyntaxKind::IDENT, "keep"));
    }

    #[test]
    fn lex_escaped_quote_stays_in_string() {
        let tokens = lex(r#""say \"hi\" \\ bye" x"#);
        assert_eq!(tokens[0], token(SyntaxKind::STRING, r#""say \"hi\" \\ bye""#));
        assert_eq!(tokens[2], token(SyntaxKind::IDENT, "x"));
    }

    #[test]
    fn lex_block_comment_spans_lines() {
        let tokens = lex("/* a\n } b */keep");
        assert_eq!(tokens[0], token(SyntaxKind::BLOCK_COMMENT, "/* a\n } b */"));
        assert_eq!(tokens[1], token(SyntaxKind::IDENT, "keep"));
    }

    #[test]
    fn lex_multiline_string() {
        let input = "text:\nline one }\n..dotted\n.\nstop;";
        let tokens = lex(input);
        assert_eq!(
            tokens[0],
            token(SyntaxKind::MULTILINE_STRING, "text:\nline one }\n..dotted\n.\n")
        );
        assert_eq!(tokens[1], token(SyntaxKind::IDENT, "stop"));
    }

    #[rstest]
    #[case::string("\"never closed { }", SyntaxKind::STRING)]
    #[case::block_comment("/* never closed", SyntaxKind::BLOCK_COMMENT)]
    #[case::multiline("text:\nno terminator\n", SyntaxKind::MULTILINE_STRING)]
    fn unterminated_literals_run_to_end_of_input(#[case] input: &str, #[case] kind: SyntaxKind) {
        assert_eq!(lex(input), vec![token(kind, input)]);
    }

    #[test]
    fn unknown_bytes_are_kept() {
        let tokens = lex("keep; @ ~");
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::UNKNOWN));
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, "keep; @ ~");
    }

    #[test]
    fn keywords_and_tags_ignore_case() {
        let tokens = lex("IF :Contains");
        assert!(tokens[0].is_keyword("if"));
        assert!(tokens[2].is_tag("contains"));
        assert!(!tokens[2].is_tag("is"));
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "require \"fileinto\";\n# c\nif anyof (header :is \"x\" \"y\", size :over 10K) {\n\tfileinto \"A\"; /* b */\n}\n";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "if header :is \"a\" \"b\" { stop; }";
        let tokens = lex_with_spans(input);
        for (token, span) in &tokens {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }

    #[rstest]
    #[case("\"plain\"", Some("plain"))]
    #[case(r#""a \"q\" b""#, Some(r#"a "q" b"#))]
    #[case(r#""\\Seen""#, Some(r"\Seen"))]
    #[case(r#""\Seen""#, None)]
    #[case("\"open", None)]
    fn string_values(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(string_value(text).as_deref(), expected);
    }

    #[test]
    fn quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote(r#"Folder"Name\x"#), r#""Folder\"Name\\x""#);
        assert_eq!(string_value(&quote(r#"a"b\c"#)).as_deref(), Some(r#"a"b\c"#));
    }
}
