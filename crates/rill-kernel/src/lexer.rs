//! Lexer for rill source code.
//!
//! Converts source text into a stream of tokens using the logos lexer
//! generator. The surface is small, so the token set is too:
//!
//! - **Literals**: strings, integers, floats, booleans (`true`/`false`)
//! - **Operators**: `=`, `|`, `:`
//! - **Variable references**: `$NAME`, `${NAME}`, `$?`
//! - **Command substitution**: `$( ... )`
//! - **Flags**: `-x`, `--long`
//! - **Identifiers**: tool names, bare words, named-argument keys

use logos::{Logos, Span};
use std::fmt;

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub token: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(token: T, span: Span) -> Self {
        Self { token, span }
    }
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexerError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::UnexpectedCharacter => write!(f, "unexpected character"),
            LexerError::UnterminatedString => write!(f, "unterminated string"),
            LexerError::InvalidEscape => write!(f, "invalid escape sequence"),
            LexerError::InvalidNumber => write!(f, "invalid number"),
        }
    }
}

/// Tokens produced by the rill lexer.
///
/// Tokens that carry semantic values (strings, numbers, identifiers)
/// include the parsed value directly, so the parser works with actual
/// data rather than re-slicing source text.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    #[token("true")]
    True,

    #[token("false")]
    False,

    /// Command substitution opener: `$(`.
    #[token("$(")]
    CmdSubstStart,

    #[token(")")]
    RParen,

    #[token("=")]
    Eq,

    #[token("|")]
    Pipe,

    #[token(";")]
    Semi,

    #[token(":")]
    Colon,

    /// Last exit code: `$?`.
    #[token("$?")]
    LastStatus,

    /// Long flag: `--cleanup`.
    #[regex(r"--[a-zA-Z][a-zA-Z0-9-]*", lex_long_flag, priority = 3)]
    LongFlag(String),

    /// Short flag: `-n`.
    #[regex(r"-[a-zA-Z][a-zA-Z0-9]*", lex_short_flag, priority = 3)]
    ShortFlag(String),

    /// Double-quoted string - value has escapes processed, `$` kept raw
    /// for interpolation in the parser.
    #[regex(r#""([^"\\]|\\.)*""#, lex_string)]
    String(String),

    /// Single-quoted string: literal content, no escape processing.
    #[regex(r"'[^']*'", lex_single_string)]
    SingleString(String),

    /// Braced variable reference: `${NAME}` - value is the inner name.
    #[regex(r"\$\{[^}]+\}", lex_varref)]
    VarRef(String),

    /// Simple variable reference: `$NAME` - value is the name.
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*", lex_simple_varref)]
    SimpleVarRef(String),

    /// Integer literal.
    #[regex(r"-?[0-9]+", lex_int, priority = 2)]
    Int(i64),

    /// Float literal.
    #[regex(r"-?[0-9]+\.[0-9]+", lex_float)]
    Float(f64),

    /// Identifier: tool names, bare-word arguments, named-argument keys.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.-]*", lex_ident)]
    Ident(String),

    /// Comment: `#` to end of line. Filtered out by [`tokenize`].
    #[regex(r"#[^\n\r]*")]
    Comment,

    /// Newline - significant, ends statements.
    #[regex(r"\n|\r\n")]
    Newline,
}

fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexerError> {
    parse_string_literal(lex.slice())
}

fn lex_single_string(lex: &mut logos::Lexer<Token>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

/// `${NAME}` → `NAME`
fn lex_varref(lex: &mut logos::Lexer<Token>) -> String {
    let s = lex.slice();
    s[2..s.len() - 1].to_string()
}

/// `$NAME` → `NAME`
fn lex_simple_varref(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice()[1..].to_string()
}

fn lex_long_flag(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice()[2..].to_string()
}

fn lex_short_flag(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice()[1..].to_string()
}

fn lex_int(lex: &mut logos::Lexer<Token>) -> Result<i64, LexerError> {
    lex.slice().parse().map_err(|_| LexerError::InvalidNumber)
}

fn lex_float(lex: &mut logos::Lexer<Token>) -> Result<f64, LexerError> {
    lex.slice().parse().map_err(|_| LexerError::InvalidNumber)
}

fn lex_ident(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

/// Extract the content of a double-quoted string literal.
///
/// Escapes are processed except `\$`, which is kept as-is so the
/// parser's interpolation pass can tell an escaped dollar from a
/// variable reference.
pub fn parse_string_literal(source: &str) -> Result<String, LexerError> {
    if source.len() < 2 || !source.starts_with('"') || !source.ends_with('"') {
        return Err(LexerError::UnterminatedString);
    }

    let inner = &source[1..source.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('$') => result.push_str("\\$"),
                Some(next) => {
                    result.push('\\');
                    result.push(next);
                }
                None => return Err(LexerError::InvalidEscape),
            }
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Tokenize source text, dropping comments.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<Token>>, Vec<Spanned<LexerError>>> {
    let lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, span) in lexer.spanned() {
        match result {
            Ok(Token::Comment) => {}
            Ok(token) => tokens.push(Spanned::new(token, span)),
            Err(err) => errors.push(Spanned::new(err, span)),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
