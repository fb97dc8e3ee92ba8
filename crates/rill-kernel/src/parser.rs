//! Parser for rill source code.
//!
//! A hand-written recursive-descent parser over the token stream from
//! [`crate::lexer`]. The grammar is small enough that a generator would
//! be more machinery than the language:
//!
//! ```text
//! program    := (statement (NEWLINE | ';')*)*
//! statement  := IDENT '=' expr          (assignment)
//!             | pipeline
//! pipeline   := command ('|' command)*
//! command    := varref ':' IDENT arg*   (pipe method stage)
//!             | IDENT arg*              (tool invocation)
//! arg        := '--' LONGFLAG | '-' SHORTFLAG
//!             | IDENT '=' atom          (named argument)
//!             | atom
//! atom       := INT | FLOAT | STRING | 'true' | 'false'
//!             | varref | '$?' | '$(' pipeline ')'
//!             | IDENT                   (bare word)
//! ```

use std::fmt;

use logos::Span;

use crate::ast::{
    Arg, Assignment, Command, CommandHead, Expr, Pipeline, PipeMethod, Program, Stmt, StringPart,
    Value,
};
use crate::lexer::{tokenize, Spanned, Token};

/// A parse error with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}..{}: {}", self.span.start, self.span.end, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse source text into a [`Program`].
pub fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
    let tokens = tokenize(source).map_err(|errs| {
        errs.into_iter()
            .map(|e| ParseError::new(e.token.to_string(), e.span))
            .collect::<Vec<_>>()
    })?;

    Parser::new(tokens, source.len())
        .parse_program()
        .map_err(|e| vec![e])
}

struct Parser {
    tokens: Vec<Spanned<Token>>,
    pos: usize,
    /// Source length, used for end-of-input error spans.
    end: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned<Token>>, end: usize) -> Self {
        Self { tokens, pos: 0, end }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|s| &s.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|s| s.span.clone())
            .unwrap_or(self.end..self.end)
    }

    fn bump(&mut self) -> Option<Spanned<Token>> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_span())
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(Token::Newline) | Some(Token::Semi)) {
            self.pos += 1;
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        self.skip_separators();

        while !self.at_end() {
            statements.push(self.parse_statement()?);

            // Each statement must end at a separator or end of input.
            match self.peek() {
                None => break,
                Some(Token::Newline) | Some(Token::Semi) => self.skip_separators(),
                Some(t) => {
                    return Err(self.error(format!("unexpected token after statement: {:?}", t)))
                }
            }
        }

        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        // Assignment needs two tokens of lookahead: IDENT '='.
        if let (Some(Token::Ident(_)), Some(Token::Eq)) = (self.peek(), self.peek_at(1)) {
            let name = match self.bump().map(|s| s.token) {
                Some(Token::Ident(name)) => name,
                _ => return Err(self.error("expected identifier")),
            };
            self.bump(); // '='
            let value = self.parse_atom()?;
            return Ok(Stmt::Assignment(Assignment { name, value }));
        }

        Ok(Stmt::Pipeline(self.parse_pipeline()?))
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline, ParseError> {
        let mut commands = vec![self.parse_command()?];

        while matches!(self.peek(), Some(Token::Pipe)) {
            self.bump();
            commands.push(self.parse_command()?);
        }

        Ok(Pipeline { commands })
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let head = match self.peek() {
            // `$P:method` — a pipe method stage.
            Some(Token::SimpleVarRef(_)) | Some(Token::VarRef(_)) => {
                let target = match self.bump().map(|s| s.token) {
                    Some(Token::SimpleVarRef(name)) | Some(Token::VarRef(name)) => name,
                    _ => return Err(self.error("expected variable reference")),
                };
                match self.peek() {
                    Some(Token::Colon) => {
                        self.bump();
                    }
                    _ => {
                        return Err(self.error(format!(
                            "expected ':' and a method after ${}",
                            target
                        )))
                    }
                }
                let method_name = match self.bump().map(|s| s.token) {
                    Some(Token::Ident(name)) => name,
                    _ => return Err(self.error("expected method name after ':'")),
                };
                let method = PipeMethod::from_name(&method_name).ok_or_else(|| {
                    self.error(format!("unknown pipe method: {}", method_name))
                })?;
                CommandHead::Method { target, method }
            }
            Some(Token::Ident(_)) => match self.bump().map(|s| s.token) {
                Some(Token::Ident(name)) => CommandHead::Tool(name),
                _ => return Err(self.error("expected command name")),
            },
            Some(Token::True) => {
                self.bump();
                CommandHead::Tool("true".into())
            }
            Some(Token::False) => {
                self.bump();
                CommandHead::Tool("false".into())
            }
            Some(t) => return Err(self.error(format!("expected command, found {:?}", t))),
            None => return Err(self.error("expected command")),
        };

        let mut args = Vec::new();
        loop {
            match self.peek() {
                None
                | Some(Token::Pipe)
                | Some(Token::RParen)
                | Some(Token::Newline)
                | Some(Token::Semi) => break,
                _ => args.push(self.parse_arg()?),
            }
        }

        Ok(Command { head, args })
    }

    fn parse_arg(&mut self) -> Result<Arg, ParseError> {
        match self.peek() {
            Some(Token::LongFlag(_)) => match self.bump().map(|s| s.token) {
                Some(Token::LongFlag(name)) => Ok(Arg::LongFlag(name)),
                _ => Err(self.error("expected flag")),
            },
            Some(Token::ShortFlag(_)) => match self.bump().map(|s| s.token) {
                Some(Token::ShortFlag(name)) => Ok(Arg::ShortFlag(name)),
                _ => Err(self.error("expected flag")),
            },
            // `key=value` — named argument.
            Some(Token::Ident(_)) if matches!(self.peek_at(1), Some(Token::Eq)) => {
                let key = match self.bump().map(|s| s.token) {
                    Some(Token::Ident(key)) => key,
                    _ => return Err(self.error("expected argument name")),
                };
                self.bump(); // '='
                let value = self.parse_atom()?;
                Ok(Arg::Named { key, value })
            }
            _ => Ok(Arg::Positional(self.parse_atom()?)),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.bump().map(|s| s.token) {
            Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Token::Float(f)) => Ok(Expr::Literal(Value::Float(f))),
            Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::SingleString(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::String(s)) => Ok(parse_interpolated(&s)),
            Some(Token::SimpleVarRef(name)) => Ok(Expr::VarRef(name)),
            Some(Token::VarRef(name)) => {
                if is_valid_var_name(&name) {
                    Ok(Expr::VarRef(name))
                } else {
                    Err(ParseError::new(
                        format!("invalid variable name: {}", name),
                        span,
                    ))
                }
            }
            Some(Token::LastStatus) => Ok(Expr::VarRef("?".into())),
            // Bare words are string arguments: `echo hello`.
            Some(Token::Ident(word)) => Ok(Expr::Literal(Value::String(word))),
            Some(Token::CmdSubstStart) => {
                let pipeline = self.parse_pipeline()?;
                match self.bump().map(|s| s.token) {
                    Some(Token::RParen) => Ok(Expr::CommandSubst(Box::new(pipeline))),
                    _ => Err(ParseError::new("expected ')' to close '$('", span)),
                }
            }
            Some(t) => Err(ParseError::new(format!("expected value, found {:?}", t), span)),
            None => Err(ParseError::new("expected value", span)),
        }
    }
}

fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a double-quoted string body into literal and `$VAR` parts.
///
/// `\$` (preserved by the lexer) becomes a literal dollar sign.
/// A string with no variable parts collapses to a plain literal.
fn parse_interpolated(s: &str) -> Expr {
    let mut parts: Vec<StringPart> = Vec::new();
    let mut literal = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&'$') {
            chars.next();
            literal.push('$');
            continue;
        }
        if ch != '$' {
            literal.push(ch);
            continue;
        }

        // `${NAME}` form.
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if closed && is_valid_var_name(&name) {
                if !literal.is_empty() {
                    parts.push(StringPart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(StringPart::Var(name));
            } else {
                // Not a reference after all; keep the text as written.
                literal.push_str("${");
                literal.push_str(&name);
                if closed {
                    literal.push('}');
                }
            }
            continue;
        }

        // `$NAME` form.
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            literal.push('$');
            literal.push_str(&name);
        } else {
            if !literal.is_empty() {
                parts.push(StringPart::Literal(std::mem::take(&mut literal)));
            }
            parts.push(StringPart::Var(name));
        }
    }

    if !literal.is_empty() {
        parts.push(StringPart::Literal(literal));
    }

    if parts.iter().any(|p| matches!(p, StringPart::Var(_))) {
        Expr::Interpolated(parts)
    } else {
        let text = parts
            .into_iter()
            .map(|p| match p {
                StringPart::Literal(s) => s,
                StringPart::Var(_) => String::new(),
            })
            .collect::<String>();
        Expr::Literal(Value::String(text))
    }
}
