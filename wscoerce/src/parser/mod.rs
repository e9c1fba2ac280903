//! Generic literal parser using lalrpop
//!
//! This is the fallback interpretation of text handed to the coercer:
//! numbers, strings, `True`/`False`/`None` and (possibly nested) lists or
//! tuples. Nothing is ever evaluated; bare names are rejected.

use crate::error::{CoerceError, Result};
use crate::lexer::{Token, tokenize};
use crate::span::Span;
use crate::value::Value;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

/// Deepest bracket nesting accepted in literal text
pub const MAX_NESTING_DEPTH: usize = 200;

/// Failure raised from grammar actions
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LiteralError {
    pub(crate) message: &'static str,
    pub(crate) span: Span,
}

/// Number with its sign folded but not yet range-checked
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SignedNumber {
    Int(i128),
    Float(f64),
}

impl SignedNumber {
    pub(crate) fn negate(self) -> Self {
        match self {
            SignedNumber::Int(n) => SignedNumber::Int(-n),
            SignedNumber::Float(x) => SignedNumber::Float(-x),
        }
    }

    pub(crate) fn into_value(self) -> std::result::Result<Value, &'static str> {
        match self {
            SignedNumber::Int(n) => i64::try_from(n)
                .map(Value::Int)
                .map_err(|_| "integer literal out of range for int64"),
            SignedNumber::Float(x) => Ok(Value::Float(x)),
        }
    }
}

/// Parse literal text into a value
pub fn parse_literal(source: &str) -> Result<Value> {
    let tokens = tokenize(source)?;
    parse(tokens)
}

/// Parse an already tokenized literal
pub fn parse(tokens: Vec<(Token, Span)>) -> Result<Value> {
    check_nesting(&tokens)?;
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    grammar::LiteralParser::new().parse(token_iter).map_err(|e| {
        use lalrpop_util::ParseError;
        match e {
            ParseError::InvalidToken { location } => {
                CoerceError::parser("invalid token", Span::new(location, location + 1))
            }
            ParseError::UnrecognizedEof { location, .. } => {
                CoerceError::parser("unexpected end of input", Span::point(location))
            }
            ParseError::UnrecognizedToken {
                token: (start, Token::Ident(name), end),
                ..
            } => CoerceError::parser(
                format!("`{name}` is not a literal; names are never evaluated"),
                Span::new(start, end),
            ),
            ParseError::UnrecognizedToken {
                token: (start, tok, end),
                ..
            } => CoerceError::parser(format!("unexpected `{tok}`"), Span::new(start, end)),
            ParseError::ExtraToken {
                token: (start, tok, end),
            } => CoerceError::parser(
                format!("unexpected `{tok}` after complete literal"),
                Span::new(start, end),
            ),
            ParseError::User { error } => CoerceError::parser(error.message, error.span),
        }
    })
}

/// Nested values are built, cloned and dropped recursively, so depth is
/// bounded before any of them exist
fn check_nesting(tokens: &[(Token, Span)]) -> Result<()> {
    let mut depth = 0usize;
    for (tok, span) in tokens {
        match tok {
            Token::LBracket | Token::LParen => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(CoerceError::parser(
                        format!("too deeply nested: more than {MAX_NESTING_DEPTH} levels of brackets"),
                        *span,
                    ));
                }
            }
            Token::RBracket | Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}
