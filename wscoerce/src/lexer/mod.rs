//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::error::{CoerceError, Result};
use crate::span::Span;
use logos::Logos;

/// Tokenize literal text
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let slice = lexer.slice();
                let message = if slice.starts_with(|c: char| c.is_ascii_digit()) {
                    format!("numeric literal out of range: {slice}")
                } else if slice.starts_with(['"', '\'']) {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character: {slice:?}")
                };
                return Err(CoerceError::lexer(message, span));
            }
        }
    }

    Ok(tokens)
}
