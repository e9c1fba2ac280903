//! Token definitions for literal text

use logos::Logos;

/// Literal token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    NoneKw,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| {
        lex.slice().replace('_', "").parse::<f64>().ok()
    }, priority = 3)]
    FloatLit(f64),

    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| radix_int(lex.slice(), 16), priority = 3)]
    #[regex(r"0[oO][0-7][0-7_]*", |lex| radix_int(lex.slice(), 8), priority = 3)]
    #[regex(r"0[bB][01][01_]*", |lex| radix_int(lex.slice(), 2), priority = 3)]
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<u64>().ok(), priority = 2)]
    IntLit(u64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unescape(lex.slice()))]
    StringLit(String),

    /// Bare names are never evaluated; they only make for better parse errors
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
}

/// Integer magnitude; the sign is a separate token
fn radix_int(slice: &str, radix: u32) -> Option<u64> {
    u64::from_str_radix(&slice[2..].replace('_', ""), radix).ok()
}

/// Strip the quotes and resolve escapes; unknown escapes are kept verbatim
fn unescape(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(quoted @ ('\\' | '"' | '\'')) => result.push(quoted),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::NoneKw => write!(f, "None"),
            Token::FloatLit(x) => write!(f, "{x:?}"),
            Token::IntLit(n) => write!(f, "{n}"),
            Token::StringLit(s) => write!(f, "{s:?}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
        }
    }
}
