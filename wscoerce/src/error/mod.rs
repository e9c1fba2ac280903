//! Error types and reporting

use crate::span::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CoerceError>;

/// Errors raised by catalog lookups, literal parsing and value coercion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// Index outside a host table
    #[error("Lookup error: index {index} out of range for {table} table of length {len}")]
    Lookup {
        table: &'static str,
        index: usize,
        len: usize,
    },

    /// Name missing from a catalog or the group table
    #[error("Lookup error: no {table} named `{name}`{hint}")]
    UnknownName {
        table: &'static str,
        name: String,
        hint: String,
    },

    /// Value cannot be shaped into the group's representation
    #[error("Conversion error for group {group}: {message}")]
    Conversion { group: String, message: String },

    /// Tensor group reached through a numeric group index
    #[error("Conversion error for group {group}: tensor rank must be given by the group name")]
    TensorRankUnavailable { group: String },

    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    /// Malformed host description
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl CoerceError {
    pub fn lookup(table: &'static str, index: usize, len: usize) -> Self {
        Self::Lookup { table, index, len }
    }

    /// Unknown name, with a "did you mean" hint drawn from `candidates`
    pub fn unknown_name<'a>(
        table: &'static str,
        name: impl Into<String>,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let name = name.into();
        let candidates: Vec<&str> = candidates.into_iter().collect();
        let suggestion = crate::util::find_similar_name(&name, &candidates, 3);
        Self::UnknownName {
            table,
            name,
            hint: crate::util::format_suggestion_hint(suggestion),
        }
    }

    pub fn conversion(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            group: group.into(),
            message: message.into(),
        }
    }

    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// True for invalid-index and unknown-name failures
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. } | Self::UnknownName { .. })
    }

    /// True when a value could not be shaped into its group
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Self::Conversion { .. } | Self::TensorRankUnavailable { .. }
        )
    }

    pub fn message(&self) -> String {
        match self {
            Self::Lexer { message, .. }
            | Self::Parser { message, .. }
            | Self::Conversion { message, .. }
            | Self::Config { message }
            | Self::Io { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for CoerceError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<toml::de::Error> for CoerceError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.message().to_string())
    }
}

/// Report error with ariadne
pub fn report_error(source_name: &str, source: &str, error: &CoerceError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        CoerceError::Lookup { .. } | CoerceError::UnknownName { .. } => "Lookup",
        CoerceError::Conversion { .. } | CoerceError::TensorRankUnavailable { .. } => {
            "Conversion"
        }
        CoerceError::Lexer { .. } => "Lexer",
        CoerceError::Parser { .. } => "Parser",
        CoerceError::Config { .. } => "Config",
        CoerceError::Io { .. } => "IO",
    };

    let printed = if let Some(span) = error.span() {
        let end = span.end.max(span.start + 1).min(source.len().max(1));
        let start = span.start.min(end);
        Report::build(ReportKind::Error, (source_name, start..end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((source_name, start..end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((source_name, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (source_name, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .eprint((source_name, Source::from(source)))
    };

    if printed.is_err() {
        eprintln!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_display() {
        let err = CoerceError::lookup("variable", 7, 3);
        assert_eq!(
            err.to_string(),
            "Lookup error: index 7 out of range for variable table of length 3"
        );
        assert!(err.is_lookup());
        assert!(!err.is_conversion());
    }

    #[test]
    fn test_unknown_name_with_hint() {
        let err = CoerceError::unknown_name("group", "Vectr", ["Vector", "Matrix"]);
        assert!(err.to_string().contains("did you mean `Vector`?"));
    }

    #[test]
    fn test_unknown_name_without_hint() {
        let err = CoerceError::unknown_name("method", "zzzzzzzz", ["Vector"]);
        assert_eq!(err.to_string(), "Lookup error: no method named `zzzzzzzz`");
    }

    #[test]
    fn test_conversion_message() {
        let err = CoerceError::conversion("Vector", "ragged nested sequence");
        assert!(err.is_conversion());
        assert_eq!(err.message(), "ragged nested sequence");
        assert!(err.to_string().contains("Vector"));
    }

    #[test]
    fn test_tensor_rank_unavailable_is_conversion() {
        let err = CoerceError::TensorRankUnavailable {
            group: "Tensor3".to_string(),
        };
        assert!(err.is_conversion());
        assert!(err.span().is_none());
    }

    #[test]
    fn test_span_only_for_literal_errors() {
        let err = CoerceError::parser("unexpected `]`", Span::new(2, 3));
        assert_eq!(err.span(), Some(Span::new(2, 3)));
        assert!(CoerceError::config("bad").span().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: CoerceError = io.into();
        assert!(matches!(err, CoerceError::Io { .. }));
        assert!(err.message().contains("missing.toml"));
    }
}
