//! Shared chumsky parser utilities for the trace script
//!
//! The script is line oriented, so none of these consume newlines.

use chumsky::prelude::*;

/// Parser error type used throughout the trace grammar
pub type ParseExtra<'src> = extra::Err<Rich<'src, char>>;

/// Parse inline whitespace only (spaces and tabs, no newlines).
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), ParseExtra<'src>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse required inline whitespace (at least one space or tab).
pub fn inline_whitespace_required<'src>(
) -> impl Parser<'src, &'src str, (), ParseExtra<'src>> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

/// Parse a `#` comment running to the end of the line.
pub fn hash_comment<'src>() -> impl Parser<'src, &'src str, (), ParseExtra<'src>> + Clone {
    just('#').ignore_then(none_of('\n').repeated()).ignored()
}

/// Parse an identifier (letters, digits and underscores, not starting with a digit).
pub fn identifier<'src>() -> impl Parser<'src, &'src str, String, ParseExtra<'src>> + Clone {
    text::ascii::ident().map(|s: &str| s.to_string())
}

/// Parse a double-quoted string, returning its contents.
pub fn quoted_string<'src>() -> impl Parser<'src, &'src str, String, ParseExtra<'src>> + Clone {
    just('"')
        .ignore_then(none_of("\"\n").repeated().to_slice())
        .then_ignore(just('"'))
        .map(|s: &str| s.to_string())
}

/// Parse a bare token: anything up to whitespace or punctuation.
pub fn bare_token<'src>() -> impl Parser<'src, &'src str, String, ParseExtra<'src>> + Clone {
    none_of(" \t\n#,=()\"")
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_whitespace() {
        let parser = inline_whitespace().then(just("test")).then_ignore(end());
        assert!(parser.parse("test").into_result().is_ok());
        assert!(parser.parse(" \ttest").into_result().is_ok());
        // Should NOT consume newlines
        assert!(parser.parse("\ntest").into_result().is_err());
    }

    #[test]
    fn test_inline_whitespace_required() {
        let parser = just("a")
            .then(inline_whitespace_required())
            .then(just("b"))
            .then_ignore(end());
        assert!(parser.parse("a b").into_result().is_ok());
        assert!(parser.parse("a \t b").into_result().is_ok());
        assert!(parser.parse("ab").into_result().is_err());
    }

    #[test]
    fn test_hash_comment() {
        let parser = hash_comment().then_ignore(end());
        assert!(parser.parse("# a comment").into_result().is_ok());
        assert!(parser.parse("#").into_result().is_ok());
        assert!(parser.parse("% not a comment").into_result().is_err());
    }

    #[test]
    fn test_quoted_string() {
        let parser = quoted_string().then_ignore(end());
        assert_eq!(
            parser.parse("\"hello world\"").into_result().ok(),
            Some("hello world".to_string())
        );
        assert!(parser.parse("\"unterminated").into_result().is_err());
    }

    #[test]
    fn test_bare_token() {
        let parser = bare_token().then_ignore(end());
        assert_eq!(parser.parse("3.14").into_result().ok(), Some("3.14".to_string()));
        assert_eq!(parser.parse("[1]").into_result().ok(), Some("[1]".to_string()));
        assert!(parser.parse("a,b").into_result().is_err());
    }
}
