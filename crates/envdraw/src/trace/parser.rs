//! Trace script parser
//!
//! One statement per line:
//!
//! ```text
//! def square(x)          # function defined in the current frame
//! set n = 3              # bind a name in the current frame
//! set f = square         # bare tokens naming a defined function bind to it
//! call square(n)         # enter a call, binding parameters in order
//! return result = 9      # bind final locals, then leave the frame
//! ```

use chumsky::prelude::*;
use tracing::{debug, trace};

use super::{TraceEvent, TraceStep, TraceValue};
use crate::core::{
    bare_token, hash_comment, identifier, inline_whitespace, inline_whitespace_required,
    quoted_string, DiagramError, ParseExtra,
};

type Result<T> = std::result::Result<T, DiagramError>;

/// Parser for the line-oriented trace script
pub struct TraceParser;

impl TraceParser {
    pub fn new() -> Self {
        Self
    }

    fn value<'src>() -> impl Parser<'src, &'src str, TraceValue, ParseExtra<'src>> + Clone {
        quoted_string()
            .map(TraceValue::Quoted)
            .or(bare_token().map(TraceValue::Token))
    }

    /// `(a, b, ...)` with any inline spacing
    fn parenthesized<'src, T, P>(item: P) -> impl Parser<'src, &'src str, Vec<T>, ParseExtra<'src>> + Clone
    where
        P: Parser<'src, &'src str, T, ParseExtra<'src>> + Clone,
    {
        just('(')
            .then_ignore(inline_whitespace())
            .ignore_then(
                item.padded_by(inline_whitespace())
                    .separated_by(just(','))
                    .allow_trailing()
                    .collect::<Vec<_>>(),
            )
            .then_ignore(just(')'))
    }

    fn define<'src>() -> impl Parser<'src, &'src str, TraceEvent, ParseExtra<'src>> + Clone {
        just("def")
            .then(inline_whitespace_required())
            .ignore_then(identifier())
            .then_ignore(inline_whitespace())
            .then(Self::parenthesized(identifier()))
            .map(|(name, args)| TraceEvent::Define { name, args })
    }

    fn assign<'src>() -> impl Parser<'src, &'src str, TraceEvent, ParseExtra<'src>> + Clone {
        just("set")
            .then(inline_whitespace_required())
            .ignore_then(identifier())
            .then_ignore(just('=').padded_by(inline_whitespace()))
            .then(Self::value())
            .map(|(name, value)| TraceEvent::Assign { name, value })
    }

    fn call<'src>() -> impl Parser<'src, &'src str, TraceEvent, ParseExtra<'src>> + Clone {
        just("call")
            .then(inline_whitespace_required())
            .ignore_then(identifier())
            .then(
                inline_whitespace()
                    .ignore_then(Self::parenthesized(Self::value()))
                    .or_not(),
            )
            .map(|(function, args)| TraceEvent::EnterCall {
                function,
                args: args.unwrap_or_default(),
            })
    }

    fn exit<'src>() -> impl Parser<'src, &'src str, TraceEvent, ParseExtra<'src>> + Clone {
        let pair = identifier()
            .then_ignore(just('=').padded_by(inline_whitespace()))
            .then(Self::value());

        just("return")
            .ignore_then(
                inline_whitespace_required()
                    .ignore_then(
                        pair.separated_by(just(',').padded_by(inline_whitespace()))
                            .at_least(1)
                            .collect::<Vec<_>>(),
                    )
                    .or_not(),
            )
            .map(|bindings| TraceEvent::ExitCall {
                bindings: bindings.unwrap_or_default(),
            })
    }

    /// A whole line: an optional statement, then an optional comment
    fn line<'src>() -> impl Parser<'src, &'src str, Option<TraceEvent>, ParseExtra<'src>> + Clone {
        let statement = choice((Self::define(), Self::assign(), Self::call(), Self::exit()));

        inline_whitespace()
            .ignore_then(statement.or_not())
            .then_ignore(inline_whitespace())
            .then_ignore(hash_comment().or_not())
            .then_ignore(end())
    }

    /// Parse a single line; `number` is 1-based and only used in errors
    pub fn parse_line(&self, line: &str, number: usize) -> Result<Option<TraceEvent>> {
        Self::line().parse(line).into_result().map_err(|errors| {
            let (message, offset) = errors
                .first()
                .map(|e| (e.to_string(), e.span().start))
                .unwrap_or_else(|| ("invalid statement".to_string(), 0));
            let column = line[..offset.min(line.len())].chars().count() + 1;
            DiagramError::script_error(message, number, column)
        })
    }

    /// Parse a whole script, stopping at the first syntax error
    pub fn parse(&self, input: &str) -> Result<Vec<TraceStep>> {
        let mut steps = Vec::new();
        for (index, line) in input.lines().enumerate() {
            let number = index + 1;
            if let Some(event) = self.parse_line(line, number)? {
                trace!(line = number, event = event.name(), "parsed trace event");
                steps.push(TraceStep {
                    line: number,
                    event,
                });
            }
        }
        debug!(steps = steps.len(), "parsed trace script");
        Ok(steps)
    }
}

impl Default for TraceParser {
    fn default() -> Self {
        Self::new()
    }
}
