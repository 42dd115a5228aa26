//! Flow Grammar Parser
//!
//! Compiles pipe-delimited flow lines into [`Input`] and [`Output`]
//! descriptors by resolving each token against the [`Registry`].
//!
//! # Grammar
//!
//! ```text
//! input  = source ( "|" modifier )* "|" format
//! output = format ( "|" modifier )* "|" sink
//! ```
//!
//! Tokens are typed by position: the first and last token are always the
//! endpoints, everything in between is a modifier in declaration order.
//! Tokens are matched exactly against registry keys - no trimming, no case
//! folding. The separator cannot be escaped, so a registry key containing
//! `|` can never be referenced.
//!
//! # Examples
//!
//! ```text
//! tcp|http           source "tcp", no modifiers, format "http"
//! gcs|gzip|json      source "gcs", modifier "gzip", format "json"
//! json|gzip|gcs      format "json", modifier "gzip", sink "gcs"
//! ```
//!
//! # Failure
//!
//! Parsing fails fast. The first empty line, unknown token or failing
//! constructor aborts the call and nothing partially built is returned.
//! Components constructed before the failure are dropped.

use std::fmt;

use tracing::{debug, info};

use reel_config::FlowConfig;

use crate::error::{FlowError, Result, Role, Side};
use crate::modifier::{InputModifiers, OutputModifiers};
use crate::pipe::{Flow, Input, Output};
use crate::registry::Registry;

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;

/// Character separating the tokens of a flow line
pub const SEPARATOR: char = '|';

/// Minimum number of tokens in a flow line (two endpoints)
pub const MIN_PARTS: usize = 2;

/// A flow line split into its positional parts
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tokens<'a> {
    head: &'a str,
    interior: Vec<&'a str>,
    tail: &'a str,
}

/// Split `line` into head, interior and tail tokens
fn tokenize(side: Side, line: &str) -> Result<Tokens<'_>> {
    if line.is_empty() {
        return Err(FlowError::Empty(side));
    }

    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    match parts.as_slice() {
        [head, interior @ .., tail] => Ok(Tokens {
            head: *head,
            interior: interior.to_vec(),
            tail: *tail,
        }),
        _ => Err(incomplete(side, line)),
    }
}

fn incomplete(side: Side, line: &str) -> FlowError {
    FlowError::Incomplete {
        side,
        line: line.to_string(),
        min: MIN_PARTS,
        separator: SEPARATOR,
    }
}

/// Builds flows from flow lines using a registry
///
/// The parser holds no state of its own; one parser can serve any number
/// of calls, from any number of threads when `C` allows it.
pub struct Parser<'r, C> {
    registry: &'r Registry<C>,
}

impl<'r, C> Parser<'r, C> {
    /// Create a parser resolving tokens against `registry`
    pub fn new(registry: &'r Registry<C>) -> Self {
        Self { registry }
    }

    /// The registry tokens are resolved against
    pub fn registry(&self) -> &'r Registry<C> {
        self.registry
    }

    /// Parse an input line: `source[|modifier]*|format`
    ///
    /// Resolves the source, then the format, then the modifiers left to
    /// right, running each constructor as soon as its token resolves.
    pub fn parse_input(&self, ctx: &C, line: &str) -> Result<Input> {
        let tokens = tokenize(Side::Input, line)?;

        let source = self.registry.sources.create(tokens.head, ctx)?;
        debug!(role = %Role::Source, name = tokens.head, "resolved flow component");

        let format = self.registry.input_formats.create(tokens.tail, ctx)?;
        debug!(role = %Role::InputFormat, name = tokens.tail, "resolved flow component");

        let mut modifiers = InputModifiers::empty();
        for name in tokens.interior {
            modifiers.push(self.registry.input_modifiers.create(name, ctx)?);
            debug!(role = %Role::InputModifier, name, "resolved flow component");
        }

        Ok(Input::new(source, modifiers, format))
    }

    /// Parse an output line: `format[|modifier]*|sink`
    ///
    /// Resolves the format, then the sink, then the modifiers left to
    /// right, running each constructor as soon as its token resolves.
    pub fn parse_output(&self, ctx: &C, line: &str) -> Result<Output> {
        let tokens = tokenize(Side::Output, line)?;

        let format = self.registry.output_formats.create(tokens.head, ctx)?;
        debug!(role = %Role::OutputFormat, name = tokens.head, "resolved flow component");

        let sink = self.registry.sinks.create(tokens.tail, ctx)?;
        debug!(role = %Role::Sink, name = tokens.tail, "resolved flow component");

        let mut modifiers = OutputModifiers::empty();
        for name in tokens.interior {
            modifiers.push(self.registry.output_modifiers.create(name, ctx)?);
            debug!(role = %Role::OutputModifier, name, "resolved flow component");
        }

        Ok(Output::new(format, modifiers, sink))
    }

    /// Parse output lines independently, in declaration order
    ///
    /// # Errors
    /// The first failing line, wrapped with its index.
    pub fn parse_outputs<S: AsRef<str>>(&self, ctx: &C, lines: &[S]) -> Result<Vec<Output>> {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                self.parse_output(ctx, line.as_ref())
                    .map_err(|e| FlowError::line(Side::Output, index, e))
            })
            .collect()
    }

    /// Parse an input line and one or more output lines into a flow
    ///
    /// Either the whole flow is built or nothing is returned. The input line
    /// is parsed first, so its errors win over `NoOutputs`.
    pub fn parse<S: AsRef<str>>(
        &self,
        ctx: &C,
        input_line: &str,
        output_lines: &[S],
    ) -> Result<Flow> {
        let input = self
            .parse_input(ctx, input_line)
            .map_err(|e| FlowError::line(Side::Input, 0, e))?;

        if output_lines.is_empty() {
            return Err(FlowError::NoOutputs);
        }

        let outputs = self.parse_outputs(ctx, output_lines)?;
        let flow = Flow::new(input, outputs)?;

        info!(
            input = input_line,
            outputs = flow.outputs().len(),
            "flow assembled"
        );

        Ok(flow)
    }

    /// Parse a flow declared in configuration
    pub fn parse_config(&self, ctx: &C, config: &FlowConfig) -> Result<Flow> {
        self.parse(ctx, &config.input, config.outputs.as_slice())
    }
}

impl<C> fmt::Debug for Parser<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("registry", self.registry)
            .finish()
    }
}
