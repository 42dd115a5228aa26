//! Flow error types
//!
//! Errors raised while parsing flow lines, constructing components and
//! assembling modifier chains.

use std::fmt;
use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Error type returned by component constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Direction of a flow line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Read side: `source|modifier*|format`
    Input,
    /// Write side: `format|modifier*|sink`
    Output,
}

impl Side {
    /// Lowercase name used in error messages and logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a token plays in a flow line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// First token of an input line
    Source,
    /// Interior token of an input line
    InputModifier,
    /// Last token of an input line
    InputFormat,
    /// First token of an output line
    OutputFormat,
    /// Interior token of an output line
    OutputModifier,
    /// Last token of an output line
    Sink,
}

impl Role {
    /// Human-readable role name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::InputModifier => "input modifier",
            Self::InputFormat => "input format",
            Self::OutputFormat => "output format",
            Self::OutputModifier => "output modifier",
            Self::Sink => "sink",
        }
    }

    /// Which side of a flow this role belongs to
    pub const fn side(&self) -> Side {
        match self {
            Self::Source | Self::InputModifier | Self::InputFormat => Side::Input,
            Self::OutputFormat | Self::OutputModifier | Self::Sink => Side::Output,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`FlowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or incomplete line, unknown token, missing outputs
    Grammar,
    /// A resolved constructor failed
    Construction,
    /// A modifier failed to wrap a stream
    Wrap,
    /// A source or sink failed to open a stream
    Open,
}

/// Errors that can occur while building or opening a flow
#[derive(Debug, Error)]
pub enum FlowError {
    /// Line has zero length
    #[error("empty {0}")]
    Empty(Side),

    /// Line has fewer than two tokens
    #[error("incomplete {side} '{line}': expected at least {min} parts separated by '{separator}'")]
    Incomplete {
        /// Side of the line
        side: Side,
        /// The offending line
        line: String,
        /// Minimum number of tokens
        min: usize,
        /// Token separator
        separator: char,
    },

    /// Token not found in the registry table for its role
    #[error("invalid {role}: {name}")]
    Unknown {
        /// Expected role of the token
        role: Role,
        /// The offending token
        name: String,
    },

    /// Registered constructor returned an error
    #[error("failed to create {role} '{name}': {source}")]
    Construct {
        /// Role being constructed
        role: Role,
        /// Registry key that was resolved
        name: String,
        /// Constructor failure
        #[source]
        source: BoxError,
    },

    /// Modifier failed to wrap a stream
    #[error("failed to wrap {side} stream with modifier {position} ('{name}'): {source}")]
    Wrap {
        /// Side of the modifier chain
        side: Side,
        /// 0-based declaration position of the failing modifier
        position: usize,
        /// Name reported by the failing modifier
        name: String,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// Source or sink failed to open a stream
    #[error("failed to open {side} stream: {source}")]
    Open {
        /// Side that failed
        side: Side,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// Error while parsing one line of a flow
    #[error("failed to parse {side} line {index}: {source}")]
    Line {
        /// Side of the line
        side: Side,
        /// 0-based index of the line (always 0 for input)
        index: usize,
        /// Underlying failure
        #[source]
        source: Box<FlowError>,
    },

    /// Flow declared without any output line
    #[error("flow has no outputs - at least one output line is required")]
    NoOutputs,
}

impl FlowError {
    /// Create an Unknown error
    pub fn unknown(role: Role, name: impl Into<String>) -> Self {
        Self::Unknown {
            role,
            name: name.into(),
        }
    }

    /// Create a Construct error
    pub fn construct(role: Role, name: impl Into<String>, source: BoxError) -> Self {
        Self::Construct {
            role,
            name: name.into(),
            source,
        }
    }

    /// Create a Wrap error
    pub fn wrap(side: Side, position: usize, name: impl Into<String>, source: io::Error) -> Self {
        Self::Wrap {
            side,
            position,
            name: name.into(),
            source,
        }
    }

    /// Create an Open error
    pub fn open(side: Side, source: io::Error) -> Self {
        Self::Open { side, source }
    }

    /// Wrap an error with the line it came from
    pub fn line(side: Side, index: usize, source: FlowError) -> Self {
        Self::Line {
            side,
            index,
            source: Box::new(source),
        }
    }

    /// Innermost flow error, looking through `Line` wrappers
    pub fn root(&self) -> &FlowError {
        match self {
            Self::Line { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty(_) | Self::Incomplete { .. } | Self::Unknown { .. } | Self::NoOutputs => {
                ErrorKind::Grammar
            }
            Self::Construct { .. } => ErrorKind::Construction,
            Self::Wrap { .. } => ErrorKind::Wrap,
            Self::Open { .. } => ErrorKind::Open,
            Self::Line { source, .. } => source.kind(),
        }
    }
}
