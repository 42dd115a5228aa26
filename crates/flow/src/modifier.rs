//! Modifier Chain - Stream wrapping
//!
//! A modifier turns one stream into another stream of the same kind, for
//! example a decompressing reader around a raw reader. `Modifiers` composes
//! an ordered list of them around a base stream.
//!
//! # Ordering
//!
//! Modifiers are declared left to right in a flow line, closest to the
//! data's natural point of application first. For `gcs|gzip|json` the gzip
//! modifier must see the raw bytes that leave storage, so it is the
//! innermost wrapper. The chain is therefore built back to front:
//!
//! ```text
//! declared:  [M1, M2, M3]
//! wrapped:   M1(M2(M3(base)))
//! ```
//!
//! The last declared modifier is wrapped first and sits next to the base
//! stream; the first declared modifier is wrapped last and is what the
//! consumer sees. Output chains follow the same rule.
//!
//! # Failure
//!
//! The first failing `wrap` stops the chain. The failing modifier hands the
//! stream it was given back in a [`WrapError`], and the chain returns it to
//! the caller: the base stream inside whatever layers were built before the
//! failure, not closed. Closing it is the job of whoever owns the base
//! stream; [`Input::open`](crate::Input::open) and
//! [`Output::open`](crate::Output::open) close it before reporting the error.

use std::fmt;
use std::io;

use tracing::{debug, trace};

use crate::error::{FlowError, Side};
use crate::stream::{InputReader, OutputWriter};

#[cfg(test)]
#[path = "modifier_test.rs"]
mod tests;

/// Wraps a stream into another stream of the same kind
///
/// `S` is `dyn InputReader` for input modifiers and `dyn OutputWriter` for
/// output modifiers. Implementations must be `Send + Sync` so that a
/// registry can be shared between flows; any per-stream state (a
/// compressor, a buffer) belongs in the returned wrapper.
pub trait Modifier<S: ?Sized>: Send + Sync {
    /// Name of this modifier for logging and error messages
    fn name(&self) -> &str;

    /// Wrap `stream`, returning the new outer stream
    ///
    /// On failure the unwrapped `stream` goes back to the caller inside the
    /// error so it can still be closed.
    fn wrap(&self, stream: Box<S>) -> Result<Box<S>, WrapError<S>>;
}

/// A failed wrap, carrying the stream that was not wrapped
///
/// From a single [`Modifier`], `error` is the I/O failure and `stream` is
/// the stream it was given. From [`Modifiers::wrap`], `error` is a
/// [`FlowError::Wrap`] and `stream` is the partially built chain.
pub struct WrapError<S: ?Sized, E = io::Error> {
    error: E,
    stream: Box<S>,
}

impl<S: ?Sized, E> WrapError<S, E> {
    /// Pair a failure with the stream handed back
    pub fn new(error: E, stream: Box<S>) -> Self {
        Self { error, stream }
    }

    /// The failure
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Split into the failure and the stream
    pub fn into_parts(self) -> (E, Box<S>) {
        (self.error, self.stream)
    }

    /// Drop the stream and keep the failure
    pub fn into_error(self) -> E {
        self.error
    }
}

impl<S: ?Sized, E: fmt::Debug> fmt::Debug for WrapError<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<S: ?Sized, E: fmt::Display> fmt::Display for WrapError<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<S: ?Sized> From<WrapError<S, FlowError>> for FlowError {
    fn from(failure: WrapError<S, FlowError>) -> Self {
        failure.error
    }
}

/// Stream kinds a modifier chain can be built over
pub trait StreamKind {
    /// Side of a flow this stream kind belongs to
    const SIDE: Side;
}

impl StreamKind for dyn InputReader {
    const SIDE: Side = Side::Input;
}

impl StreamKind for dyn OutputWriter {
    const SIDE: Side = Side::Output;
}

/// Boxed input modifier
pub type BoxedInputModifier = Box<dyn Modifier<dyn InputReader>>;

/// Boxed output modifier
pub type BoxedOutputModifier = Box<dyn Modifier<dyn OutputWriter>>;

/// Ordered modifier list for input streams
pub type InputModifiers = Modifiers<dyn InputReader>;

/// Ordered modifier list for output streams
pub type OutputModifiers = Modifiers<dyn OutputWriter>;

/// Ordered list of modifiers, in declaration order
pub struct Modifiers<S: ?Sized + StreamKind + 'static> {
    modifiers: Vec<Box<dyn Modifier<S>>>,
}

impl<S: ?Sized + StreamKind + 'static> Modifiers<S> {
    /// Create a chain from modifiers in declaration order
    pub fn new(modifiers: Vec<Box<dyn Modifier<S>>>) -> Self {
        Self { modifiers }
    }

    /// Create an empty chain
    pub fn empty() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    /// Append a modifier after the ones already declared
    pub fn push(&mut self, modifier: Box<dyn Modifier<S>>) {
        self.modifiers.push(modifier);
    }

    /// Number of modifiers
    #[inline]
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Check if the chain is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Modifier names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.modifiers.iter().map(|m| m.name()).collect()
    }

    /// Iterate over modifiers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Modifier<S>> {
        self.modifiers.iter().map(|m| m.as_ref())
    }

    /// Wrap `base` in every modifier, last declared innermost
    ///
    /// Returns the outermost stream. An empty chain returns `base` as is.
    ///
    /// # Errors
    ///
    /// `FlowError::Wrap` naming the position and modifier that failed,
    /// together with the stream built so far. No modifier declared before
    /// the failing one is invoked.
    pub fn wrap(&self, base: Box<S>) -> Result<Box<S>, WrapError<S, FlowError>> {
        if self.modifiers.is_empty() {
            return Ok(base);
        }

        let side = S::SIDE;
        let mut current = base;

        for (position, modifier) in self.modifiers.iter().enumerate().rev() {
            trace!(side = %side, position, modifier = modifier.name(), "wrapping stream");
            current = modifier.wrap(current).map_err(|failure| {
                let (error, stream) = failure.into_parts();
                WrapError::new(FlowError::wrap(side, position, modifier.name(), error), stream)
            })?;
        }

        debug!(side = %side, modifiers = ?self.names(), "stream wrapped");

        Ok(current)
    }
}

impl<S: ?Sized + StreamKind + 'static> Default for Modifiers<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ?Sized + StreamKind + 'static> fmt::Debug for Modifiers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<S: ?Sized + StreamKind + 'static> FromIterator<Box<dyn Modifier<S>>> for Modifiers<S> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Modifier<S>>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Pass-through modifier
///
/// Returns the stream it is given. Registered as `noop` on both sides by
/// [`Registry::with_defaults`](crate::Registry::with_defaults); useful for
/// testing chain wiring and measuring chain overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModifier;

impl NoopModifier {
    /// Registry name of the noop modifier
    pub const NAME: &'static str = "noop";

    /// Create a new noop modifier
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Modifier<dyn InputReader> for NoopModifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn wrap(
        &self,
        stream: Box<dyn InputReader>,
    ) -> Result<Box<dyn InputReader>, WrapError<dyn InputReader>> {
        Ok(stream)
    }
}

impl Modifier<dyn OutputWriter> for NoopModifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn wrap(
        &self,
        stream: Box<dyn OutputWriter>,
    ) -> Result<Box<dyn OutputWriter>, WrapError<dyn OutputWriter>> {
        Ok(stream)
    }
}
