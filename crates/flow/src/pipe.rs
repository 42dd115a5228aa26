//! Flow descriptors
//!
//! `Input` and `Output` hold the components one flow line resolved to;
//! `Flow` pairs one input with its outputs. Descriptors are built by the
//! [`Parser`](crate::Parser) and are not modified afterwards. Streams are
//! opened from them by the execution runtime, one stream per call.
//!
//! # Lifecycle
//!
//! A source or sink outlives the streams it hands out. Each stream is
//! closed on its own with `close_stream`; the source or sink is closed once,
//! with `close`, after its streams. `close` optionally takes the last live
//! stream and closes it first.

use std::fmt;
use std::io;

use tracing::warn;

use crate::close::close_sequentially;
use crate::error::{FlowError, Result, Side};
use crate::modifier::{InputModifiers, OutputModifiers};
use crate::role::{InputFormat, OutputFormat, Sink, Source};
use crate::stream::{Close, InputReader, OutputWriter};

#[cfg(test)]
#[path = "pipe_test.rs"]
mod tests;

/// Read side of a flow: `source|modifier*|format`
pub struct Input {
    source: Box<dyn Source>,
    modifiers: InputModifiers,
    format: Box<dyn InputFormat>,
}

impl Input {
    /// Create an input descriptor
    pub fn new(
        source: Box<dyn Source>,
        modifiers: InputModifiers,
        format: Box<dyn InputFormat>,
    ) -> Self {
        Self {
            source,
            modifiers,
            format,
        }
    }

    /// The source
    pub fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }

    /// Input modifiers in declaration order
    pub fn modifiers(&self) -> &InputModifiers {
        &self.modifiers
    }

    /// The input format
    pub fn format(&self) -> &dyn InputFormat {
        self.format.as_ref()
    }

    /// Mutable access to the input format, for decoding
    pub fn format_mut(&mut self) -> &mut dyn InputFormat {
        self.format.as_mut()
    }

    /// Take the next stream from the source, wrapped in the modifier chain
    ///
    /// Returns `None` once the source is exhausted. If a modifier fails, the
    /// stream and the layers already built around it are closed before the
    /// error is returned.
    pub fn open(&mut self) -> Result<Option<Box<dyn InputReader>>> {
        let Some(stream) = self
            .source
            .next_stream()
            .map_err(|e| FlowError::open(Side::Input, e))?
        else {
            return Ok(None);
        };

        match self.modifiers.wrap(stream) {
            Ok(stream) => Ok(Some(stream)),
            Err(failure) => {
                let (error, mut stream) = failure.into_parts();
                if let Err(e) = stream.close() {
                    warn!(
                        source = self.source.name(),
                        error = %e,
                        "failed to close unwrapped input stream"
                    );
                }
                Err(error)
            }
        }
    }

    /// Close one stream opened by [`open`](Self::open)
    ///
    /// The source stays open and keeps handing out streams.
    pub fn close_stream(&self, stream: &mut dyn InputReader) -> io::Result<()> {
        stream.close().inspect_err(|e| {
            warn!(source = self.source.name(), error = %e, "failed to close input stream");
        })
    }

    /// Close the source, after `last` if given
    ///
    /// The source is left open if `last` fails to close.
    pub fn close(&mut self, last: Option<&mut dyn InputReader>) -> io::Result<()> {
        let result = match last {
            Some(stream) => close_sequentially(stream, Some(&mut self.source)),
            None => self.source.close(),
        };
        result.inspect_err(|e| {
            warn!(source = self.source.name(), error = %e, "failed to close input");
        })
    }

    /// Split into source, modifiers and format
    pub fn into_parts(self) -> (Box<dyn Source>, InputModifiers, Box<dyn InputFormat>) {
        (self.source, self.modifiers, self.format)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("source", &self.source.name())
            .field("modifiers", &self.modifiers)
            .field("format", &self.format.name())
            .finish()
    }
}

/// Write side of a flow: `format|modifier*|sink`
pub struct Output {
    format: Box<dyn OutputFormat>,
    modifiers: OutputModifiers,
    sink: Box<dyn Sink>,
}

impl Output {
    /// Create an output descriptor
    pub fn new(
        format: Box<dyn OutputFormat>,
        modifiers: OutputModifiers,
        sink: Box<dyn Sink>,
    ) -> Self {
        Self {
            format,
            modifiers,
            sink,
        }
    }

    /// The output format
    pub fn format(&self) -> &dyn OutputFormat {
        self.format.as_ref()
    }

    /// Mutable access to the output format, for encoding
    pub fn format_mut(&mut self) -> &mut dyn OutputFormat {
        self.format.as_mut()
    }

    /// Output modifiers in declaration order
    pub fn modifiers(&self) -> &OutputModifiers {
        &self.modifiers
    }

    /// The sink
    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    /// Open a writer on the sink, wrapped in the modifier chain
    ///
    /// If a modifier fails, the writer and the layers already built around
    /// it are closed before the error is returned.
    pub fn open(&mut self) -> Result<Box<dyn OutputWriter>> {
        let writer = self
            .sink
            .open()
            .map_err(|e| FlowError::open(Side::Output, e))?;

        self.modifiers.wrap(writer).or_else(|failure| {
            let (error, mut writer) = failure.into_parts();
            if let Err(e) = writer.close() {
                warn!(
                    sink = self.sink.name(),
                    error = %e,
                    "failed to close unwrapped output stream"
                );
            }
            Err(error)
        })
    }

    /// Close one writer opened by [`open`](Self::open)
    ///
    /// The sink stays open and keeps accepting writers.
    pub fn close_stream(&self, writer: &mut dyn OutputWriter) -> io::Result<()> {
        writer.close().inspect_err(|e| {
            warn!(sink = self.sink.name(), error = %e, "failed to close output stream");
        })
    }

    /// Close the sink, after `last` if given
    ///
    /// The sink is left open if `last` fails to close.
    pub fn close(&mut self, last: Option<&mut dyn OutputWriter>) -> io::Result<()> {
        let result = match last {
            Some(writer) => close_sequentially(writer, Some(&mut self.sink)),
            None => self.sink.close(),
        };
        result.inspect_err(|e| {
            warn!(sink = self.sink.name(), error = %e, "failed to close output");
        })
    }

    /// Split into format, modifiers and sink
    pub fn into_parts(self) -> (Box<dyn OutputFormat>, OutputModifiers, Box<dyn Sink>) {
        (self.format, self.modifiers, self.sink)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("format", &self.format.name())
            .field("modifiers", &self.modifiers)
            .field("sink", &self.sink.name())
            .finish()
    }
}

/// One input and its outputs, in declaration order
#[derive(Debug)]
pub struct Flow {
    input: Input,
    outputs: Vec<Output>,
}

impl Flow {
    /// Assemble a flow
    ///
    /// # Errors
    /// `FlowError::NoOutputs` if `outputs` is empty.
    pub fn new(input: Input, outputs: Vec<Output>) -> Result<Self> {
        if outputs.is_empty() {
            return Err(FlowError::NoOutputs);
        }
        Ok(Self { input, outputs })
    }

    /// The input descriptor
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Mutable access to the input descriptor
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Output descriptors in declaration order
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Mutable access to the output descriptors
    pub fn outputs_mut(&mut self) -> &mut [Output] {
        &mut self.outputs
    }

    /// Close the source, then every sink in declaration order
    ///
    /// Stops at the first failure; later components stay open. Streams
    /// still open must be closed before this.
    pub fn close(&mut self) -> io::Result<()> {
        self.input.close(None)?;
        for output in &mut self.outputs {
            output.close(None)?;
        }
        Ok(())
    }

    /// Split into input and outputs
    pub fn into_parts(self) -> (Input, Vec<Output>) {
        (self.input, self.outputs)
    }
}
