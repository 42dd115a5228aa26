//! Component roles
//!
//! Traits implemented by the components a flow line names. Concrete
//! implementations (TCP listeners, object storage, HTTP codecs, ...) live
//! outside this crate and are plugged in through the [`Registry`].
//!
//! [`Registry`]: crate::Registry

use std::io;

use crate::stream::{Close, InputReader, OutputWriter};

/// Structured record exchanged between input and output formats
pub type Record = serde_json::Value;

/// Produces input streams
///
/// Closing a source stops it from producing further streams. Streams
/// already handed out are closed separately.
pub trait Source: Close + Send {
    /// Name of this source for logging
    fn name(&self) -> &str;

    /// Next stream, or `None` once the source is exhausted
    fn next_stream(&mut self) -> io::Result<Option<Box<dyn InputReader>>>;
}

/// Decodes raw bytes into records
pub trait InputFormat: Send {
    /// Name of this format for logging
    fn name(&self) -> &str;

    /// Decode the next record, or `None` at end of stream
    fn decode(&mut self, reader: &mut dyn InputReader) -> io::Result<Option<Record>>;
}

/// Encodes records into raw bytes
pub trait OutputFormat: Send {
    /// Name of this format for logging
    fn name(&self) -> &str;

    /// Encode one record onto the writer
    fn encode(&mut self, record: &Record, writer: &mut dyn OutputWriter) -> io::Result<()>;
}

/// Consumes output streams
pub trait Sink: Close + Send {
    /// Name of this sink for logging
    fn name(&self) -> &str;

    /// Open the base writer that output modifiers wrap
    fn open(&mut self) -> io::Result<Box<dyn OutputWriter>>;
}
