//! Test utilities for building flows without real I/O
//!
//! In-memory streams and instrumented components that record every call
//! into a shared [`CallLog`]. Use them to assert wrap order, close order and
//! short-circuiting against the real parser and chain code.
//!
//! # Example
//!
//! ```
//! use reel_flow::test_utils::{CallLog, MemoryReader, RecordingModifier};
//! use reel_flow::{InputModifiers, InputReader};
//!
//! let log = CallLog::new();
//! let chain = InputModifiers::new(vec![
//!     Box::new(RecordingModifier::new("outer", log.clone())),
//!     Box::new(RecordingModifier::new("inner", log.clone())),
//! ]);
//!
//! let base: Box<dyn InputReader> = Box::new(MemoryReader::new(b"data".to_vec()));
//! chain.wrap(base).unwrap();
//! assert_eq!(log.entries(), vec!["wrap:inner", "wrap:outer"]);
//! ```

use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BoxError;
use crate::modifier::{Modifier, WrapError};
use crate::role::{InputFormat, OutputFormat, Record, Sink, Source};
use crate::stream::{Close, InputReader, Meta, OutputWriter};

/// Shared, ordered log of calls made on test components
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Snapshot of all entries in call order
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Check whether an entry was recorded
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.lock().iter().any(|e| e == entry)
    }
}

fn failure(what: &str) -> io::Error {
    io::Error::other(format!("{what} failed"))
}

/// Closable resource that records its close and can be told to fail
#[derive(Debug, Clone)]
pub struct TestCloser {
    name: String,
    log: CallLog,
    fail: bool,
}

impl TestCloser {
    /// Closer that succeeds
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            fail: false,
        }
    }

    /// Closer whose `close` returns an error
    pub fn failing(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }
}

impl Close for TestCloser {
    fn close(&mut self) -> io::Result<()> {
        self.log.push(format!("close:{}", self.name));
        if self.fail {
            return Err(failure(&format!("close {}", self.name)));
        }
        Ok(())
    }
}

/// In-memory input stream
pub struct MemoryReader {
    data: Cursor<Vec<u8>>,
    meta: Meta,
    log: Option<CallLog>,
}

impl MemoryReader {
    /// Reader over `data` with empty metadata
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(data),
            meta: Meta::new(),
            log: None,
        }
    }

    /// Attach metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Record `close:reader` into `log`
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Close for MemoryReader {
    fn close(&mut self) -> io::Result<()> {
        if let Some(log) = &self.log {
            log.push("close:reader");
        }
        Ok(())
    }
}

impl InputReader for MemoryReader {
    fn meta(&self) -> &Meta {
        &self.meta
    }
}

/// In-memory output stream sharing its buffer with the test
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
    log: Option<CallLog>,
}

impl MemoryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `close:writer` into `log`
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Bytes written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for MemoryWriter {
    fn close(&mut self) -> io::Result<()> {
        if let Some(log) = &self.log {
            log.push("close:writer");
        }
        Ok(())
    }
}

impl OutputWriter for MemoryWriter {}

/// Modifier that records `wrap:<name>` and tags the stream it returns
///
/// On the read side the returned stream delegates metadata to the stream
/// it wraps. On the write side every write is prefixed with `<name>:` so
/// the layering is visible in the output bytes. Closing a wrapped stream
/// records `close:<name>` and then closes the inner stream.
#[derive(Debug, Clone)]
pub struct RecordingModifier {
    name: String,
    log: CallLog,
    fail: bool,
}

impl RecordingModifier {
    /// Modifier that wraps successfully
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            fail: false,
        }
    }

    /// Modifier whose `wrap` fails
    pub fn failing(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }

    fn record(&self) -> io::Result<()> {
        self.log.push(format!("wrap:{}", self.name));
        if self.fail {
            return Err(failure(&format!("wrap {}", self.name)));
        }
        Ok(())
    }
}

impl Modifier<dyn InputReader> for RecordingModifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn wrap(
        &self,
        stream: Box<dyn InputReader>,
    ) -> Result<Box<dyn InputReader>, WrapError<dyn InputReader>> {
        if let Err(e) = self.record() {
            return Err(WrapError::new(e, stream));
        }
        Ok(Box::new(TaggedReader {
            name: self.name.clone(),
            log: self.log.clone(),
            inner: stream,
        }))
    }
}

impl Modifier<dyn OutputWriter> for RecordingModifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn wrap(
        &self,
        stream: Box<dyn OutputWriter>,
    ) -> Result<Box<dyn OutputWriter>, WrapError<dyn OutputWriter>> {
        if let Err(e) = self.record() {
            return Err(WrapError::new(e, stream));
        }
        Ok(Box::new(TaggedWriter {
            name: self.name.clone(),
            log: self.log.clone(),
            inner: stream,
        }))
    }
}

struct TaggedReader {
    name: String,
    log: CallLog,
    inner: Box<dyn InputReader>,
}

impl Read for TaggedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Close for TaggedReader {
    fn close(&mut self) -> io::Result<()> {
        self.log.push(format!("close:{}", self.name));
        self.inner.close()
    }
}

impl InputReader for TaggedReader {
    fn meta(&self) -> &Meta {
        self.inner.meta()
    }
}

struct TaggedWriter {
    name: String,
    log: CallLog,
    inner: Box<dyn OutputWriter>,
}

impl Write for TaggedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut tagged = Vec::with_capacity(self.name.len() + 1 + buf.len());
        tagged.extend_from_slice(self.name.as_bytes());
        tagged.push(b':');
        tagged.extend_from_slice(buf);
        self.inner.write_all(&tagged)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Close for TaggedWriter {
    fn close(&mut self) -> io::Result<()> {
        self.log.push(format!("close:{}", self.name));
        self.inner.close()
    }
}

impl OutputWriter for TaggedWriter {}

/// Source handing out a fixed list of in-memory streams
pub struct StubSource {
    name: String,
    streams: Vec<MemoryReader>,
    log: CallLog,
}

impl StubSource {
    /// Source with no streams
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            streams: Vec::new(),
            log,
        }
    }

    /// Queue a stream; streams are handed out in the order they were added
    pub fn with_stream(mut self, reader: MemoryReader) -> Self {
        self.streams.insert(0, reader);
        self
    }
}

impl Close for StubSource {
    fn close(&mut self) -> io::Result<()> {
        self.log.push(format!("close:{}", self.name));
        Ok(())
    }
}

impl Source for StubSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_stream(&mut self) -> io::Result<Option<Box<dyn InputReader>>> {
        Ok(self
            .streams
            .pop()
            .map(|reader| Box::new(reader) as Box<dyn InputReader>))
    }
}

/// Sink whose streams all write into one shared [`MemoryWriter`]
pub struct StubSink {
    name: String,
    writer: MemoryWriter,
    log: CallLog,
}

impl StubSink {
    /// Create a sink
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            writer: MemoryWriter::new().with_log(log.clone()),
            log,
        }
    }

    /// Handle on the shared buffer
    pub fn writer(&self) -> MemoryWriter {
        self.writer.clone()
    }
}

impl Close for StubSink {
    fn close(&mut self) -> io::Result<()> {
        self.log.push(format!("close:{}", self.name));
        Ok(())
    }
}

impl Sink for StubSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> io::Result<Box<dyn OutputWriter>> {
        Ok(Box::new(self.writer.clone()))
    }
}

/// Newline-delimited JSON format for both directions
#[derive(Debug, Clone)]
pub struct LineFormat {
    name: String,
}

impl LineFormat {
    /// Create a format reporting `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl InputFormat for LineFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&mut self, reader: &mut dyn InputReader) -> io::Result<Option<Record>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match reader.read(&mut byte)? {
                0 if line.is_empty() => return Ok(None),
                0 => break,
                _ if byte[0] == b'\n' => break,
                _ => line.push(byte[0]),
            }
        }
        serde_json::from_slice(&line)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl OutputFormat for LineFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&mut self, record: &Record, writer: &mut dyn OutputWriter) -> io::Result<()> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        line.push(b'\n');
        writer.write_all(&line)
    }
}

/// Error returned by failing test constructors
pub fn construct_error(message: &str) -> BoxError {
    message.to_string().into()
}
