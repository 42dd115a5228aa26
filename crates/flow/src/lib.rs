//! Reel - Flow
//!
//! Compiles textual flow lines into pipelines of stream
//! components, and wraps streams in modifier chains when they are opened.
//!
//! # Overview
//!
//! A flow is one input line and one or more output lines:
//!
//! ```text
//! input:   tcp|http                source | modifier* | input format
//! output:  json|gzip|gcs           output format | modifier* | sink
//! ```
//!
//! Every token is a registry key. The parser resolves each one against the
//! [`Registry`] table for its position and runs the constructor with a
//! caller-supplied context. The result is a [`Flow`] holding constructed
//! components, ready to be driven by an execution runtime.
//!
//! # Architecture
//!
//! ```text
//! [flow lines] → [Parser] → [Registry lookups] → [Input + Outputs] → [Flow]
//!
//! at stream open:
//! [Source stream] → [InputModifiers::wrap] → [InputFormat]
//! [OutputFormat]  → [OutputModifiers::wrap] → [Sink stream]
//! ```
//!
//! Parsing and wrapping are synchronous setup steps. Moving bytes through
//! an assembled flow is left to the runtime.
//!
//! # Modules
//!
//! - `stream` - Stream contracts (`InputReader`, `OutputWriter`, `Meta`)
//! - `role` - Component contracts (`Source`, `Sink`, formats)
//! - `modifier` - Modifier trait and the reverse-order wrap chain
//! - `registry` - Named constructor tables per role
//! - `parser` - Flow grammar
//! - `pipe` - `Input`, `Output` and `Flow` descriptors
//! - `close` - Ordered teardown of two resources
//! - `test_utils` - In-memory streams and instrumented components
//!
//! # Example
//!
//! ```
//! use reel_flow::test_utils::{CallLog, LineFormat, StubSink, StubSource};
//! use reel_flow::{FactoryResult, InputFormat, OutputFormat, Parser, Registry, Sink, Source};
//!
//! struct Session {
//!     log: CallLog,
//! }
//!
//! fn tcp(ctx: &Session) -> FactoryResult<Box<dyn Source>> {
//!     Ok(Box::new(StubSource::new("tcp", ctx.log.clone())))
//! }
//! fn http(_: &Session) -> FactoryResult<Box<dyn InputFormat>> {
//!     Ok(Box::new(LineFormat::new("http")))
//! }
//! fn json(_: &Session) -> FactoryResult<Box<dyn OutputFormat>> {
//!     Ok(Box::new(LineFormat::new("json")))
//! }
//! fn stdout(ctx: &Session) -> FactoryResult<Box<dyn Sink>> {
//!     Ok(Box::new(StubSink::new("stdout", ctx.log.clone())))
//! }
//!
//! let mut registry = Registry::with_defaults();
//! registry.sources.register("tcp", tcp);
//! registry.input_formats.register("http", http);
//! registry.output_formats.register("json", json);
//! registry.sinks.register("stdout", stdout);
//!
//! let session = Session { log: CallLog::new() };
//! let flow = Parser::new(&registry)
//!     .parse(&session, "tcp|http", &["json|noop|stdout"])
//!     .unwrap();
//!
//! assert_eq!(flow.outputs()[0].modifiers().names(), vec!["noop"]);
//! ```

mod close;
mod error;
mod modifier;
mod parser;
mod pipe;
mod registry;
mod role;
mod stream;
pub mod test_utils;

pub use close::close_sequentially;
pub use error::{BoxError, ErrorKind, FlowError, Result, Role, Side};
pub use modifier::{
    BoxedInputModifier, BoxedOutputModifier, InputModifiers, Modifier, Modifiers, NoopModifier,
    OutputModifiers, StreamKind, WrapError,
};
pub use parser::{MIN_PARTS, Parser, SEPARATOR};
pub use pipe::{Flow, Input, Output};
pub use registry::{Constructor, FactoryResult, Registry, Table};
pub use role::{InputFormat, OutputFormat, Record, Sink, Source};
pub use stream::{Close, InputReader, Meta, OutputWriter};
