//! End-to-end tests: registry setup, parsing, stream open and teardown
//! through the public API only.

use std::io::{Read, Write};
use std::str::FromStr;

use reel_config::Config;
use reel_flow::test_utils::{
    CallLog, LineFormat, MemoryReader, RecordingModifier, StubSink, StubSource,
};
use reel_flow::{
    ErrorKind, FactoryResult, FlowError, InputFormat, InputReader, Meta, Modifier,
    OutputFormat, OutputWriter, Parser, Registry, Role, Sink, Source, close_sequentially,
};

/// Shared state handed to every constructor
#[derive(Default)]
struct Session {
    log: CallLog,
}

fn tcp(ctx: &Session) -> FactoryResult<Box<dyn Source>> {
    let stream = MemoryReader::new(b"{\"path\":\"/health\"}\n".to_vec())
        .with_meta(Meta::new().with("remote_addr", "192.0.2.1:55000"))
        .with_log(ctx.log.clone());
    Ok(Box::new(StubSource::new("tcp", ctx.log.clone()).with_stream(stream)))
}

fn http(_: &Session) -> FactoryResult<Box<dyn InputFormat>> {
    Ok(Box::new(LineFormat::new("http")))
}

fn json(_: &Session) -> FactoryResult<Box<dyn OutputFormat>> {
    Ok(Box::new(LineFormat::new("json")))
}

fn har(_: &Session) -> FactoryResult<Box<dyn OutputFormat>> {
    Ok(Box::new(LineFormat::new("har")))
}

fn gzip_in(ctx: &Session) -> FactoryResult<Box<dyn Modifier<dyn InputReader>>> {
    Ok(Box::new(RecordingModifier::new("gzip", ctx.log.clone())))
}

fn gzip_out(ctx: &Session) -> FactoryResult<Box<dyn Modifier<dyn OutputWriter>>> {
    Ok(Box::new(RecordingModifier::new("gzip", ctx.log.clone())))
}

fn gcs(ctx: &Session) -> FactoryResult<Box<dyn Sink>> {
    Ok(Box::new(StubSink::new("gcs", ctx.log.clone())))
}

fn stdout(ctx: &Session) -> FactoryResult<Box<dyn Sink>> {
    Ok(Box::new(StubSink::new("stdout", ctx.log.clone())))
}

fn registry() -> Registry<Session> {
    let mut registry = Registry::with_defaults();
    registry.sources.register("tcp", tcp);
    registry.input_modifiers.register("gzip", gzip_in);
    registry.input_formats.register("http", http);
    registry.output_formats.register("json", json);
    registry.output_formats.register("har", har);
    registry.output_modifiers.register("gzip", gzip_out);
    registry.sinks.register("gcs", gcs);
    registry.sinks.register("stdout", stdout);
    registry
}

#[test]
fn test_input_without_modifiers() {
    let registry = registry();
    let session = Session::default();

    let input = Parser::new(&registry)
        .parse_input(&session, "tcp|http")
        .unwrap();

    assert_eq!(input.source().name(), "tcp");
    assert!(input.modifiers().is_empty());
    assert_eq!(input.format().name(), "http");
}

#[test]
fn test_output_with_one_modifier() {
    let registry = registry();
    let session = Session::default();

    let output = Parser::new(&registry)
        .parse_output(&session, "json|gzip|gcs")
        .unwrap();

    assert_eq!(output.format().name(), "json");
    assert_eq!(output.modifiers().names(), vec!["gzip"]);
    assert_eq!(output.sink().name(), "gcs");
}

#[test]
fn test_unknown_source() {
    let registry = registry();
    let session = Session::default();
    let parser = Parser::new(&registry);

    let err = parser.parse_input(&session, "foo|http").unwrap_err();
    assert_eq!(err.to_string(), "invalid source: foo");
    assert!(matches!(
        err,
        FlowError::Unknown {
            role: Role::Source,
            ..
        }
    ));

    // Whole-flow parsing keeps the same root cause
    let err = parser
        .parse(&session, "foo|http", &["json|stdout"])
        .unwrap_err();
    assert_eq!(err.root().to_string(), "invalid source: foo");
    assert_eq!(err.kind(), ErrorKind::Grammar);
}

#[test]
fn test_full_cycle() {
    let registry = registry();
    let session = Session::default();

    let mut flow = Parser::new(&registry)
        .parse(&session, "tcp|gzip|http", &["json|gzip|gcs", "har|stdout"])
        .unwrap();
    assert_eq!(flow.outputs().len(), 2);

    // Read one record from the wrapped input stream
    let mut reader = flow.input_mut().open().unwrap().unwrap();
    assert_eq!(
        reader.meta().get_str("remote_addr"),
        Some("192.0.2.1:55000")
    );
    let record = flow
        .input_mut()
        .format_mut()
        .decode(reader.as_mut())
        .unwrap()
        .unwrap();

    // Write it to every output
    for output in flow.outputs_mut() {
        let mut writer = output.open().unwrap();
        output
            .format_mut()
            .encode(&record, writer.as_mut())
            .unwrap();
        writer.flush().unwrap();
        output.close_stream(writer.as_mut()).unwrap();
    }

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
    flow.input_mut().close_stream(reader.as_mut()).unwrap();

    // Streams are closed; every source and sink is still open
    assert_eq!(
        session.log.entries(),
        vec![
            "wrap:gzip",
            "wrap:gzip",
            "close:gzip",
            "close:writer",
            "close:writer",
            "close:gzip",
            "close:reader",
        ]
    );

    flow.close().unwrap();
    assert_eq!(
        session.log.entries()[7..],
        ["close:tcp", "close:gcs", "close:stdout"]
    );
}

#[test]
fn test_flows_from_config() {
    let config = Config::from_str(
        r#"
[flows.capture]
input = "tcp|http"
outputs = ["json|gzip|gcs", "har|stdout"]

[flows.broken]
input = "tcp|http"
outputs = ["json|nope|gcs"]
"#,
    )
    .unwrap();

    let registry = registry();
    let session = Session::default();
    let parser = Parser::new(&registry);

    let capture = parser
        .parse_config(&session, config.flow("capture").unwrap())
        .unwrap();
    assert_eq!(capture.outputs()[1].sink().name(), "stdout");

    let err = parser
        .parse_config(&session, config.flow("broken").unwrap())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to parse output line 0: invalid output modifier: nope"
    );
}

#[test]
fn test_close_sequentially_public() {
    let session = Session::default();
    let mut source = StubSource::new("tcp", session.log.clone());
    let mut sink = StubSink::new("gcs", session.log.clone());

    close_sequentially(&mut source, Some(&mut sink)).unwrap();
    close_sequentially(&mut sink, None).unwrap();

    assert_eq!(
        session.log.entries(),
        vec!["close:tcp", "close:gcs", "close:gcs"]
    );
}
