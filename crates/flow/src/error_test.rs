//! Tests for flow error types

use super::*;

#[test]
fn test_empty_display() {
    assert_eq!(FlowError::Empty(Side::Input).to_string(), "empty input");
    assert_eq!(FlowError::Empty(Side::Output).to_string(), "empty output");
}

#[test]
fn test_unknown_display() {
    let err = FlowError::unknown(Role::Source, "foo");
    assert_eq!(err.to_string(), "invalid source: foo");

    let err = FlowError::unknown(Role::OutputModifier, "zip");
    assert_eq!(err.to_string(), "invalid output modifier: zip");
}

#[test]
fn test_construct_display_includes_cause() {
    let err = FlowError::construct(Role::Sink, "gcs", "missing bucket".into());
    let msg = err.to_string();
    assert!(msg.contains("failed to create sink 'gcs'"));
    assert!(msg.contains("missing bucket"));
}

#[test]
fn test_wrap_display() {
    let io_err = std::io::Error::other("bad header");
    let err = FlowError::wrap(Side::Input, 1, "gzip", io_err);
    assert_eq!(
        err.to_string(),
        "failed to wrap input stream with modifier 1 ('gzip'): bad header"
    );
}

#[test]
fn test_incomplete_display() {
    let err = FlowError::Incomplete {
        side: Side::Input,
        line: "tcp".into(),
        min: 2,
        separator: '|',
    };
    let msg = err.to_string();
    assert!(msg.contains("incomplete input 'tcp'"));
    assert!(msg.contains("at least 2"));
}

#[test]
fn test_line_wrapper_root_and_kind() {
    let inner = FlowError::unknown(Role::Sink, "nowhere");
    let err = FlowError::line(Side::Output, 2, inner);

    assert!(err.to_string().starts_with("failed to parse output line 2"));
    assert!(err.to_string().contains("invalid sink: nowhere"));
    assert!(matches!(err.root(), FlowError::Unknown { role: Role::Sink, .. }));
    assert_eq!(err.kind(), ErrorKind::Grammar);
}

#[test]
fn test_kind_classification() {
    assert_eq!(FlowError::Empty(Side::Input).kind(), ErrorKind::Grammar);
    assert_eq!(FlowError::NoOutputs.kind(), ErrorKind::Grammar);
    assert_eq!(
        FlowError::construct(Role::Source, "tcp", "boom".into()).kind(),
        ErrorKind::Construction
    );
    assert_eq!(
        FlowError::wrap(Side::Output, 0, "noop", std::io::Error::other("x")).kind(),
        ErrorKind::Wrap
    );
    assert_eq!(
        FlowError::open(Side::Output, std::io::Error::other("x")).kind(),
        ErrorKind::Open
    );
}

#[test]
fn test_role_side() {
    assert_eq!(Role::Source.side(), Side::Input);
    assert_eq!(Role::InputModifier.side(), Side::Input);
    assert_eq!(Role::InputFormat.side(), Side::Input);
    assert_eq!(Role::OutputFormat.side(), Side::Output);
    assert_eq!(Role::OutputModifier.side(), Side::Output);
    assert_eq!(Role::Sink.side(), Side::Output);
}

#[test]
fn test_source_chain_is_preserved() {
    use std::error::Error as _;

    let err = FlowError::construct(Role::InputFormat, "http", "bad config".into());
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "bad config");
}
