//! Tests for body writes on a live stream

use std::sync::Arc;

use h2_output::{CancellationToken, HeaderField, StreamOutput, WriteError};

use crate::support::{RecordingSink, SinkCall};

#[test]
fn test_write_data_forwards_body_chunk() {
    let sink = Arc::new(RecordingSink::new());
    let stream = StreamOutput::new(7, Arc::clone(&sink));

    stream
        .write_data(b"hello", &CancellationToken::none())
        .unwrap();

    assert_eq!(
        sink.calls(),
        vec![SinkCall::Data {
            stream_id: 7,
            data: b"hello".to_vec(),
            end_stream: false,
        }]
    );
}

#[test]
fn test_write_data_never_sets_end_stream() {
    let sink = Arc::new(RecordingSink::new());
    let stream = StreamOutput::new(1, Arc::clone(&sink));

    stream.write_data(b"a", &CancellationToken::none()).unwrap();
    stream.write_data(b"b", &CancellationToken::new()).unwrap();

    for call in sink.calls() {
        match call {
            SinkCall::Data { end_stream, .. } => assert!(!end_stream),
            other => panic!("unexpected call: {:?}", other),
        }
    }
}

#[test]
fn test_cancelled_token_fails_before_forwarding() {
    let sink = Arc::new(RecordingSink::new());
    let stream = StreamOutput::new(1, Arc::clone(&sink));
    let token = CancellationToken::new();
    token.cancel();

    let err = stream.write_data(b"payload", &token).unwrap_err();

    // Cancelled, not StreamAborted: the stream itself is still live
    assert!(matches!(err, WriteError::Cancelled));
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_write_order_preserved() {
    let sink = Arc::new(RecordingSink::new());
    let stream = StreamOutput::new(3, Arc::clone(&sink));
    let token = CancellationToken::none();

    stream.write_informational(&token).unwrap();
    stream
        .write_response_headers(200, None, &[HeaderField::new("content-length", "2")])
        .unwrap();
    stream.write_data(b"h", &token).unwrap();
    stream.write_data(b"i", &token).unwrap();
    stream.write_stream_suffix(&token).unwrap();

    let calls = sink.calls();
    assert_eq!(calls.len(), 5);
    assert!(matches!(calls[0], SinkCall::Informational { stream_id: 3 }));
    assert!(matches!(calls[1], SinkCall::Headers { stream_id: 3, .. }));
    assert_eq!(
        calls[2],
        SinkCall::Data {
            stream_id: 3,
            data: b"h".to_vec(),
            end_stream: false
        }
    );
    assert_eq!(
        calls[3],
        SinkCall::Data {
            stream_id: 3,
            data: b"i".to_vec(),
            end_stream: false
        }
    );
    assert_eq!(
        calls[4],
        SinkCall::Data {
            stream_id: 3,
            data: Vec::new(),
            end_stream: true
        }
    );
}

#[test]
fn test_flush_forwarded_on_live_stream() {
    let sink = Arc::new(RecordingSink::new());
    let stream = StreamOutput::new(1, Arc::clone(&sink));

    stream.flush(&CancellationToken::none()).unwrap();

    assert_eq!(sink.calls(), vec![SinkCall::Flush]);
}
