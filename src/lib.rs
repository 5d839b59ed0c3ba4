//! h2-output: A minimal, sans-I/O HTTP/2 server output path
//!
//! This crate provides the per-stream output side of an HTTP/2 server
//! connection: turning a handler's response (status, headers, body bytes,
//! end-of-stream) into correctly-sequenced wire frames while tolerating
//! concurrent abort of the stream, without an async runtime.
//!
//! # Features
//!
//! - **Sans-I/O Design**: No async runtime dependencies (no tokio); writes
//!   block on the transport you supply
//! - **Safe concurrent abort**: a lock-free abort flag lets the connection
//!   cancel a stream's output at any moment, even mid-write
//! - **Shared HPACK state**: one stateful compressor per connection, fed in
//!   strict frame order across all streams, via fluke-hpack
//! - **RFC 7540 framing**: HEADERS, DATA and CONTINUATION emission with
//!   max-frame-size chunking
//! - **Header validation**: compile-time byte classification tables reject
//!   invalid names/values before they touch the compressor
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use h2_output::{CancellationToken, FrameWriter, HeaderField, StreamOutput};
//!
//! // One frame writer per connection, shared by every stream.
//! let writer = Arc::new(FrameWriter::new(Vec::new()));
//!
//! // One producer per stream.
//! let stream = StreamOutput::new(1, Arc::clone(&writer));
//!
//! stream
//!     .write_response_headers(200, None, &[HeaderField::new("content-type", "text/plain")])
//!     .unwrap();
//! stream.write_data(b"hello", &CancellationToken::none()).unwrap();
//! stream.write_stream_suffix(&CancellationToken::none()).unwrap();
//!
//! assert!(stream.is_completed());
//! ```
//!
//! # Architecture
//!
//! This crate is intentionally minimal. It provides:
//! - Per-stream output gating ([`StreamOutput`])
//! - Connection-level frame emission ([`FrameWriter`], or your own
//!   [`FrameSink`])
//! - Response header compression and validation
//!
//! It does NOT provide:
//! - Frame parsing or the inbound half of a connection
//! - Flow-control window accounting
//! - TCP/TLS transport (you provide the `io::Write`)
//! - Connection management (your responsibility)

pub mod cancel;
pub mod chars;
pub mod error;
pub mod frame_writer;
pub mod hpack;
pub mod stream_output;

pub use cancel::CancellationToken;
pub use error::WriteError;
pub use frame_writer::{
    flags, frame_type, FrameSink, FrameWriter, DEFAULT_MAX_FRAME_SIZE, MAX_ALLOWED_FRAME_SIZE,
};
pub use hpack::{HeaderField, ResponseEncoder};
pub use stream_output::StreamOutput;
