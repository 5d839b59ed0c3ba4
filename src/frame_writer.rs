//! Connection-level HTTP/2 frame writer for the server output path.
//!
//! One [`FrameWriter`] exists per connection. Every stream's output producer
//! reaches it through a shared reference and asks it to emit HEADERS, DATA
//! and CONTINUATION frames addressed to that stream. The writer owns the
//! transport and the stateful HPACK encoder, and serializes concurrent
//! stream calls internally so that header compression and transmission stay
//! atomic per block.
//!
//! Reference: RFC 7540 (HTTP/2), Sections 4 and 6.

use std::cmp;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cancel::CancellationToken;
use crate::error::WriteError;
use crate::hpack::{HeaderField, ResponseEncoder};

/// HTTP/2 frame types emitted on the output path (RFC 7540 Section 6)
pub mod frame_type {
    pub const DATA: u8 = 0x0;
    pub const HEADERS: u8 = 0x1;
    pub const CONTINUATION: u8 = 0x9;
}

/// HTTP/2 frame flags
pub mod flags {
    pub const END_STREAM: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
}

/// Default SETTINGS_MAX_FRAME_SIZE (RFC 7540 Section 6.5.2)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16_384;

/// Largest SETTINGS_MAX_FRAME_SIZE a peer may advertise (2^24 - 1)
pub const MAX_ALLOWED_FRAME_SIZE: usize = 16_777_215;

/// Encode a 9-byte frame header: 24-bit length, type, flags, 31-bit
/// stream id (reserved bit cleared)
fn encode_frame_header(length: usize, frame_type: u8, flags: u8, stream_id: u32) -> [u8; 9] {
    let length = length as u32;
    let stream_id = stream_id & 0x7FFF_FFFF;
    [
        (length >> 16) as u8,
        (length >> 8) as u8,
        length as u8,
        frame_type,
        flags,
        (stream_id >> 24) as u8,
        (stream_id >> 16) as u8,
        (stream_id >> 8) as u8,
        stream_id as u8,
    ]
}

/// The frame-emission interface a stream's output producer depends on.
///
/// Implemented by [`FrameWriter`] for real connections; tests substitute
/// call-recording doubles. Implementations are shared by every stream on a
/// connection, so all methods take `&self` and are expected to serialize
/// concurrent callers internally.
pub trait FrameSink {
    /// Emit an interim informational response (1xx) for `stream_id`.
    fn write_informational(&self, stream_id: u32) -> Result<(), WriteError>;

    /// Emit `data` as one or more DATA frames for `stream_id`. With
    /// `end_stream`, the final frame carries END_STREAM; a zero-length
    /// payload still produces one (empty) frame so the marker goes out.
    fn write_data(
        &self,
        stream_id: u32,
        data: &[u8],
        end_stream: bool,
        token: &CancellationToken,
    ) -> Result<(), WriteError>;

    /// Compress and emit a response header block for `stream_id`.
    /// Compression and transmission are atomic from the caller's point of
    /// view. The reason phrase is accepted for interface symmetry; HTTP/2
    /// has no reason phrase on the wire.
    fn write_headers(
        &self,
        stream_id: u32,
        status_code: u16,
        reason_phrase: Option<&str>,
        headers: &[HeaderField],
    ) -> Result<(), WriteError>;

    /// Flush the transport.
    fn flush(&self, token: &CancellationToken) -> Result<(), WriteError>;
}

struct Inner<W> {
    transport: W,
    encoder: ResponseEncoder,
    max_frame_size: usize,
}

/// Connection-scoped frame writer over any [`std::io::Write`] transport.
///
/// Backpressure is whatever the transport's `write_all` does: a blocking
/// socket blocks the calling stream until buffer space opens up. The
/// internal lock means at most one stream is writing at a time, which is
/// also what keeps the shared HPACK dynamic table consistent with the frame
/// order the client observes.
pub struct FrameWriter<W> {
    inner: Mutex<Inner<W>>,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(transport: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                transport,
                encoder: ResponseEncoder::new(),
                max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply the peer's SETTINGS_MAX_FRAME_SIZE, clamped to the range RFC
    /// 7540 Section 4.2 allows.
    pub fn set_max_frame_size(&self, size: usize) {
        let mut inner = self.lock();
        inner.max_frame_size = size.clamp(DEFAULT_MAX_FRAME_SIZE, MAX_ALLOWED_FRAME_SIZE);
    }

    /// Recover the transport, consuming the writer.
    pub fn into_transport(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .transport
    }
}

impl<W: Write> Inner<W> {
    /// Emit an already-encoded header block as one HEADERS frame, plus
    /// CONTINUATION frames when the block exceeds the max frame size.
    fn write_header_block(&mut self, stream_id: u32, block: &[u8]) -> Result<(), WriteError> {
        let first_len = cmp::min(block.len(), self.max_frame_size);
        let (first, rest) = block.split_at(first_len);

        let first_flags = if rest.is_empty() { flags::END_HEADERS } else { 0 };
        let header = encode_frame_header(first.len(), frame_type::HEADERS, first_flags, stream_id);
        self.transport.write_all(&header)?;
        self.transport.write_all(first)?;

        let mut chunks = rest.chunks(self.max_frame_size).peekable();
        while let Some(chunk) = chunks.next() {
            let chunk_flags = if chunks.peek().is_none() { flags::END_HEADERS } else { 0 };
            let header =
                encode_frame_header(chunk.len(), frame_type::CONTINUATION, chunk_flags, stream_id);
            self.transport.write_all(&header)?;
            self.transport.write_all(chunk)?;
        }
        Ok(())
    }
}

impl<W: Write> FrameSink for FrameWriter<W> {
    fn write_informational(&self, stream_id: u32) -> Result<(), WriteError> {
        let mut inner = self.lock();
        let block = inner.encoder.encode_response(100, &[])?;
        inner.write_header_block(stream_id, &block)
    }

    fn write_data(
        &self,
        stream_id: u32,
        data: &[u8],
        end_stream: bool,
        token: &CancellationToken,
    ) -> Result<(), WriteError> {
        let mut inner = self.lock();

        if data.is_empty() {
            if token.is_cancelled() {
                return Err(WriteError::Cancelled);
            }
            let frame_flags = if end_stream { flags::END_STREAM } else { 0 };
            let header = encode_frame_header(0, frame_type::DATA, frame_flags, stream_id);
            inner.transport.write_all(&header)?;
            return Ok(());
        }

        let mut chunks = data.chunks(inner.max_frame_size).peekable();
        while let Some(chunk) = chunks.next() {
            // Frames already handed to the transport stay sent; stopping
            // between frames leaves the stream unfinished but well-framed.
            if token.is_cancelled() {
                return Err(WriteError::Cancelled);
            }
            let last = chunks.peek().is_none();
            let frame_flags = if end_stream && last { flags::END_STREAM } else { 0 };
            let header = encode_frame_header(chunk.len(), frame_type::DATA, frame_flags, stream_id);
            inner.transport.write_all(&header)?;
            inner.transport.write_all(chunk)?;
        }
        Ok(())
    }

    fn write_headers(
        &self,
        stream_id: u32,
        status_code: u16,
        _reason_phrase: Option<&str>,
        headers: &[HeaderField],
    ) -> Result<(), WriteError> {
        let mut inner = self.lock();
        let block = inner.encoder.encode_response(status_code, headers)?;
        inner.write_header_block(stream_id, &block)
    }

    fn flush(&self, token: &CancellationToken) -> Result<(), WriteError> {
        if token.is_cancelled() {
            return Err(WriteError::Cancelled);
        }
        let mut inner = self.lock();
        inner.transport.flush()?;
        Ok(())
    }
}
