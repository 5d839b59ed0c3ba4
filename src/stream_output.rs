//! Per-stream output producer.
//!
//! One [`StreamOutput`] exists for each HTTP/2 stream accepted by the
//! connection. It sits between the stream's handler (which produces status,
//! headers, body bytes and the terminal end-of-stream marker, in program
//! order) and the connection's shared [`FrameSink`], and gates every
//! outbound operation on whether the stream is still allowed to speak.
//!
//! Three parties touch a stream's output: the handler calling the write
//! operations sequentially, the connection's lifecycle manager calling
//! [`abort`](StreamOutput::abort) at any moment from its own context, and
//! the frame sink shared with every other stream. Only the abort-vs-write
//! race is supported; the write operations themselves are not safe to call
//! concurrently with each other.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::cancel::CancellationToken;
use crate::error::WriteError;
use crate::frame_writer::FrameSink;
use crate::hpack::HeaderField;

/// Gates a single stream's outbound frames on its liveness.
///
/// The abort flag transitions once, `false` to `true`, via an atomic swap.
/// No lock is shared with the write path: aborting must stay prompt even
/// while a write sits blocked on transport backpressure inside the sink.
///
/// Dropping the producer releases nothing; the frame sink belongs to the
/// connection.
pub struct StreamOutput<F> {
    stream_id: u32,
    writer: Arc<F>,
    aborted: AtomicBool,
    completed: AtomicBool,
}

impl<F: FrameSink> StreamOutput<F> {
    pub fn new(stream_id: u32, writer: Arc<F>) -> Self {
        Self {
            stream_id,
            writer,
            aborted: AtomicBool::new(false),
            completed: AtomicBool::new(false),
        }
    }

    pub fn stream_id(&self) -> u32 {
        self.stream_id
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Whether the stream has reached a terminal state, by finishing its
    /// body or by being aborted. Once true, stays true.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst) || self.is_aborted()
    }

    /// Signal that this stream must stop producing output.
    ///
    /// Idempotent; only the first call takes effect. Sends no frame itself.
    /// Safe to call from any context, concurrently with in-flight writes:
    /// a write already inside the sink may still complete, but every
    /// operation started after `abort` returns observes the aborted state.
    pub fn abort(&self, reason: &str) {
        if self.aborted.swap(true, Ordering::SeqCst) {
            return;
        }
        trace!(stream_id = self.stream_id, reason, "stream output aborted");
    }

    /// Emit an interim informational response (e.g. 100-continue).
    ///
    /// Suppressed as a no-op success on an aborted stream: the response is
    /// advisory, and a client that reset the stream cannot receive it. The
    /// token is carried for interface symmetry and not consulted.
    pub fn write_informational(&self, _token: &CancellationToken) -> Result<(), WriteError> {
        if self.is_aborted() {
            trace!(
                stream_id = self.stream_id,
                "informational response suppressed for aborted stream"
            );
            return Ok(());
        }
        self.writer.write_informational(self.stream_id)
    }

    /// Write a chunk of the response body.
    ///
    /// On an aborted stream the outcome depends on the caller's token: a
    /// cancellable token gets [`WriteError::StreamAborted`], because that
    /// caller asked to observe cancellation and must not lose data
    /// silently; a non-cancellable token gets a no-op success. On a live
    /// stream, a token that is already cancelled fails with
    /// [`WriteError::Cancelled`] before any data is forwarded.
    pub fn write_data(&self, data: &[u8], token: &CancellationToken) -> Result<(), WriteError> {
        if self.is_aborted() {
            if token.can_be_cancelled() {
                return Err(WriteError::StreamAborted);
            }
            trace!(
                stream_id = self.stream_id,
                "response data suppressed for aborted stream"
            );
            return Ok(());
        }

        if token.is_cancelled() {
            return Err(WriteError::Cancelled);
        }

        self.writer.write_data(self.stream_id, data, false, token)
    }

    /// Terminate the response body with an empty end-of-stream frame.
    ///
    /// Suppressed as a no-op on an aborted stream. Must be called at most
    /// once per successfully completed stream; completion tracking beyond
    /// that is the caller's contract.
    pub fn write_stream_suffix(&self, token: &CancellationToken) -> Result<(), WriteError> {
        if self.is_aborted() {
            trace!(
                stream_id = self.stream_id,
                "response suffix suppressed for aborted stream"
            );
            return Ok(());
        }
        self.completed.store(true, Ordering::SeqCst);
        self.writer.write_data(self.stream_id, &[], true, token)
    }

    /// Feed the response headers to the connection's frame writer, which
    /// compresses and transmits them as one atomic operation.
    ///
    /// The HPACK compressor is stateful and shared across all streams: a
    /// block that gets compressed must be sent. Aborted streams therefore
    /// skip compression entirely rather than compress-then-drop; most
    /// aborts happen before headers exist, so not paying the compression
    /// cost is the common-case win.
    pub fn write_response_headers(
        &self,
        status_code: u16,
        reason_phrase: Option<&str>,
        headers: &[HeaderField],
    ) -> Result<(), WriteError> {
        if self.is_aborted() {
            trace!(
                stream_id = self.stream_id,
                "response headers suppressed for aborted stream"
            );
            return Ok(());
        }
        self.writer
            .write_headers(self.stream_id, status_code, reason_phrase, headers)
    }

    /// Flush the transport. Forwarded regardless of abort state; flushing
    /// is harmless and may be needed to release backpressure even after an
    /// abort.
    pub fn flush(&self, token: &CancellationToken) -> Result<(), WriteError> {
        self.writer.flush(token)
    }
}
