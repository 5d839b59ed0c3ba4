//! HPACK: Header Compression for HTTP/2 (RFC 7541)
//!
//! Thin wrapper around `fluke-hpack` shaping the encoder for the server
//! response path: one [`ResponseEncoder`] per connection, shared by every
//! stream, fed one header block at a time.

use crate::chars;
use crate::error::WriteError;

/// A single response header field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// HPACK encoder for response header blocks.
///
/// Wraps `fluke_hpack::Encoder`, which maintains the dynamic table for the
/// whole connection. The table state advances on every encoded block, so a
/// block that has been encoded must also be transmitted; callers keep the
/// two steps under one lock.
pub struct ResponseEncoder {
    inner: fluke_hpack::Encoder<'static>,
}

impl std::fmt::Debug for ResponseEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEncoder").finish()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self {
            inner: fluke_hpack::Encoder::new(),
        }
    }

    /// Encode a response header block: the `:status` pseudo-header followed
    /// by `fields`, in order.
    ///
    /// Every field is validated against the classification tables before any
    /// compression happens, so a rejected block leaves the dynamic table
    /// untouched.
    pub fn encode_response(
        &mut self,
        status_code: u16,
        fields: &[HeaderField],
    ) -> Result<Vec<u8>, WriteError> {
        for field in fields {
            validate_field(field)?;
        }

        let status_text = status_code.to_string();
        let mut pairs: Vec<(&[u8], &[u8])> = Vec::with_capacity(fields.len() + 1);
        pairs.push((b":status", status_text.as_bytes()));
        for field in fields {
            pairs.push((field.name.as_bytes(), field.value.as_bytes()));
        }
        Ok(self.inner.encode(pairs))
    }
}

fn validate_field(field: &HeaderField) -> Result<(), WriteError> {
    if field.name.is_empty() || !field.name.bytes().all(chars::is_token) {
        return Err(WriteError::InvalidHeaderName);
    }
    if !field.value.bytes().all(chars::is_field_value) {
        return Err(WriteError::InvalidHeaderValue);
    }
    Ok(())
}
