//! Raw-frame helpers for inspecting writer output.

/// A frame split back out of the wire bytes.
#[derive(Debug, PartialEq)]
pub struct RawFrame {
    pub frame_type: u8,
    pub flags: u8,
    pub stream_id: u32,
    pub payload: Vec<u8>,
}

/// Split a byte stream into its frames. Panics on a truncated stream.
pub fn split_frames(mut bytes: &[u8]) -> Vec<RawFrame> {
    let mut frames = Vec::new();
    while !bytes.is_empty() {
        assert!(bytes.len() >= 9, "truncated frame header");
        let length = ((bytes[0] as usize) << 16) | ((bytes[1] as usize) << 8) | bytes[2] as usize;
        let frame_type = bytes[3];
        let flags = bytes[4];
        let stream_id =
            u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) & 0x7FFF_FFFF;
        assert!(bytes.len() >= 9 + length, "truncated frame payload");
        frames.push(RawFrame {
            frame_type,
            flags,
            stream_id,
            payload: bytes[9..9 + length].to_vec(),
        });
        bytes = &bytes[9 + length..];
    }
    frames
}

/// Decode an HPACK block into (name, value) strings.
pub fn decode_block(block: &[u8]) -> Vec<(String, String)> {
    let mut decoder = fluke_hpack::Decoder::new();
    decoder
        .decode(block)
        .expect("valid HPACK block")
        .into_iter()
        .map(|(name, value)| {
            (
                String::from_utf8_lossy(&name).into_owned(),
                String::from_utf8_lossy(&value).into_owned(),
            )
        })
        .collect()
}
