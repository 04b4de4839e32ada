// Copyright (c) 2025 Mika Paul Salewski
// This file is part of the rust-sensorbridge project and is licensed under the
// CC BY-NC-SA 4.0 license (see LICENSE.md for details).

//! Frame codec for the sentinel-terminated bus wire format
//!
//! A logical frame is a run of ASCII bytes terminated by a single `#`. Bus
//! transactions move fixed-size blocks, so a frame may span several blocks
//! and a block may carry trailing padding after the sentinel; the decoder
//! therefore accumulates bytes block by block and stops at the first
//! sentinel it sees.

use thiserror::Error;

use crate::bus::BusError;

/// Byte marking the logical end of a frame.
pub const SENTINEL: u8 = b'#';

/// Byte separating the fields of a frame payload.
pub const FIELD_SEPARATOR: u8 = b',';

/// Errors produced while encoding or decoding frames
#[derive(Debug, Error)]
pub enum FrameError {
    /// The sentinel never arrived within the configured byte bound.
    ///
    /// Without this bound a silent peer would stall the read loop forever;
    /// the bound turns that into a recoverable per-iteration error.
    #[error("no frame terminator within {max_bytes} bytes")]
    NoTerminator { max_bytes: usize },

    /// The decoded payload carries no field separator.
    #[error("malformed frame (no field separator): {payload:?}")]
    MalformedFrame { payload: String },

    /// An outbound frame does not fit into a single bus transaction.
    #[error("frame of {len} bytes exceeds the {block_size} byte block size")]
    FrameTooLong { len: usize, block_size: usize },

    /// The underlying bus transaction failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Encode a `(sensor_type, value)` pair as frame bytes.
///
/// The output is `"{sensor_type},{value}#"` and always ends with exactly one
/// sentinel byte.
pub fn encode_frame(sensor_type: &str, value: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(sensor_type.len() + value.len() + 2);
    frame.extend_from_slice(sensor_type.as_bytes());
    frame.push(FIELD_SEPARATOR);
    frame.extend_from_slice(value.as_bytes());
    frame.push(SENTINEL);
    frame
}

/// Encode a numeric reading as frame bytes.
pub fn encode_numeric_frame(sensor_type: &str, value: f64) -> Vec<u8> {
    encode_frame(sensor_type, &format_value(value))
}

/// Format a numeric value for the wire.
///
/// Uses the float Debug formatting, which is locale-independent and keeps a
/// trailing `.0` on integral values (`1.0`, not `1`) — the form the peer
/// firmware expects.
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

/// Split a decoded payload into its two fields at the first separator.
///
/// Payloads without a separator are rejected as [`FrameError::MalformedFrame`];
/// the caller is expected to drop the frame without forwarding it.
pub fn split_fields(payload: &str) -> Result<(String, String), FrameError> {
    match payload.split_once(FIELD_SEPARATOR as char) {
        Some((first, second)) => Ok((first.to_string(), second.to_string())),
        None => Err(FrameError::MalformedFrame {
            payload: payload.to_string(),
        }),
    }
}

/// Incremental frame decoder fed with fixed-size bus blocks.
///
/// Scans each block byte by byte: the first sentinel completes the frame and
/// yields the accumulated payload (sentinel excluded, any remaining block
/// bytes discarded); all other bytes are accumulated. A frame is never
/// interpreted before its sentinel has been observed.
#[derive(Debug)]
pub struct FrameAccumulator {
    buf: Vec<u8>,
    max_bytes: usize,
}

impl FrameAccumulator {
    /// Create an accumulator that abandons the frame once `max_bytes`
    /// payload bytes have been collected without a sentinel.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_bytes,
        }
    }

    /// Feed one block of bus bytes into the decoder.
    ///
    /// Returns `Ok(Some(payload))` when the sentinel was reached within this
    /// block, `Ok(None)` when more blocks are needed, and
    /// [`FrameError::NoTerminator`] once the byte bound is exceeded.
    pub fn push_block(&mut self, block: &[u8]) -> Result<Option<String>, FrameError> {
        for &byte in block {
            if byte == SENTINEL {
                // Frames are ASCII by contract; lossy conversion keeps a
                // garbled peer from turning into a hard error here.
                return Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()));
            }
            if self.buf.len() >= self.max_bytes {
                return Err(FrameError::NoTerminator {
                    max_bytes: self.max_bytes,
                });
            }
            self.buf.push(byte);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_single_block_with_mid_block_sentinel() {
        let mut acc = FrameAccumulator::new(256);
        // 20-byte block with padding after the sentinel
        let mut block = b"23.1,45.8#".to_vec();
        block.resize(20, 0xFF);

        let payload = acc.push_block(&block).unwrap().unwrap();
        assert_eq!(payload, "23.1,45.8");
        assert!(!payload.contains('#'));
    }

    #[test]
    fn decode_frame_spanning_multiple_blocks() {
        let mut acc = FrameAccumulator::new(256);
        assert!(acc.push_block(b"23.1,").unwrap().is_none());
        assert!(acc.push_block(b"45.8").unwrap().is_none());
        let payload = acc.push_block(b"#\xFF\xFF").unwrap().unwrap();
        assert_eq!(payload, "23.1,45.8");
    }

    #[test]
    fn decode_stops_at_first_sentinel() {
        let mut acc = FrameAccumulator::new(256);
        let payload = acc.push_block(b"1.0,2.0#junk,3.0#").unwrap().unwrap();
        assert_eq!(payload, "1.0,2.0");
    }

    #[test]
    fn missing_sentinel_hits_the_bound() {
        let mut acc = FrameAccumulator::new(8);
        let err = acc.push_block(b"0123456789").unwrap_err();
        assert!(matches!(err, FrameError::NoTerminator { max_bytes: 8 }));
    }

    #[test]
    fn missing_sentinel_hits_the_bound_across_blocks() {
        let mut acc = FrameAccumulator::new(32);
        for _ in 0..3 {
            assert!(acc.push_block(&[b'x'; 10]).unwrap().is_none());
        }
        let err = acc.push_block(&[b'x'; 10]).unwrap_err();
        assert!(matches!(err, FrameError::NoTerminator { .. }));
    }

    #[test]
    fn split_two_fields() {
        let (temperature, humidity) = split_fields("23.1,45.8").unwrap();
        assert_eq!(temperature, "23.1");
        assert_eq!(humidity, "45.8");
    }

    #[test]
    fn split_only_at_first_separator() {
        let (first, second) = split_fields("a,b,c").unwrap();
        assert_eq!(first, "a");
        assert_eq!(second, "b,c");
    }

    #[test]
    fn split_without_separator_is_malformed() {
        let err = split_fields("novalue").unwrap_err();
        match err {
            FrameError::MalformedFrame { payload } => assert_eq!(payload, "novalue"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encode_exact_bytes() {
        assert_eq!(
            encode_numeric_frame("bathroom_main", 1.0),
            b"bathroom_main,1.0#".to_vec()
        );
    }

    #[test]
    fn encode_ends_with_single_sentinel() {
        let frame = encode_frame("temperature", "23.5");
        assert_eq!(frame.last(), Some(&SENTINEL));
        assert_eq!(frame.iter().filter(|&&b| b == SENTINEL).count(), 1);
    }

    #[test]
    fn numeric_values_keep_a_decimal_point() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(23.1), "23.1");
    }
}
