use procd_types::{Frame, FRAME_HEADER_LEN};

use crate::WireError;

/// Stateless encode/decode for the `[flag][u32 len BE][payload]` frame
/// shape described by `procd_types::Frame`.
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes a frame, rejecting payloads larger than `max_payload_bytes`.
    pub fn encode(frame: &Frame, max_payload_bytes: u32) -> Result<Vec<u8>, WireError> {
        let len = frame.length();
        if len > max_payload_bytes {
            return Err(WireError::MessageTooLarge { len, max: max_payload_bytes });
        }
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + frame.payload.len());
        out.push(frame.compressed as u8);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&frame.payload);
        Ok(out)
    }

    /// Decodes the fixed 5-byte header into `(compressed, length)`.
    pub fn decode_header(header: &[u8]) -> Result<(bool, u32), WireError> {
        if header.len() < FRAME_HEADER_LEN {
            return Err(WireError::IncompleteHeader);
        }
        let compressed = header[0] != 0;
        let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
        Ok((compressed, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_then_decode_header_round_trips_length_and_flag() {
        let frame = Frame::new(true, vec![1, 2, 3, 4, 5]);
        let bytes = FrameCodec::encode(&frame, procd_types::DEFAULT_MAX_PAYLOAD_BYTES).unwrap();
        let (compressed, len) = FrameCodec::decode_header(&bytes[..5]).unwrap();
        assert!(compressed);
        assert_eq!(len as usize, frame.payload.len());
        assert_eq!(&bytes[5..], &frame.payload[..]);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let frame = Frame::uncompressed(vec![0u8; 11]);
        let err = FrameCodec::encode(&frame, 10).unwrap_err();
        assert!(matches!(err, WireError::MessageTooLarge { len: 11, max: 10 }));
    }

    #[test]
    fn exactly_max_payload_is_accepted_one_byte_over_is_rejected() {
        let max = procd_types::DEFAULT_MAX_PAYLOAD_BYTES;
        let at_limit = Frame::uncompressed(vec![0u8; max as usize]);
        assert!(FrameCodec::encode(&at_limit, max).is_ok());

        let over_limit = Frame::uncompressed(vec![0u8; max as usize + 1]);
        let err = FrameCodec::encode(&over_limit, max).unwrap_err();
        assert!(matches!(err, WireError::MessageTooLarge { len, max: m } if len == max + 1 && m == max));
    }

    #[test]
    fn short_header_is_incomplete() {
        let err = FrameCodec::decode_header(&[0u8, 1, 2]).unwrap_err();
        assert!(matches!(err, WireError::IncompleteHeader));
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_arbitrary_small_payloads(payload in proptest::collection::vec(any::<u8>(), 0..4096), compressed: bool) {
            let frame = Frame::new(compressed, payload.clone());
            let bytes = FrameCodec::encode(&frame, procd_types::DEFAULT_MAX_PAYLOAD_BYTES).unwrap();
            let (decoded_compressed, decoded_len) = FrameCodec::decode_header(&bytes[..5]).unwrap();
            prop_assert_eq!(decoded_compressed, compressed);
            prop_assert_eq!(decoded_len as usize, payload.len());
            prop_assert_eq!(&bytes[5..], &payload[..]);
        }
    }
}
