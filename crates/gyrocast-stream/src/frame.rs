use gyrocast_orientation::Entry;
use thiserror::Error;

/// Total wire size of one frame: length byte plus three f64 fields.
pub const FRAME_LEN: usize = 25;
/// Value of the leading length byte (payload bytes after it).
pub const PAYLOAD_LEN: u8 = 24;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("frame is {0} bytes, expected 25")]
    WrongSize(usize),
    #[error("length byte is {0}, expected 24")]
    BadLength(u8),
}

/// Encode one entry into the fixed little-endian wire frame.
pub fn encode(entry: &Entry) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = PAYLOAD_LEN;
    frame[1..9].copy_from_slice(&entry.heading.to_le_bytes());
    frame[9..17].copy_from_slice(&entry.pitch.to_le_bytes());
    frame[17..25].copy_from_slice(&entry.reserved.to_le_bytes());
    frame
}

/// Decode a frame back into an entry.
///
/// Consumers must read exactly [`FRAME_LEN`] bytes per frame; the
/// protocol has no sync marker to recover from a truncated stream.
pub fn decode(frame: &[u8]) -> Result<Entry, FrameError> {
    if frame.len() != FRAME_LEN {
        return Err(FrameError::WrongSize(frame.len()));
    }
    if frame[0] != PAYLOAD_LEN {
        return Err(FrameError::BadLength(frame[0]));
    }

    let field = |at: usize| -> f64 {
        let bytes: [u8; 8] = frame[at..at + 8].try_into().unwrap();
        f64::from_le_bytes(bytes)
    };

    Ok(Entry {
        heading: field(1),
        pitch: field(9),
        reserved: field(17),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_doubles() {
        let entry = Entry::new(-37.251234567890123, 88.999999999999999);
        let frame = encode(&entry);

        assert_eq!(frame.len(), FRAME_LEN);
        assert_eq!(frame[0], 24);

        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.heading.to_bits(), entry.heading.to_bits());
        assert_eq!(decoded.pitch.to_bits(), entry.pitch.to_bits());
        assert_eq!(decoded.reserved.to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn fields_are_little_endian_in_order() {
        let entry = Entry::new(1.0, 2.0);
        let frame = encode(&entry);
        assert_eq!(&frame[1..9], &1.0f64.to_le_bytes());
        assert_eq!(&frame[9..17], &2.0f64.to_le_bytes());
        assert_eq!(&frame[17..25], &0.0f64.to_le_bytes());
    }

    #[test]
    fn rejects_malformed_frames() {
        assert_eq!(decode(&[0u8; 10]), Err(FrameError::WrongSize(10)));

        let mut frame = encode(&Entry::new(0.0, 0.0));
        frame[0] = 16;
        assert_eq!(decode(&frame), Err(FrameError::BadLength(16)));
    }
}
