#![doc = r#"
Variable length quantities

Delta times and event lengths in a MIDI file are written big-endian, seven
bits per byte. Every byte except the last has its top bit set.

```text
0x00000000  00
0x0000007F  7F
0x00000080  81 00
0x00003FFF  FF 7F
0x0FFFFFFF  FF FF FF 7F
```

Standard MIDI Files cap a quantity at four bytes, so the largest value is
[`MAX_VLQ`].
"#]
use crate::FileError;

/// Largest value a four byte quantity can hold
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Appends the encoding of `value` to `out`.
///
/// Fails for values above [`MAX_VLQ`].
pub fn encode_vlq(value: u32, out: &mut Vec<u8>) -> Result<(), FileError> {
    if value > MAX_VLQ {
        return Err(FileError::DeltaTimeOverflow(value));
    }
    let mut buffer = [0u8; 4];
    let mut index = buffer.len() - 1;
    buffer[index] = (value & 0x7F) as u8;
    let mut rest = value >> 7;
    while rest > 0 {
        index -= 1;
        buffer[index] = ((rest & 0x7F) as u8) | 0x80;
        rest >>= 7;
    }
    out.extend_from_slice(&buffer[index..]);
    Ok(())
}

/// Appends the length prefix of a meta or system exclusive payload.
///
/// Fails with [`FileError::OversizedEvent`] above [`MAX_VLQ`] bytes.
pub fn encode_length(length: usize, out: &mut Vec<u8>) -> Result<(), FileError> {
    match u32::try_from(length) {
        Ok(value) if value <= MAX_VLQ => encode_vlq(value, out),
        _ => Err(FileError::OversizedEvent {
            length,
            max: MAX_VLQ as usize,
        }),
    }
}

/// Decodes a quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed, `Ok(None)` if `bytes`
/// ends before the quantity does.
pub fn decode_vlq(bytes: &[u8]) -> Result<Option<(u32, usize)>, FileError> {
    let mut value = 0u32;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == 4 {
            return Err(FileError::VlqOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    Ok(None)
}

/// Number of bytes [`encode_vlq`] writes for `value`
pub const fn vlq_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encoded(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_vlq(value, &mut out).unwrap();
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(encoded(128), vec![0x81, 0x00]);
        assert_eq!(encoded(0x2000), vec![0xC0, 0x00]);
        assert_eq!(encoded(0x3FFF), vec![0xFF, 0x7F]);
        assert_eq!(encoded(0x4000), vec![0x81, 0x80, 0x00]);
        assert_eq!(encoded(MAX_VLQ), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn decode_inverts_encode() {
        let mut value = 0u32;
        while value <= MAX_VLQ {
            let bytes = encoded(value);
            assert_eq!(bytes.len(), vlq_len(value));
            assert_eq!(decode_vlq(&bytes), Ok(Some((value, bytes.len()))));
            value = value * 3 + 1;
        }
        for value in [MAX_VLQ - 1, MAX_VLQ, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000] {
            assert_eq!(decode_vlq(&encoded(value)), Ok(Some((value, vlq_len(value)))));
        }
    }

    #[test]
    fn decode_stops_at_last_byte() {
        assert_eq!(decode_vlq(&[0x81, 0x00, 0x55]), Ok(Some((128, 2))));
    }

    #[test]
    fn truncated_and_oversized() {
        assert_eq!(decode_vlq(&[0x81, 0x80]), Ok(None));
        assert_eq!(decode_vlq(&[]), Ok(None));
        assert_eq!(
            decode_vlq(&[0x81, 0x80, 0x80, 0x80, 0x00]),
            Err(FileError::VlqOverflow)
        );
        assert_eq!(
            encode_vlq(MAX_VLQ + 1, &mut Vec::new()),
            Err(FileError::DeltaTimeOverflow(MAX_VLQ + 1))
        );
    }

    #[test]
    fn payload_lengths() {
        let mut out = Vec::new();
        encode_length(0x80, &mut out).unwrap();
        assert_eq!(out, vec![0x81, 0x00]);
        let too_long = MAX_VLQ as usize + 1;
        assert_eq!(
            encode_length(too_long, &mut Vec::new()),
            Err(FileError::OversizedEvent {
                length: too_long,
                max: MAX_VLQ as usize
            })
        );
    }
}
