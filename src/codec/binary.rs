//! Fixed-order binary codec
//!
//! Layout, all integers little-endian, no field tags:
//!
//! | order | field      | encoding                          |
//! |-------|------------|-----------------------------------|
//! | 1     | `name`     | `u32` byte length + UTF-8 bytes   |
//! | 2     | `title`    | `u32` byte length + UTF-8 bytes   |
//! | 3     | `subtitle` | `u32` byte length + UTF-8 bytes   |
//! | 4     | `kind`     | `u32` byte length + variant name  |
//! | 5     | `delay`    | `i32`                             |
//!
//! Both ends are expected to run matching versions, so an unrecognised kind
//! name is always an error here.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use super::{DecodeError, EncodeError};
use crate::models::{ProxyKind, ProxyRecord};

const LEN_PREFIX: usize = 4;
const DELAY_WIDTH: usize = 4;

/// Encode a record into a fresh buffer.
pub fn encode(record: &ProxyRecord) -> Result<Bytes, EncodeError> {
    let mut buf = BytesMut::with_capacity(encoded_len(record));
    encode_into(record, &mut buf)?;
    Ok(buf.freeze())
}

/// Append a record to `buf`.
pub fn encode_into<B: BufMut>(record: &ProxyRecord, buf: &mut B) -> Result<(), EncodeError> {
    // Check every length first so a failure leaves `buf` untouched.
    let fields = [
        ("name", record.name()),
        ("title", record.title()),
        ("subtitle", record.subtitle()),
        ("kind", record.kind().name()),
    ];
    let mut prefixes = [0u32; 4];
    for (prefix, (field, value)) in prefixes.iter_mut().zip(fields.iter()) {
        *prefix = u32::try_from(value.len()).map_err(|_| EncodeError::FieldTooLong {
            field: *field,
            len: value.len(),
        })?;
    }

    for (prefix, (_, value)) in prefixes.iter().zip(fields.iter()) {
        buf.put_u32_le(*prefix);
        buf.put_slice(value.as_bytes());
    }
    buf.put_i32_le(record.delay());
    Ok(())
}

/// Decode exactly one record; trailing bytes are rejected.
pub fn decode(mut data: &[u8]) -> Result<ProxyRecord, DecodeError> {
    let record = decode_from(&mut data)?;
    if !data.is_empty() {
        return Err(DecodeError::MalformedEncoding(format!(
            "{} trailing bytes after record",
            data.len()
        )));
    }
    Ok(record)
}

/// Decode one record from the front of `buf`, leaving the rest in place.
pub fn decode_from<B: Buf>(buf: &mut B) -> Result<ProxyRecord, DecodeError> {
    let name = read_string(buf, "name")?;
    let title = read_string(buf, "title")?;
    let subtitle = read_string(buf, "subtitle")?;
    let kind_tag = read_string(buf, "kind")?;
    let kind = ProxyKind::from_name(&kind_tag).ok_or_else(|| {
        debug!("Rejecting binary record `{}` with kind {:?}", name, kind_tag);
        DecodeError::UnknownKind(kind_tag.clone())
    })?;
    if buf.remaining() < DELAY_WIDTH {
        return Err(truncated("delay", DELAY_WIDTH, buf.remaining()));
    }
    let delay = buf.get_i32_le();

    Ok(ProxyRecord::new(name, title, subtitle, kind).with_delay(delay))
}

/// Encode a sequence of records as a `u32` count followed by each record.
pub fn encode_list(records: &[ProxyRecord]) -> Result<Bytes, EncodeError> {
    let count = u32::try_from(records.len()).map_err(|_| EncodeError::FieldTooLong {
        field: "records",
        len: records.len(),
    })?;
    let capacity = LEN_PREFIX + records.iter().map(encoded_len).sum::<usize>();
    let mut buf = BytesMut::with_capacity(capacity);
    buf.put_u32_le(count);
    for record in records {
        encode_into(record, &mut buf)?;
    }
    Ok(buf.freeze())
}

/// Decode a sequence written by [`encode_list`]; trailing bytes are rejected.
pub fn decode_list(mut data: &[u8]) -> Result<Vec<ProxyRecord>, DecodeError> {
    if data.remaining() < LEN_PREFIX {
        return Err(truncated("record count", LEN_PREFIX, data.remaining()));
    }
    let count = data.get_u32_le() as usize;
    debug!("Decoding {} binary records", count);

    // Each record needs at least four length prefixes and a delay.
    let min_record = 4 * LEN_PREFIX + DELAY_WIDTH;
    let mut records = Vec::with_capacity(count.min(data.len() / min_record));
    for _ in 0..count {
        records.push(decode_from(&mut data)?);
    }
    if !data.is_empty() {
        return Err(DecodeError::MalformedEncoding(format!(
            "{} trailing bytes after record list",
            data.len()
        )));
    }
    Ok(records)
}

fn encoded_len(record: &ProxyRecord) -> usize {
    4 * LEN_PREFIX
        + record.name().len()
        + record.title().len()
        + record.subtitle().len()
        + record.kind().name().len()
        + DELAY_WIDTH
}

fn read_string<B: Buf>(buf: &mut B, field: &'static str) -> Result<String, DecodeError> {
    if buf.remaining() < LEN_PREFIX {
        return Err(truncated(field, LEN_PREFIX, buf.remaining()));
    }
    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(truncated(field, len, buf.remaining()));
    }

    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(|e| {
        DecodeError::MalformedEncoding(format!("field `{}` is not valid UTF-8: {}", field, e))
    })
}

fn truncated(field: &str, needed: usize, remaining: usize) -> DecodeError {
    DecodeError::MalformedEncoding(format!(
        "truncated input reading `{}`: need {} bytes, {} remaining",
        field, needed, remaining
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProxyRecord {
        ProxyRecord::new("sg-02", "Singapore 02", "sg.example.com:443", ProxyKind::Vless)
            .with_delay(57)
    }

    #[test]
    fn test_exact_layout() {
        let record = ProxyRecord::new("a", "bc", "", ProxyKind::Dns).with_delay(-2);
        let encoded = encode(&record).unwrap();

        let parts: [&[u8]; 8] = [
            &[1, 0, 0, 0],
            b"a",
            &[2, 0, 0, 0],
            b"bc",
            &[0, 0, 0, 0],
            &[3, 0, 0, 0],
            b"Dns",
            &[0xfe, 0xff, 0xff, 0xff],
        ];
        assert_eq!(&encoded[..], &parts.concat()[..]);
        assert_eq!(encoded.len(), encoded_len(&record));
    }

    #[test]
    fn test_round_trip() {
        let record = sample();
        let encoded = encode(&record).unwrap();
        assert_eq!(decode(&encoded).unwrap(), record);
    }

    #[test]
    fn test_decode_from_leaves_remainder() {
        let mut buf = BytesMut::new();
        encode_into(&sample(), &mut buf).unwrap();
        buf.put_slice(b"tail");

        let mut data = buf.freeze();
        let record = decode_from(&mut data).unwrap();
        assert_eq!(record, sample());
        assert_eq!(&data[..], &b"tail"[..]);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut raw = encode(&sample()).unwrap().to_vec();
        raw.push(0);
        assert!(matches!(
            decode(&raw),
            Err(DecodeError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_truncated_input() {
        let raw = encode(&sample()).unwrap();
        for cut in 0..raw.len() {
            assert!(
                matches!(decode(&raw[..cut]), Err(DecodeError::MalformedEncoding(_))),
                "cut at {} should fail",
                cut
            );
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let parts: [&[u8]; 2] = [&[2, 0, 0, 0], &[0xc3, 0x28]];
        let raw = parts.concat();
        assert!(matches!(
            decode(&raw),
            Err(DecodeError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut buf = BytesMut::new();
        for field in ["n", "t", "s", "SomeFutureProtocol"] {
            buf.put_u32_le(field.len() as u32);
            buf.put_slice(field.as_bytes());
        }
        buf.put_i32_le(0);

        assert_eq!(
            decode(&buf),
            Err(DecodeError::UnknownKind("SomeFutureProtocol".to_string()))
        );
    }

    #[test]
    fn test_list_round_trip() {
        let records = vec![
            sample(),
            ProxyRecord::new("GLOBAL", "GLOBAL", "Selector", ProxyKind::Selector),
        ];
        let encoded = encode_list(&records).unwrap();
        assert_eq!(&encoded[..4], &[2u8, 0, 0, 0][..]);
        assert_eq!(decode_list(&encoded).unwrap(), records);
    }

    #[test]
    fn test_list_huge_count_does_not_preallocate() {
        let raw = u32::MAX.to_le_bytes();
        assert!(matches!(
            decode_list(&raw),
            Err(DecodeError::MalformedEncoding(_))
        ));
    }
}
