//! Decoding of single entries.
//!
//! Every `read_*` function consumes exactly one entry and advances the cursor
//! past it, or returns an error and leaves the cursor where it was. Character,
//! octet and bit payloads are borrowed from the input buffer, never copied.

use relir_util::{BitView, Date, DatetimeInterval, Decimal, TimeOfDay, TimePoint};

use crate::{header, Entry, EntryType, Error, ReadCursor, Result};

/// Returns the kind of the next entry without consuming anything.
///
/// An empty cursor yields [`EntryType::BufferUnderflow`]; only a header byte
/// that is not part of the format is an error.
pub fn peek_type(input: &ReadCursor<'_>) -> Result<EntryType> {
    match input.rest().first() {
        None => Ok(EntryType::BufferUnderflow),
        Some(&byte) => classify(byte),
    }
}

fn classify(byte: u8) -> Result<EntryType> {
    header::classify(byte).ok_or_else(|| {
        log::debug!("rejecting unknown entry header 0x{byte:02x}");
        Error::UnknownHeader(byte)
    })
}

/// Consumes the header byte of the next entry, which must be of kind `expected`.
fn take_header(input: &mut ReadCursor<'_>, expected: EntryType) -> Result<u8> {
    let byte = input.get_u8()?;
    let found = classify(byte)?;
    if found != expected {
        return Err(Error::KindMismatch { expected, found });
    }
    Ok(byte)
}

/// Runs `read` on a copy of the cursor and commits the copy only on success.
fn transact<'a, T>(
    input: &mut ReadCursor<'a>,
    read: impl FnOnce(&mut ReadCursor<'a>) -> Result<T>,
) -> Result<T> {
    let mut attempt = *input;
    let value = read(&mut attempt)?;
    *input = attempt;
    Ok(value)
}

fn malformed(kind: EntryType, reason: &'static str) -> Error {
    Error::Malformed { kind, reason }
}

pub fn read_end_of_contents(input: &mut ReadCursor<'_>) -> Result<()> {
    transact(input, |r| {
        take_header(r, EntryType::EndOfContents)?;
        Ok(())
    })
}

pub fn read_null(input: &mut ReadCursor<'_>) -> Result<()> {
    transact(input, |r| take_header(r, EntryType::Null).map(|_| ()))
}

/// Decodes the body of an `int` entry whose header byte was already consumed.
fn int_body(input: &mut ReadCursor<'_>, byte: u8) -> Result<i64> {
    match byte {
        header::EMBED_POSITIVE_INT..=0x3F => Ok(i64::from(byte - header::EMBED_POSITIVE_INT)),
        header::EMBED_NEGATIVE_INT..=0x4F => {
            Ok(i64::from(byte - header::EMBED_NEGATIVE_INT) + header::MIN_EMBED_NEGATIVE_INT)
        }
        _ => input.get_sized_signed(EntryType::Int),
    }
}

pub fn read_int(input: &mut ReadCursor<'_>) -> Result<i64> {
    transact(input, |r| {
        let byte = take_header(r, EntryType::Int)?;
        int_body(r, byte)
    })
}

pub fn read_float4(input: &mut ReadCursor<'_>) -> Result<f32> {
    transact(input, |r| {
        take_header(r, EntryType::Float4)?;
        Ok(f32::from_be_bytes(r.get_array()?))
    })
}

pub fn read_float8(input: &mut ReadCursor<'_>) -> Result<f64> {
    transact(input, |r| {
        take_header(r, EntryType::Float8)?;
        Ok(f64::from_be_bytes(r.get_array()?))
    })
}

/// Reads a `decimal` entry, or an `int` entry promoted to a decimal of scale zero.
pub fn read_decimal(input: &mut ReadCursor<'_>) -> Result<Decimal> {
    transact(input, |r| {
        let byte = r.get_u8()?;
        match classify(byte)? {
            EntryType::Int => Ok(Decimal::from_i64(int_body(r, byte)?)),
            EntryType::Decimal => decimal_body(r),
            found => Err(Error::KindMismatch {
                expected: EntryType::Decimal,
                found,
            }),
        }
    })
}

fn decimal_body(input: &mut ReadCursor<'_>) -> Result<Decimal> {
    const KIND: EntryType = EntryType::Decimal;

    let negative = match input.get_u8()? {
        0 => false,
        1 => true,
        _ => return Err(malformed(KIND, "invalid sign byte")),
    };
    let scale = i32::try_from(input.get_sized_signed(KIND)?)
        .map_err(|_| malformed(KIND, "scale does not fit in 32 bits"))?;

    let len = usize::from(input.get_u8()?);
    if len > header::MAX_DECIMAL_MAGNITUDE_LEN {
        return Err(malformed(KIND, "magnitude wider than 128 bits"));
    }
    let magnitude = input
        .get_slice(len)?
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));

    Ok(Decimal::new(negative, magnitude, scale))
}

fn character_body<'a>(input: &mut ReadCursor<'a>, byte: u8) -> Result<&'a str> {
    let len = match byte {
        header::CHARACTER_ID => input.get_length(EntryType::Character)?,
        _ => usize::from(byte - header::EMBED_CHARACTER),
    };
    std::str::from_utf8(input.get_slice(len)?)
        .map_err(|_| malformed(EntryType::Character, "payload is not valid UTF-8"))
}

/// Reads a character string, borrowed from the input buffer.
pub fn read_character<'a>(input: &mut ReadCursor<'a>) -> Result<&'a str> {
    transact(input, |r| {
        let byte = take_header(r, EntryType::Character)?;
        character_body(r, byte)
    })
}

fn octet_body<'a>(input: &mut ReadCursor<'a>, byte: u8) -> Result<&'a [u8]> {
    let len = match byte {
        header::OCTET_ID => input.get_length(EntryType::Octet)?,
        _ => usize::from(byte - header::EMBED_OCTET),
    };
    input.get_slice(len)
}

/// Reads an octet string, borrowed from the input buffer.
pub fn read_octet<'a>(input: &mut ReadCursor<'a>) -> Result<&'a [u8]> {
    transact(input, |r| {
        let byte = take_header(r, EntryType::Octet)?;
        octet_body(r, byte)
    })
}

fn bit_body<'a>(input: &mut ReadCursor<'a>) -> Result<BitView<'a>> {
    let bits = input.get_uint(EntryType::Bit)?;
    let bits = usize::try_from(bits)
        .map_err(|_| malformed(EntryType::Bit, "bit count overflows"))?;
    let bytes = input.get_slice(bits.div_ceil(8))?;
    BitView::new(bytes, bits)
        .ok_or_else(|| malformed(EntryType::Bit, "bit count does not match payload"))
}

/// Reads a bit string, borrowed from the input buffer.
pub fn read_bit<'a>(input: &mut ReadCursor<'a>) -> Result<BitView<'a>> {
    transact(input, |r| {
        take_header(r, EntryType::Bit)?;
        bit_body(r)
    })
}

pub fn read_date(input: &mut ReadCursor<'_>) -> Result<Date> {
    transact(input, |r| {
        take_header(r, EntryType::Date)?;
        Ok(Date::new(r.get_sized_signed(EntryType::Date)?))
    })
}

fn time_of_day_body(input: &mut ReadCursor<'_>, kind: EntryType) -> Result<TimeOfDay> {
    TimeOfDay::new(input.get_uint(kind)?)
        .map_err(|_| malformed(kind, "time of day exceeds one day"))
}

pub fn read_time_of_day(input: &mut ReadCursor<'_>) -> Result<TimeOfDay> {
    transact(input, |r| {
        take_header(r, EntryType::TimeOfDay)?;
        time_of_day_body(r, EntryType::TimeOfDay)
    })
}

fn time_point_body(input: &mut ReadCursor<'_>) -> Result<TimePoint> {
    let date = Date::new(input.get_sized_signed(EntryType::TimePoint)?);
    let time_of_day = time_of_day_body(input, EntryType::TimePoint)?;
    Ok(TimePoint::new(date, time_of_day))
}

pub fn read_time_point(input: &mut ReadCursor<'_>) -> Result<TimePoint> {
    transact(input, |r| {
        take_header(r, EntryType::TimePoint)?;
        time_point_body(r)
    })
}

fn datetime_interval_body(input: &mut ReadCursor<'_>) -> Result<DatetimeInterval> {
    const KIND: EntryType = EntryType::DatetimeInterval;
    let mut field = || -> Result<i32> {
        let value = input.get_sized_signed(KIND)?;
        i32::try_from(value)
            .map_err(|_| malformed(KIND, "component does not fit in 32 bits"))
    };
    Ok(DatetimeInterval {
        year: field()?,
        month: field()?,
        day: field()?,
        hour: field()?,
        minute: field()?,
        second: field()?,
        subsecond_nanos: field()?,
    })
}

pub fn read_datetime_interval(input: &mut ReadCursor<'_>) -> Result<DatetimeInterval> {
    transact(input, |r| {
        take_header(r, EntryType::DatetimeInterval)?;
        datetime_interval_body(r)
    })
}

fn count_body(input: &mut ReadCursor<'_>, byte: u8, kind: EntryType) -> Result<usize> {
    let count = match byte {
        header::ROW_ID | header::ARRAY_ID => input.get_uint(kind)?,
        header::EMBED_ROW..=0xAF => u64::from(byte - header::EMBED_ROW),
        _ => u64::from(byte - header::EMBED_ARRAY),
    };
    match usize::try_from(count) {
        Ok(count) if count <= header::MAX_ELEMENT_COUNT => Ok(count),
        _ => Err(malformed(kind, "element count exceeds 31 bits")),
    }
}

/// Reads the element count of a row. The elements themselves follow as separate entries.
pub fn read_row_begin(input: &mut ReadCursor<'_>) -> Result<usize> {
    transact(input, |r| {
        let byte = take_header(r, EntryType::Row)?;
        count_body(r, byte, EntryType::Row)
    })
}

/// Reads the element count of an array. The elements themselves follow as separate entries.
pub fn read_array_begin(input: &mut ReadCursor<'_>) -> Result<usize> {
    transact(input, |r| {
        let byte = take_header(r, EntryType::Array)?;
        count_body(r, byte, EntryType::Array)
    })
}

/// Reads whatever entry comes next.
pub fn read_entry<'a>(input: &mut ReadCursor<'a>) -> Result<Entry<'a>> {
    transact(input, |r| {
        let byte = r.get_u8()?;
        let entry = match classify(byte)? {
            EntryType::Null => Entry::Null,
            EntryType::Int => Entry::Int(int_body(r, byte)?),
            EntryType::Float4 => Entry::Float4(f32::from_be_bytes(r.get_array()?)),
            EntryType::Float8 => Entry::Float8(f64::from_be_bytes(r.get_array()?)),
            EntryType::Decimal => Entry::Decimal(decimal_body(r)?),
            EntryType::Character => Entry::Character(character_body(r, byte)?),
            EntryType::Octet => Entry::Octet(octet_body(r, byte)?),
            EntryType::Bit => Entry::Bit(bit_body(r)?),
            EntryType::Date => Entry::Date(Date::new(r.get_sized_signed(EntryType::Date)?)),
            EntryType::TimeOfDay => Entry::TimeOfDay(time_of_day_body(r, EntryType::TimeOfDay)?),
            EntryType::TimePoint => Entry::TimePoint(time_point_body(r)?),
            EntryType::DatetimeInterval => Entry::DatetimeInterval(datetime_interval_body(r)?),
            EntryType::Row => Entry::RowBegin(count_body(r, byte, EntryType::Row)?),
            EntryType::Array => Entry::ArrayBegin(count_body(r, byte, EntryType::Array)?),
            EntryType::EndOfContents => Entry::EndOfContents,
            EntryType::BufferUnderflow => unreachable!("never produced by header::classify"),
        };
        Ok(entry)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn peek_empty_is_underflow() {
        let input = ReadCursor::new(&[]);
        assert_eq!(peek_type(&input), Ok(EntryType::BufferUnderflow));
    }

    #[test]
    fn peek_end_of_contents_is_not_underflow() {
        let input = ReadCursor::new(&[header::END_OF_CONTENTS_ID]);
        assert_eq!(peek_type(&input), Ok(EntryType::EndOfContents));
    }

    #[test]
    fn peek_unknown_header_fails() {
        let input = ReadCursor::new(&[0xF0]);
        assert_eq!(peek_type(&input), Err(Error::UnknownHeader(0xF0)));
    }

    #[test]
    fn peek_does_not_advance() {
        let buf = [header::INT_ID, 2, 0x03, 0xE8];
        let mut input = ReadCursor::new(&buf);
        for _ in 0..3 {
            assert_eq!(peek_type(&input), Ok(EntryType::Int));
        }
        assert_eq!(input.position(), 0);
        assert_eq!(read_int(&mut input), Ok(1000));
        assert!(input.is_empty());
    }

    #[test]
    fn embedded_int_ranges() {
        assert_eq!(read_int(&mut ReadCursor::new(&[0x00])), Ok(0));
        assert_eq!(read_int(&mut ReadCursor::new(&[0x3F])), Ok(63));
        assert_eq!(read_int(&mut ReadCursor::new(&[0x40])), Ok(-16));
        assert_eq!(read_int(&mut ReadCursor::new(&[0x4F])), Ok(-1));
    }

    #[test]
    fn full_width_int_is_sign_extended() {
        let mut input = ReadCursor::new(&[header::INT_ID, 1, 0xEF]);
        assert_eq!(read_int(&mut input), Ok(-17));
        let mut input = ReadCursor::new(&[header::INT_ID, 2, 0xFC, 0x18]);
        assert_eq!(read_int(&mut input), Ok(-1000));
    }

    #[test]
    fn kind_mismatch_leaves_cursor() {
        let buf = [header::NULL_ID];
        let mut input = ReadCursor::new(&buf);
        assert_eq!(
            read_int(&mut input),
            Err(Error::KindMismatch {
                expected: EntryType::Int,
                found: EntryType::Null
            })
        );
        assert_eq!(input.position(), 0);
        let err = read_end_of_contents(&mut input).unwrap_err();
        assert!(!err.is_malformed());
        assert_eq!(read_null(&mut input), Ok(()));
        assert!(input.is_empty());
    }

    #[test]
    fn read_on_empty_is_truncated() {
        let mut input = ReadCursor::new(&[]);
        assert_eq!(
            read_null(&mut input),
            Err(Error::Truncated {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn truncated_payload_leaves_cursor() {
        let buf = [header::FLOAT8_ID, 0x40, 0x09];
        let mut input = ReadCursor::new(&buf);
        let err = read_float8(&mut input).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn invalid_int_width_is_malformed() {
        let mut input = ReadCursor::new(&[header::INT_ID, 3, 0, 0, 0]);
        assert_eq!(
            read_int(&mut input),
            Err(Error::Malformed {
                kind: EntryType::Int,
                reason: "invalid integer width"
            })
        );
    }

    #[test]
    fn decimal_accepts_int() {
        let mut input = ReadCursor::new(&[0x05]);
        assert_eq!(read_decimal(&mut input), Ok(Decimal::from_i64(5)));
    }

    #[test]
    fn decimal_rejects_bad_sign() {
        let mut input = ReadCursor::new(&[header::DECIMAL_ID, 2, 0, 0]);
        assert!(matches!(
            read_decimal(&mut input),
            Err(Error::Malformed {
                kind: EntryType::Decimal,
                ..
            })
        ));
    }

    #[test]
    fn decimal_rejects_wide_magnitude() {
        let mut buf = vec![header::DECIMAL_ID, 0, 0, 17];
        buf.extend_from_slice(&[0xFF; 17]);
        let mut input = ReadCursor::new(&buf);
        assert!(read_decimal(&mut input).unwrap_err().is_malformed());
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn character_rejects_invalid_utf8() {
        let mut input = ReadCursor::new(&[header::EMBED_CHARACTER + 2, 0xC3, 0x28]);
        assert_eq!(
            read_character(&mut input),
            Err(Error::Malformed {
                kind: EntryType::Character,
                reason: "payload is not valid UTF-8"
            })
        );
    }

    #[test]
    fn octet_length_beyond_input_is_truncated() {
        let mut input = ReadCursor::new(&[header::OCTET_ID, 200, 1, 2, 3]);
        assert_eq!(
            read_octet(&mut input),
            Err(Error::Truncated {
                needed: 200,
                remaining: 3
            })
        );
    }

    #[test]
    fn time_of_day_rejects_overflow() {
        let mut buf = vec![header::TIME_OF_DAY_ID, header::UINT_U64];
        buf.extend_from_slice(&relir_util::temporal::NANOS_PER_DAY.to_be_bytes());
        let mut input = ReadCursor::new(&buf);
        assert!(matches!(
            read_time_of_day(&mut input),
            Err(Error::Malformed {
                kind: EntryType::TimeOfDay,
                ..
            })
        ));
    }

    #[test]
    fn oversized_count_is_malformed() {
        let mut buf = vec![header::ARRAY_ID, header::UINT_U32];
        buf.extend_from_slice(&0x8000_0000u32.to_be_bytes());
        let mut input = ReadCursor::new(&buf);
        assert!(matches!(
            read_array_begin(&mut input),
            Err(Error::Malformed {
                kind: EntryType::Array,
                ..
            })
        ));
    }

    #[test]
    fn embedded_counts() {
        assert_eq!(
            read_row_begin(&mut ReadCursor::new(&[header::EMBED_ROW])),
            Ok(0)
        );
        assert_eq!(read_row_begin(&mut ReadCursor::new(&[0xAF])), Ok(31));
        assert_eq!(
            read_array_begin(&mut ReadCursor::new(&[header::EMBED_ARRAY + 7])),
            Ok(7)
        );
        assert_eq!(
            read_array_begin(&mut ReadCursor::new(&[header::EMBED_ROW])),
            Err(Error::KindMismatch {
                expected: EntryType::Array,
                found: EntryType::Row
            })
        );
    }

    #[test]
    fn read_entry_dispatches() {
        let buf = [
            header::EMBED_ROW + 2,
            0x07,
            header::EMBED_CHARACTER + 1,
            b'x',
            header::NULL_ID,
        ];
        let mut input = ReadCursor::new(&buf);
        assert_eq!(read_entry(&mut input), Ok(Entry::RowBegin(2)));
        assert_eq!(read_entry(&mut input), Ok(Entry::Int(7)));
        assert_eq!(read_entry(&mut input), Ok(Entry::Character("x")));
        assert_eq!(read_entry(&mut input), Ok(Entry::Null));
        assert!(input.is_empty());
        assert!(read_entry(&mut input).is_err());
    }
}
