//! Encoding of single entries.
//!
//! Each `write_*` function computes the encoded size up front. If the cursor
//! has room it writes the entry, advances past it and returns `true`;
//! otherwise it writes nothing and returns `false` so the caller can flush or
//! grow the buffer and retry.

use relir_util::{BitView, Date, DatetimeInterval, Decimal, TimeOfDay, TimePoint};

use crate::{header, Entry, Error, Result, WriteCursor};

fn emit(
    output: &mut WriteCursor<'_>,
    size: usize,
    body: impl FnOnce(&mut WriteCursor<'_>),
) -> bool {
    if output.remaining() < size {
        return false;
    }
    let start = output.position();
    body(output);
    debug_assert_eq!(output.position() - start, size, "encoded size mismatch");
    true
}

pub fn write_end_of_contents(output: &mut WriteCursor<'_>) -> bool {
    emit(output, 1, |w| w.put_u8(header::END_OF_CONTENTS_ID))
}

pub fn write_null(output: &mut WriteCursor<'_>) -> bool {
    emit(output, 1, |w| w.put_u8(header::NULL_ID))
}

fn put_int(output: &mut WriteCursor<'_>, value: i64) {
    if (0..=header::MAX_EMBED_POSITIVE_INT).contains(&value) {
        output.put_u8(header::EMBED_POSITIVE_INT + value as u8);
    } else if (header::MIN_EMBED_NEGATIVE_INT..0).contains(&value) {
        output.put_u8(header::EMBED_NEGATIVE_INT + (value - header::MIN_EMBED_NEGATIVE_INT) as u8);
    } else {
        output.put_u8(header::INT_ID);
        output.put_sized_signed(value);
    }
}

pub fn write_int(output: &mut WriteCursor<'_>, value: i64) -> bool {
    emit(output, header::int_size(value), |w| put_int(w, value))
}

pub fn write_float4(output: &mut WriteCursor<'_>, value: f32) -> bool {
    emit(output, 5, |w| {
        w.put_u8(header::FLOAT4_ID);
        w.put_slice(&value.to_be_bytes());
    })
}

pub fn write_float8(output: &mut WriteCursor<'_>, value: f64) -> bool {
    emit(output, 9, |w| {
        w.put_u8(header::FLOAT8_ID);
        w.put_slice(&value.to_be_bytes());
    })
}

/// Writes a decimal, as a plain `int` entry whenever the value allows it.
pub fn write_decimal(output: &mut WriteCursor<'_>, value: Decimal) -> bool {
    if let Some(int) = value.to_i64() {
        return write_int(output, int);
    }

    let scale = i64::from(value.scale());
    let magnitude_len = header::magnitude_len(value.magnitude());
    let size = 2 + header::sized_signed_size(scale) + 1 + magnitude_len;
    emit(output, size, |w| {
        w.put_u8(header::DECIMAL_ID);
        w.put_u8(u8::from(value.is_negative()));
        w.put_sized_signed(scale);
        w.put_u8(magnitude_len as u8);
        w.put_slice(&value.magnitude().to_be_bytes()[16 - magnitude_len..]);
    })
}

/// Size of an embeddable-or-prefixed byte payload.
fn sequence_size(len: usize, max_embed: usize) -> usize {
    if len <= max_embed {
        1 + len
    } else {
        1 + header::uint_size(len as u64) + len
    }
}

/// How a byte payload is framed: embedded up to `max_embed` bytes, length-prefixed beyond.
struct SequenceForm {
    max_embed: usize,
    embed: u8,
    tag: u8,
}

const CHARACTER_FORM: SequenceForm = SequenceForm {
    max_embed: header::MAX_EMBED_CHARACTER_LEN,
    embed: header::EMBED_CHARACTER,
    tag: header::CHARACTER_ID,
};

const OCTET_FORM: SequenceForm = SequenceForm {
    max_embed: header::MAX_EMBED_OCTET_LEN,
    embed: header::EMBED_OCTET,
    tag: header::OCTET_ID,
};

fn write_sequence(output: &mut WriteCursor<'_>, data: &[u8], form: &SequenceForm) -> bool {
    let size = sequence_size(data.len(), form.max_embed);
    emit(output, size, |w| {
        if data.len() <= form.max_embed {
            w.put_u8(form.embed + data.len() as u8);
        } else {
            w.put_u8(form.tag);
            w.put_uint(data.len() as u64);
        }
        w.put_slice(data);
    })
}

pub fn write_character(output: &mut WriteCursor<'_>, value: &str) -> bool {
    write_sequence(output, value.as_bytes(), &CHARACTER_FORM)
}

pub fn write_octet(output: &mut WriteCursor<'_>, value: &[u8]) -> bool {
    write_sequence(output, value, &OCTET_FORM)
}

/// Writes a bit string. Padding bits past the end of the view are written as zero.
pub fn write_bit(output: &mut WriteCursor<'_>, value: BitView<'_>) -> bool {
    let bits = value.len();
    let bytes = value.as_bytes();
    let size = 1 + header::uint_size(bits as u64) + bytes.len();
    emit(output, size, |w| {
        w.put_u8(header::BIT_ID);
        w.put_uint(bits as u64);
        match bytes.split_last() {
            Some((last, init)) if bits % 8 != 0 => {
                w.put_slice(init);
                w.put_u8(last & ((1u8 << (bits % 8)) - 1));
            }
            _ => w.put_slice(bytes),
        }
    })
}

pub fn write_date(output: &mut WriteCursor<'_>, value: Date) -> bool {
    let days = value.days_since_epoch();
    emit(output, 1 + header::sized_signed_size(days), |w| {
        w.put_u8(header::DATE_ID);
        w.put_sized_signed(days);
    })
}

pub fn write_time_of_day(output: &mut WriteCursor<'_>, value: TimeOfDay) -> bool {
    let nanos = value.nanos_since_midnight();
    emit(output, 1 + header::uint_size(nanos), |w| {
        w.put_u8(header::TIME_OF_DAY_ID);
        w.put_uint(nanos);
    })
}

pub fn write_time_point(output: &mut WriteCursor<'_>, value: TimePoint) -> bool {
    let days = value.date.days_since_epoch();
    let nanos = value.time_of_day.nanos_since_midnight();
    let size = 1 + header::sized_signed_size(days) + header::uint_size(nanos);
    emit(output, size, |w| {
        w.put_u8(header::TIME_POINT_ID);
        w.put_sized_signed(days);
        w.put_uint(nanos);
    })
}

pub fn write_datetime_interval(output: &mut WriteCursor<'_>, value: DatetimeInterval) -> bool {
    let fields = [
        value.year,
        value.month,
        value.day,
        value.hour,
        value.minute,
        value.second,
        value.subsecond_nanos,
    ]
    .map(i64::from);
    let size = 1 + fields.iter().map(|field| header::sized_signed_size(*field)).sum::<usize>();
    emit(output, size, |w| {
        w.put_u8(header::DATETIME_INTERVAL_ID);
        for field in fields {
            w.put_sized_signed(field);
        }
    })
}

fn check_count(what: &'static str, count: usize) -> Result<()> {
    if count > header::MAX_ELEMENT_COUNT {
        return Err(Error::OutOfRange {
            what,
            value: count as u64,
        });
    }
    Ok(())
}

fn put_count(output: &mut WriteCursor<'_>, count: usize, embed: u8, tag: u8) {
    if count <= header::MAX_EMBED_COUNT {
        output.put_u8(embed + count as u8);
    } else {
        output.put_u8(tag);
        output.put_uint(count as u64);
    }
}

fn count_size(count: usize) -> usize {
    if count <= header::MAX_EMBED_COUNT {
        1
    } else {
        1 + header::uint_size(count as u64)
    }
}

/// Writes the start of a row of `count` elements.
///
/// Fails with [`Error::OutOfRange`] if `count` does not fit in 31 bits.
pub fn write_row_begin(output: &mut WriteCursor<'_>, count: usize) -> Result<bool> {
    check_count("row element count", count)?;
    Ok(emit(output, count_size(count), |w| {
        put_count(w, count, header::EMBED_ROW, header::ROW_ID)
    }))
}

/// Writes the start of an array of `count` elements.
///
/// Fails with [`Error::OutOfRange`] if `count` does not fit in 31 bits.
pub fn write_array_begin(output: &mut WriteCursor<'_>, count: usize) -> Result<bool> {
    check_count("array element count", count)?;
    Ok(emit(output, count_size(count), |w| {
        put_count(w, count, header::EMBED_ARRAY, header::ARRAY_ID)
    }))
}

pub fn write_entry(output: &mut WriteCursor<'_>, entry: &Entry<'_>) -> Result<bool> {
    let written = match *entry {
        Entry::Null => write_null(output),
        Entry::Int(value) => write_int(output, value),
        Entry::Float4(value) => write_float4(output, value),
        Entry::Float8(value) => write_float8(output, value),
        Entry::Decimal(value) => write_decimal(output, value),
        Entry::Character(value) => write_character(output, value),
        Entry::Octet(value) => write_octet(output, value),
        Entry::Bit(value) => write_bit(output, value),
        Entry::Date(value) => write_date(output, value),
        Entry::TimeOfDay(value) => write_time_of_day(output, value),
        Entry::TimePoint(value) => write_time_point(output, value),
        Entry::DatetimeInterval(value) => write_datetime_interval(output, value),
        Entry::RowBegin(count) => return write_row_begin(output, count),
        Entry::ArrayBegin(count) => return write_array_begin(output, count),
        Entry::EndOfContents => write_end_of_contents(output),
    };
    Ok(written)
}
