//! Header byte layout shared by the encoder and the decoder.
//!
//! | header          | entry                                        |
//! |-----------------|----------------------------------------------|
//! | `0x00..=0x3F`   | int 0..=63, embedded                         |
//! | `0x40..=0x4F`   | int -16..=-1, embedded                       |
//! | `0x50..=0x8F`   | character of 0..=63 bytes, length embedded   |
//! | `0x90..=0xAF`   | row of 0..=31 elements, count embedded       |
//! | `0xB0..=0xCF`   | array of 0..=31 elements, count embedded     |
//! | `0xD0..=0xDF`   | octet of 0..=15 bytes, length embedded       |
//! | `0xE0..=0xEC`   | full-form entries, one tag per kind          |
//! | `0xFE`          | end of contents                              |
//! | `0xFF`          | null                                         |
//!
//! Everything else is rejected by the decoder.

use crate::EntryType;

pub const EMBED_POSITIVE_INT: u8 = 0x00;
pub const EMBED_NEGATIVE_INT: u8 = 0x40;
pub const EMBED_CHARACTER: u8 = 0x50;
pub const EMBED_ROW: u8 = 0x90;
pub const EMBED_ARRAY: u8 = 0xB0;
pub const EMBED_OCTET: u8 = 0xD0;

pub const INT_ID: u8 = 0xE0;
pub const FLOAT4_ID: u8 = 0xE1;
pub const FLOAT8_ID: u8 = 0xE2;
pub const DECIMAL_ID: u8 = 0xE3;
pub const CHARACTER_ID: u8 = 0xE4;
pub const OCTET_ID: u8 = 0xE5;
pub const BIT_ID: u8 = 0xE6;
pub const DATE_ID: u8 = 0xE7;
pub const TIME_OF_DAY_ID: u8 = 0xE8;
pub const TIME_POINT_ID: u8 = 0xE9;
pub const DATETIME_INTERVAL_ID: u8 = 0xEA;
pub const ROW_ID: u8 = 0xEB;
pub const ARRAY_ID: u8 = 0xEC;
pub const END_OF_CONTENTS_ID: u8 = 0xFE;
pub const NULL_ID: u8 = 0xFF;

pub const MAX_EMBED_POSITIVE_INT: i64 = 63;
pub const MIN_EMBED_NEGATIVE_INT: i64 = -16;
pub const MAX_EMBED_CHARACTER_LEN: usize = 63;
pub const MAX_EMBED_OCTET_LEN: usize = 15;
pub const MAX_EMBED_COUNT: usize = 31;

/// Row and array counts must fit in 31 bits.
pub const MAX_ELEMENT_COUNT: usize = i32::MAX as usize;

/// The widest magnitude a decimal entry can carry.
pub const MAX_DECIMAL_MAGNITUDE_LEN: usize = 16;

// Marker bytes of the unsigned length prefix. Anything below `UINT_U16` is the value itself.
pub const UINT_U16: u8 = 0xFC;
pub const UINT_U32: u8 = 0xFD;
pub const UINT_U64: u8 = 0xFE;

/// Maps a header byte to the kind of entry it starts.
pub fn classify(header: u8) -> Option<EntryType> {
    let kind = match header {
        0x00..=0x4F => EntryType::Int,
        0x50..=0x8F => EntryType::Character,
        0x90..=0xAF => EntryType::Row,
        0xB0..=0xCF => EntryType::Array,
        0xD0..=0xDF => EntryType::Octet,
        INT_ID => EntryType::Int,
        FLOAT4_ID => EntryType::Float4,
        FLOAT8_ID => EntryType::Float8,
        DECIMAL_ID => EntryType::Decimal,
        CHARACTER_ID => EntryType::Character,
        OCTET_ID => EntryType::Octet,
        BIT_ID => EntryType::Bit,
        DATE_ID => EntryType::Date,
        TIME_OF_DAY_ID => EntryType::TimeOfDay,
        TIME_POINT_ID => EntryType::TimePoint,
        DATETIME_INTERVAL_ID => EntryType::DatetimeInterval,
        ROW_ID => EntryType::Row,
        ARRAY_ID => EntryType::Array,
        END_OF_CONTENTS_ID => EntryType::EndOfContents,
        NULL_ID => EntryType::Null,
        _ => return None,
    };
    Some(kind)
}

/// The narrowest of 0, 1, 2, 4 or 8 bytes holding `value` in two's complement.
pub const fn signed_width(value: i64) -> usize {
    if value == 0 {
        0
    } else if value >= i8::MIN as i64 && value <= i8::MAX as i64 {
        1
    } else if value >= i16::MIN as i64 && value <= i16::MAX as i64 {
        2
    } else if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
        4
    } else {
        8
    }
}

/// Encoded size of a width byte followed by a minimal signed payload.
pub const fn sized_signed_size(value: i64) -> usize {
    1 + signed_width(value)
}

/// Encoded size of an unsigned length prefix.
pub const fn uint_size(value: u64) -> usize {
    if value < UINT_U16 as u64 {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

pub const fn is_embeddable_int(value: i64) -> bool {
    value >= MIN_EMBED_NEGATIVE_INT && value <= MAX_EMBED_POSITIVE_INT
}

/// Encoded size of an `int` entry.
pub const fn int_size(value: i64) -> usize {
    if is_embeddable_int(value) {
        1
    } else {
        // never zero here, zero is embedded
        2 + signed_width(value)
    }
}

/// Number of big-endian bytes needed for a decimal magnitude.
pub const fn magnitude_len(magnitude: u128) -> usize {
    ((128 - magnitude.leading_zeros()) as usize).div_ceil(8)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_wire_kind_has_a_header() {
        for kind in EntryType::ALL {
            assert!(
                (0..=u8::MAX).any(|header| classify(header) == Some(kind)),
                "no header byte for {kind}"
            );
        }
    }

    #[test]
    fn unassigned_headers_are_rejected() {
        for header in 0xED..=0xFD {
            assert_eq!(classify(header), None);
        }
    }

    #[test]
    fn signed_widths() {
        assert_eq!(signed_width(0), 0);
        assert_eq!(signed_width(-128), 1);
        assert_eq!(signed_width(128), 2);
        assert_eq!(signed_width(-32769), 4);
        assert_eq!(signed_width(i64::from(i32::MAX) + 1), 8);
        assert_eq!(signed_width(i64::MIN), 8);
    }

    #[test]
    fn int_sizes() {
        assert_eq!(int_size(0), 1);
        assert_eq!(int_size(63), 1);
        assert_eq!(int_size(64), 3);
        assert_eq!(int_size(-16), 1);
        assert_eq!(int_size(-17), 3);
        assert_eq!(int_size(1000), 4);
        assert_eq!(int_size(i64::MAX), 10);
    }

    #[test]
    fn uint_sizes() {
        assert_eq!(uint_size(0), 1);
        assert_eq!(uint_size(0xFB), 1);
        assert_eq!(uint_size(0xFC), 3);
        assert_eq!(uint_size(0x1_0000), 5);
        assert_eq!(uint_size(u64::MAX), 9);
    }

    #[test]
    fn magnitude_lengths() {
        assert_eq!(magnitude_len(0), 0);
        assert_eq!(magnitude_len(255), 1);
        assert_eq!(magnitude_len(256), 2);
        assert_eq!(magnitude_len(u128::MAX), 16);
    }
}
