use relir_util::{BitView, Date, DatetimeInterval, Decimal, TimeOfDay, TimePoint};

use crate::EntryType;

/// One decoded entry, for consumers that branch on the kind instead of
/// knowing the sequence in advance. Borrowed payloads point into the input buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry<'a> {
    Null,
    Int(i64),
    Float4(f32),
    Float8(f64),
    Decimal(Decimal),
    Character(&'a str),
    Octet(&'a [u8]),
    Bit(BitView<'a>),
    Date(Date),
    TimeOfDay(TimeOfDay),
    TimePoint(TimePoint),
    DatetimeInterval(DatetimeInterval),
    RowBegin(usize),
    ArrayBegin(usize),
    EndOfContents,
}

impl Entry<'_> {
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Entry::Null => EntryType::Null,
            Entry::Int(_) => EntryType::Int,
            Entry::Float4(_) => EntryType::Float4,
            Entry::Float8(_) => EntryType::Float8,
            Entry::Decimal(_) => EntryType::Decimal,
            Entry::Character(_) => EntryType::Character,
            Entry::Octet(_) => EntryType::Octet,
            Entry::Bit(_) => EntryType::Bit,
            Entry::Date(_) => EntryType::Date,
            Entry::TimeOfDay(_) => EntryType::TimeOfDay,
            Entry::TimePoint(_) => EntryType::TimePoint,
            Entry::DatetimeInterval(_) => EntryType::DatetimeInterval,
            Entry::RowBegin(_) => EntryType::Row,
            Entry::ArrayBegin(_) => EntryType::Array,
            Entry::EndOfContents => EntryType::EndOfContents,
        }
    }
}
