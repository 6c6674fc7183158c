use std::fmt;

/// The kind of entry found at a cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryType {
    Null,
    Int,
    Float4,
    Float8,
    Decimal,
    Character,
    Octet,
    Bit,
    Date,
    TimeOfDay,
    TimePoint,
    DatetimeInterval,
    Row,
    Array,
    EndOfContents,
    /// Not a wire kind: the input does not hold the next entry's header yet.
    BufferUnderflow,
}

impl EntryType {
    /// Every kind that can appear on the wire.
    pub const ALL: [EntryType; 15] = [
        EntryType::Null,
        EntryType::Int,
        EntryType::Float4,
        EntryType::Float8,
        EntryType::Decimal,
        EntryType::Character,
        EntryType::Octet,
        EntryType::Bit,
        EntryType::Date,
        EntryType::TimeOfDay,
        EntryType::TimePoint,
        EntryType::DatetimeInterval,
        EntryType::Row,
        EntryType::Array,
        EntryType::EndOfContents,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EntryType::Null => "null",
            EntryType::Int => "int",
            EntryType::Float4 => "float4",
            EntryType::Float8 => "float8",
            EntryType::Decimal => "decimal",
            EntryType::Character => "character",
            EntryType::Octet => "octet",
            EntryType::Bit => "bit",
            EntryType::Date => "date",
            EntryType::TimeOfDay => "time_of_day",
            EntryType::TimePoint => "time_point",
            EntryType::DatetimeInterval => "datetime_interval",
            EntryType::Row => "row",
            EntryType::Array => "array",
            EntryType::EndOfContents => "end_of_contents",
            EntryType::BufferUnderflow => "buffer_underflow",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::EntryType;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = EntryType::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(names.len(), EntryType::ALL.len());
        assert!(!names.contains(EntryType::BufferUnderflow.name()));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(EntryType::TimeOfDay.to_string(), "time_of_day");
        assert_eq!(EntryType::BufferUnderflow.to_string(), "buffer_underflow");
    }
}
