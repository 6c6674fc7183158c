use std::fmt;

/// A borrowed, packed sequence of bits.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8`, counting from the least
/// significant bit. The view always covers exactly `len.div_ceil(8)` bytes; any
/// bits past `len` in the last byte are ignored.
#[derive(Clone, Copy)]
pub struct BitView<'a> {
    bytes: &'a [u8],
    len: usize,
}

impl<'a> BitView<'a> {
    /// Returns `None` unless `bytes` holds exactly the bytes needed for `len` bits.
    pub fn new(bytes: &'a [u8], len: usize) -> Option<Self> {
        (bytes.len() == len.div_ceil(8)).then_some(Self { bytes, len })
    }

    /// Views every bit of `bytes`.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            len: bytes.len() * 8,
        }
    }

    pub const fn empty() -> Self {
        Self { bytes: &[], len: 0 }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed bytes backing this view, including padding bits in the last byte.
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (1 << (index % 8)) != 0)
    }

    pub fn iter(&self) -> BitIter<'a> {
        BitIter {
            view: *self,
            index: 0,
        }
    }

    pub fn count_ones(&self) -> usize {
        self.iter().filter(|bit| *bit).count()
    }
}

impl PartialEq for BitView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for BitView<'_> {}

impl fmt::Debug for BitView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitView({}: ", self.len)?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        f.write_str(")")
    }
}

impl<'a> IntoIterator for BitView<'a> {
    type Item = bool;
    type IntoIter = BitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct BitIter<'a> {
    view: BitView<'a>,
    index: usize,
}

impl Iterator for BitIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let bit = self.view.get(self.index)?;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIter<'_> {}
