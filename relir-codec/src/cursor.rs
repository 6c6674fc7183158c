use crate::{header, EntryType, Error, Result};

/// A read position over an input buffer.
///
/// The cursor is `Copy`: decoders work on a copy and store it back only once
/// the whole entry has been consumed, so a failed read never moves it.
/// Slices handed out by the decoder borrow the buffer for `'a`, not the cursor.
#[derive(Clone, Copy, Debug)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying buffer, including bytes already consumed.
    pub const fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// The bytes not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Skips `count` bytes.
    ///
    /// # Panics
    /// If fewer than `count` bytes remain.
    pub fn advance(&mut self, count: usize) {
        assert!(
            count <= self.remaining(),
            "cannot advance {count} bytes with {} remaining",
            self.remaining()
        );
        self.pos += count;
    }

    pub(crate) fn get_slice(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(Error::Truncated {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub(crate) fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_slice(N)?);
        Ok(out)
    }

    pub(crate) fn get_u8(&mut self) -> Result<u8> {
        let [byte] = self.get_array::<1>()?;
        Ok(byte)
    }

    /// Reads an unsigned length prefix.
    pub(crate) fn get_uint(&mut self, kind: EntryType) -> Result<u64> {
        let value = match self.get_u8()? {
            header::UINT_U16 => u64::from(u16::from_be_bytes(self.get_array()?)),
            header::UINT_U32 => u64::from(u32::from_be_bytes(self.get_array()?)),
            header::UINT_U64 => u64::from_be_bytes(self.get_array()?),
            byte if byte < header::UINT_U16 => u64::from(byte),
            _ => {
                return Err(Error::Malformed {
                    kind,
                    reason: "invalid length prefix",
                })
            }
        };
        Ok(value)
    }

    /// Reads a width byte followed by that many bytes of big-endian two's complement.
    pub(crate) fn get_sized_signed(&mut self, kind: EntryType) -> Result<i64> {
        let value = match self.get_u8()? {
            0 => 0,
            1 => i64::from(i8::from_be_bytes(self.get_array()?)),
            2 => i64::from(i16::from_be_bytes(self.get_array()?)),
            4 => i64::from(i32::from_be_bytes(self.get_array()?)),
            8 => i64::from_be_bytes(self.get_array()?),
            _ => {
                return Err(Error::Malformed {
                    kind,
                    reason: "invalid integer width",
                })
            }
        };
        Ok(value)
    }

    /// A length that must also fit in the remaining input.
    pub(crate) fn get_length(&mut self, kind: EntryType) -> Result<usize> {
        let length = self.get_uint(kind)?;
        match usize::try_from(length) {
            Ok(length) if length <= self.remaining() => Ok(length),
            _ => Err(Error::Truncated {
                needed: usize::try_from(length).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            }),
        }
    }
}

/// A write position over an output buffer.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    // The put_* helpers assume the caller already checked `remaining()`.

    pub(crate) fn put_slice(&mut self, data: &[u8]) {
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        self.put_slice(&[value]);
    }

    pub(crate) fn put_uint(&mut self, value: u64) {
        if value < u64::from(header::UINT_U16) {
            self.put_u8(value as u8);
        } else if let Ok(value) = u16::try_from(value) {
            self.put_u8(header::UINT_U16);
            self.put_slice(&value.to_be_bytes());
        } else if let Ok(value) = u32::try_from(value) {
            self.put_u8(header::UINT_U32);
            self.put_slice(&value.to_be_bytes());
        } else {
            self.put_u8(header::UINT_U64);
            self.put_slice(&value.to_be_bytes());
        }
    }

    /// Writes the minimal two's complement payload of `value`, without a width byte.
    pub(crate) fn put_signed_payload(&mut self, value: i64) {
        let width = header::signed_width(value);
        let bytes = value.to_be_bytes();
        self.put_slice(&bytes[8 - width..]);
    }

    pub(crate) fn put_sized_signed(&mut self, value: i64) {
        self.put_u8(header::signed_width(value) as u8);
        self.put_signed_payload(value);
    }
}
