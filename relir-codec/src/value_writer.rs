//! A buffered writer that encodes entries into a growable scratch buffer and
//! hands each finished entry to a [`Sink`].

use std::{convert::Infallible, io};

use bytes::{BufMut, BytesMut};

use crate::{value_output, Entry, Error, WriteCursor, WriterConfig};
use relir_util::{BitView, Date, DatetimeInterval, Decimal, TimeOfDay, TimePoint};

/// Upper bound on the encoded size of any entry without a variable-length payload.
pub const FIXED_RESERVE: usize = 64;
/// Bound on the header and length prefix in front of a variable-length payload.
pub const VARIABLE_SLACK: usize = 16;
/// Ceiling for both configurable reserves.
pub const MAX_RESERVE: usize = 1 << 20;
/// Ceiling for the scratch buffer allocated up front.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 26;

/// Destination for encoded bytes.
pub trait Sink {
    type Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl Sink for Vec<u8> {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl Sink for BytesMut {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.put_slice(bytes);
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    type Error = S::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }
}

/// Adapts any [`io::Write`] into a [`Sink`].
#[derive(Debug)]
pub struct IoSink<W>(W);

impl<W: io::Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    type Error = io::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(bytes)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WriterError<E> {
    #[error(transparent)]
    Codec(#[from] Error),
    #[error("sink rejected encoded entry: {0}")]
    Sink(E),
}

pub struct ValueWriter<S> {
    sink: S,
    scratch: Vec<u8>,
    fixed_reserve: usize,
    variable_slack: usize,
}

impl<S: Sink> ValueWriter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, &WriterConfig::default())
    }

    /// Builds a writer from `config`, clamping out-of-range values instead of rejecting them.
    pub fn with_config(sink: S, config: &WriterConfig) -> Self {
        let fixed_reserve = config.fixed_reserve.clamp(FIXED_RESERVE, MAX_RESERVE);
        let variable_slack = config.variable_slack.clamp(VARIABLE_SLACK, MAX_RESERVE);
        let initial_capacity = config.initial_capacity.min(MAX_INITIAL_CAPACITY);
        if fixed_reserve != config.fixed_reserve
            || variable_slack != config.variable_slack
            || initial_capacity != config.initial_capacity
        {
            log::warn!(
                "writer config clamped to {fixed_reserve}/{variable_slack}/{initial_capacity}"
            );
        }
        Self {
            sink,
            scratch: vec![0; initial_capacity.max(fixed_reserve)],
            fixed_reserve,
            variable_slack,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Current size of the scratch buffer. It only ever grows.
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.len()
    }

    fn reserve(&mut self, size: usize) {
        if self.scratch.len() < size {
            let grown = size.checked_next_power_of_two().unwrap_or(size);
            log::trace!("growing writer scratch from {} to {grown} bytes", self.scratch.len());
            self.scratch.resize(grown, 0);
        }
    }

    fn emit(
        &mut self,
        reserve: usize,
        encode: impl FnOnce(&mut WriteCursor<'_>) -> crate::Result<bool>,
    ) -> Result<(), WriterError<S::Error>> {
        self.reserve(reserve);
        let mut output = WriteCursor::new(&mut self.scratch);
        let fitted = encode(&mut output)?;
        // The reserve covers the largest encoding of every kind.
        assert!(fitted, "entry did not fit in a {reserve} byte reserve");
        let len = output.position();
        self.sink
            .write(&self.scratch[..len])
            .map_err(WriterError::Sink)
    }

    fn variable_reserve(&self, payload: usize) -> usize {
        payload.saturating_add(self.variable_slack)
    }

    fn emit_fixed(
        &mut self,
        encode: impl FnOnce(&mut WriteCursor<'_>) -> bool,
    ) -> Result<(), WriterError<S::Error>> {
        self.emit(self.fixed_reserve, |w| Ok(encode(w)))
    }

    pub fn write_null(&mut self) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(value_output::write_null)
    }

    pub fn write_end_of_contents(&mut self) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(value_output::write_end_of_contents)
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_int(w, value))
    }

    pub fn write_float4(&mut self, value: f32) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_float4(w, value))
    }

    pub fn write_float8(&mut self, value: f64) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_float8(w, value))
    }

    pub fn write_decimal(&mut self, value: Decimal) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_decimal(w, value))
    }

    pub fn write_character(&mut self, value: &str) -> Result<(), WriterError<S::Error>> {
        let reserve = self.variable_reserve(value.len());
        self.emit(reserve, |w| Ok(value_output::write_character(w, value)))
    }

    pub fn write_octet(&mut self, value: &[u8]) -> Result<(), WriterError<S::Error>> {
        let reserve = self.variable_reserve(value.len());
        self.emit(reserve, |w| Ok(value_output::write_octet(w, value)))
    }

    pub fn write_bit(&mut self, value: BitView<'_>) -> Result<(), WriterError<S::Error>> {
        let reserve = self.variable_reserve(value.as_bytes().len());
        self.emit(reserve, |w| Ok(value_output::write_bit(w, value)))
    }

    pub fn write_date(&mut self, value: Date) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_date(w, value))
    }

    pub fn write_time_of_day(&mut self, value: TimeOfDay) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_time_of_day(w, value))
    }

    pub fn write_time_point(&mut self, value: TimePoint) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_time_point(w, value))
    }

    pub fn write_datetime_interval(
        &mut self,
        value: DatetimeInterval,
    ) -> Result<(), WriterError<S::Error>> {
        self.emit_fixed(|w| value_output::write_datetime_interval(w, value))
    }

    pub fn write_row_begin(&mut self, count: usize) -> Result<(), WriterError<S::Error>> {
        self.emit(self.fixed_reserve, |w| value_output::write_row_begin(w, count))
    }

    pub fn write_array_begin(&mut self, count: usize) -> Result<(), WriterError<S::Error>> {
        self.emit(self.fixed_reserve, |w| value_output::write_array_begin(w, count))
    }

    pub fn write_entry(&mut self, entry: &Entry<'_>) -> Result<(), WriterError<S::Error>> {
        let payload = match entry {
            Entry::Character(value) => value.len(),
            Entry::Octet(value) => value.len(),
            Entry::Bit(value) => value.as_bytes().len(),
            _ => 0,
        };
        let reserve = self.fixed_reserve.max(self.variable_reserve(payload));
        self.emit(reserve, |w| value_output::write_entry(w, entry))
    }
}
