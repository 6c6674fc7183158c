pub mod bits;
pub mod decimal;
pub mod temporal;

pub use bits::BitView;
pub use decimal::{Decimal, DecimalParseError};
pub use temporal::{Date, DatetimeInterval, TemporalError, TimeOfDay, TimePoint};
