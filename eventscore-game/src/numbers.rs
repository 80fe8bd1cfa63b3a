//! Numeric conversion helpers centralizing safe integer casts.

use num_traits::cast::cast;

/// Convert a u64 to i64, saturating at `i64::MAX`.
#[must_use]
pub fn saturating_u64_to_i64(value: u64) -> i64 {
    cast::<u64, i64>(value).unwrap_or(i64::MAX)
}

/// Convert a u64 to u32, saturating at `u32::MAX`.
#[must_use]
pub fn saturating_u64_to_u32(value: u64) -> u32 {
    cast::<u64, u32>(value).unwrap_or(u32::MAX)
}

/// Clamp an i64 into the u32 range, mapping negatives to 0.
#[must_use]
pub fn clamp_i64_to_u32(value: i64) -> u32 {
    if value <= 0 {
        return 0;
    }
    cast::<i64, u32>(value).unwrap_or(u32::MAX)
}

/// Integer division rounding up, treating a zero divisor as 1.
#[must_use]
pub const fn div_ceil_i64(value: i64, divisor: i64) -> i64 {
    let divisor = if divisor == 0 { 1 } else { divisor };
    let quotient = value / divisor;
    if value % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}
