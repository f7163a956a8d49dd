//! Numeric conversion helpers used across the project.
//!
//! Travel times are computed in floating point but clocked with
//! [`Duration`]. These helpers guard the conversion so a non-finite or
//! negative value can never panic inside the frame loop.

use std::time::Duration;

/// Largest nanosecond count representable as a `u64`, as a float bound.
const MAX_NANOS: f64 = 1.8e19;

/// Convert a millisecond count into a [`Duration`], rounded to the nearest
/// nanosecond.
///
/// Negative and NaN values collapse to [`Duration::ZERO`]; values beyond
/// roughly 570 years saturate.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ambler::numeric::duration_from_millis;
///
/// assert_eq!(duration_from_millis(500.0), Duration::from_millis(500));
/// assert_eq!(duration_from_millis(-3.0), Duration::ZERO);
/// assert_eq!(duration_from_millis(f32::NAN), Duration::ZERO);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The nanosecond count is rounded and bounded to the u64 domain first."
)]
#[must_use]
pub fn duration_from_millis(millis: f32) -> Duration {
    if millis.is_nan() || millis <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (f64::from(millis) * 1_000_000.0).round().min(MAX_NANOS);
    Duration::from_nanos(nanos as u64)
}

/// Fraction of `total` covered by `elapsed`, clamped to `[0, 1]`.
///
/// A zero `total` counts as already complete.
#[must_use]
pub fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / total.as_secs_f64();
    expect_f32(ratio.clamp(0.0, 1.0))
}

/// Convert a finite `f64` into `f32`, asserting that it fits the target type.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Callers assert that the value fits within f32 bounds."
)]
#[must_use]
pub fn expect_f32(value: f64) -> f32 {
    debug_assert!(value.is_finite(), "expected finite f64 for f32 conversion");
    debug_assert!(
        value <= f64::from(f32::MAX),
        "f64 value {value} exceeds f32::MAX"
    );
    debug_assert!(
        value >= f64::from(f32::MIN),
        "f64 value {value} is below f32::MIN"
    );
    value as f32
}
