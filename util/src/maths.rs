//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the range `[min, max]`.
///
/// `NaN` values are returned unchanged.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Quantise a fraction in `[0, 1]` into the full range of a `u16`.
///
/// The fraction is clamped first, so out of range values saturate at 0 or
/// `u16::MAX`. `NaN` quantises to 0.
pub fn quantise_u16<T>(fraction: T) -> u16
where
    T: Float
{
    let zero = T::zero();
    let one = T::one();
    let max = T::from(u16::MAX).unwrap_or(one);

    lin_map((zero, one), (zero, max), clamp(&fraction, &zero, &one))
        .round()
        .to_u16()
        .unwrap_or(0)
}

/// Convert a `u16` produced by `quantise_u16` back into a fraction in
/// `[0, 1]`.
pub fn dequantise_u16<T>(value: u16) -> T
where
    T: Float
{
    let zero = T::zero();
    let one = T::one();
    let max = T::from(u16::MAX).unwrap_or(one);

    lin_map((zero, max), (zero, one), T::from(value).unwrap_or(zero))
}
