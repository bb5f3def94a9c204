//! Scalar floating-point comparison
//!
//! Every equality check in this crate goes through these helpers. Exact
//! float equality is never used, since trig and division rounding drift
//! between platforms.

/// Default comparison tolerance.
///
/// Loose enough for values quoted to 6 decimal places, tight enough to tell
/// apart any two of them.
pub const EPSILON: f64 = 1e-5;

/// Returns true if `a` and `b` differ by at most [`EPSILON`]
#[inline]
pub fn float_cmp(a: f64, b: f64) -> bool {
    float_cmp_with(a, b, EPSILON)
}

/// Returns true if `a` and `b` differ by at most `epsilon`
#[inline]
pub fn float_cmp_with(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Returns true if `a` is zero within [`EPSILON`]
#[inline]
pub fn is_zero(a: f64) -> bool {
    float_cmp(a, 0.0)
}
