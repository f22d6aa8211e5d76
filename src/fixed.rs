// Fixed-point arithmetic - Q15.16 scaled-integer math
//
// The deployment target has no floating-point unit, so every quantity in the
// numeric pipeline is a 32-bit signed integer scaled by 2^16. Conversions to
// and from f32 exist only for configuration files, tests, and display; the
// hot path (spectral correlation, inference, thresholding) is integer-only.
//
// Multiplication widens to 64 bits, shifts right by FIXED_SHIFT, and narrows
// with a truncating cast. Overflow in the widened product is not detected.
// The detection thresholds and the quantized model scale factor were
// calibrated against exactly this arithmetic, so the truncating behavior is
// part of the numeric contract and must stay bit-for-bit stable.

use serde::{Deserialize, Serialize};

/// Number of fractional bits in the Q15.16 representation
pub const FIXED_SHIFT: u32 = 16;

/// Raw representation of 1.0
pub const FIXED_ONE: i32 = 1 << FIXED_SHIFT;

/// Q15.16 fixed-point value
///
/// Representable range is roughly ±32768.0 at 1/65536 precision. Plain value
/// type: `Copy`, ordered by the underlying raw integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FIXED_ONE);

    /// Wrap a raw Q15.16 integer
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Raw Q15.16 integer
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert from f32, truncating toward zero after scaling.
    ///
    /// Configuration and test boundaries only; never called in the per-cycle
    /// numeric path.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Fixed((value * FIXED_ONE as f32) as i32)
    }

    /// Convert to f32 (display and debugging only)
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / FIXED_ONE as f32
    }

    /// Truncating fixed-point multiply.
    ///
    /// Widens to i64, shifts right FIXED_SHIFT, narrows with `as i32`. The
    /// narrowing cast truncates silently on overflow; calibration constants
    /// assume this, so it is deliberately not checked or saturating.
    #[inline]
    pub const fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((self.0 as i64 * rhs.0 as i64) >> FIXED_SHIFT) as i32)
    }

    /// Clamp into the unit interval [0, 1.0]
    #[inline]
    pub fn clamp_unit(self) -> Fixed {
        Fixed(self.0.clamp(0, FIXED_ONE))
    }
}

// Add/Sub wrap explicitly so the arithmetic path never traps, matching the
// unchecked multiply policy even under debug overflow checks.

impl core::ops::Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl core::ops::Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl core::ops::Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl core::ops::Mul for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl core::fmt::Display for Fixed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.4}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_roundtrip() {
        let one = Fixed::from_f32(1.0);
        assert_eq!(one.raw(), FIXED_ONE);
        assert!((one.to_f32() - 1.0).abs() < 1.0 / 65536.0);

        let half = Fixed::from_f32(0.5);
        assert_eq!(half.raw(), FIXED_ONE / 2);

        for &x in &[0.0f32, 0.1, -0.65, 3.25, -100.5, 0.999] {
            let back = Fixed::from_f32(x).to_f32();
            assert!(
                (back - x).abs() < 1.0 / 65536.0,
                "roundtrip of {} gave {}",
                x,
                back
            );
        }
    }

    #[test]
    fn test_multiply() {
        let a = Fixed::from_f32(2.0);
        let b = Fixed::from_f32(3.0);
        let product = (a * b).to_f32();
        assert!(
            (product - 6.0).abs() < 0.01,
            "2.0 * 3.0 gave {}",
            product
        );

        let neg = Fixed::from_f32(-1.5) * Fixed::from_f32(0.5);
        assert!((neg.to_f32() + 0.75).abs() < 0.01);
    }

    #[test]
    fn test_multiply_truncates_small_products() {
        // Products smaller than 1/65536 truncate to zero
        let tiny = Fixed::from_raw(1);
        assert_eq!((tiny * tiny).raw(), 0);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(Fixed::from_f32(1.5).clamp_unit(), Fixed::ONE);
        assert_eq!(Fixed::from_f32(-0.2).clamp_unit(), Fixed::ZERO);
        let half = Fixed::from_f32(0.5);
        assert_eq!(half.clamp_unit(), half);
    }
}
