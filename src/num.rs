use alloy::primitives::{U256, U512};
use fastnum::{
    UD256, bint,
    decimal::{Context, RoundingMode},
};

/// Fee and ratio denominator.
pub const BASIS_POINTS_DIVISOR: u32 = 10_000;

/// Decimals of oracle prices and USD values.
pub const USD_DECIMALS: u8 = 30;

/// Decimals of the pool USD accounting unit used for weights and capacities.
pub const USDG_DECIMALS: u8 = 18;

/// Decimals of the pool-share token.
pub const POOL_SHARE_DECIMALS: u8 = 18;

/// `10^30`, one USD at oracle precision.
pub const PRICE_PRECISION: U256 = U256::from_limbs([0x4674edea40000000, 0xc9f2c9cd0, 0, 0]);

pub(crate) fn bps(value: u32) -> U256 {
    U256::from(value)
}

/// `10^decimals`, saturating at `U256::MAX`.
pub fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).saturating_pow(U256::from(decimals))
}

/// `n * 10^decimals`.
pub fn expand_decimals(n: U256, decimals: u8) -> U256 {
    n.saturating_mul(pow10(decimals))
}

/// Rescales `amount` from `div_decimals` to `mul_decimals`.
pub fn adjust_for_decimals(amount: U256, div_decimals: u8, mul_decimals: u8) -> U256 {
    mul_div(amount, pow10(mul_decimals), pow10(div_decimals))
}

/// `a * b / c` truncated toward zero.
///
/// The product is taken in 512 bits, so the result is exact whenever the
/// quotient fits in 256 bits and saturates at `U256::MAX` otherwise. Returns
/// zero when `c` is zero.
pub fn mul_div(a: U256, b: U256, c: U256) -> U256 {
    if c.is_zero() {
        return U256::ZERO;
    }
    let product: U512 = a.widening_mul(b);
    let quotient = product / U512::from_limbs_slice(c.as_limbs());
    U256::saturating_from_limbs_slice(quotient.as_limbs())
}

/// Deducts a fee: `amount * (10000 - fee_bps) / 10000`.
pub fn apply_fee(amount: U256, fee_bps: u32) -> U256 {
    let keep = BASIS_POINTS_DIVISOR.saturating_sub(fee_bps);
    mul_div(amount, bps(keep), bps(BASIS_POINTS_DIVISOR))
}

/// Inverse of [`apply_fee`]: the gross amount that nets `amount` after the fee.
///
/// `None` when the fee consumes the whole amount.
pub fn gross_up_fee(amount: U256, fee_bps: u32) -> Option<U256> {
    let keep = BASIS_POINTS_DIVISOR.checked_sub(fee_bps).filter(|keep| *keep > 0)?;
    Some(mul_div(amount, bps(BASIS_POINTS_DIVISOR), bps(keep)))
}

/// Narrows a basis point quantity, saturating at `u32::MAX`.
pub(crate) fn to_bps(value: U256) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals as u8
    }

    pub fn from_unsigned(&self, value: U256) -> UD256 {
        let unscaled = bint::UInt::<4>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<4>");
        UD256::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    pub fn to_unsigned(&self, value: UD256) -> U256 {
        let rescaled = value.rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }

    /// Same as [`Self::to_unsigned`], `None` when `value` is too large to be
    /// represented at this converter's decimals.
    pub fn try_to_unsigned(&self, value: UD256) -> Option<U256> {
        (value <= self.from_unsigned(U256::MAX)).then(|| self.to_unsigned(value))
    }

    /// Formats a fixed-point value with at most `precision` fractional digits,
    /// truncating the rest and dropping trailing zeros.
    pub fn display(&self, value: U256, precision: u8) -> String {
        let precision = precision.min(self.decimals()) as i16;
        let value = self.from_unsigned(value).trunc_with_scale(precision).reduce();
        // Integers keep their trailing zeros
        if value.fractional_digits_count() < 0 {
            value.rescale(0).to_string()
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use fastnum::udec256;

    use super::*;

    #[test]
    fn test_price_precision() {
        assert_eq!(PRICE_PRECISION, pow10(USD_DECIMALS));
    }

    #[test]
    fn test_mul_div_truncates() {
        assert_eq!(
            mul_div(U256::from(10), U256::from(10), U256::from(3)),
            U256::from(33)
        );
        assert_eq!(
            mul_div(U256::from(10), U256::from(10), U256::ZERO),
            U256::ZERO
        );
    }

    #[test]
    fn test_mul_div_saturates() {
        assert_eq!(
            mul_div(U256::MAX, U256::from(2), U256::from(1)),
            U256::MAX
        );
    }

    #[test]
    fn test_mul_div_wide_product() {
        let half = U256::from(1) << 255;
        assert_eq!(mul_div(half, U256::from(2), U256::from(2)), half);
        assert_eq!(mul_div(U256::MAX, U256::MAX, U256::MAX), U256::MAX);
        assert_eq!(
            mul_div(U256::MAX, PRICE_PRECISION, PRICE_PRECISION * U256::from(2)),
            U256::MAX / U256::from(2)
        );
    }

    #[test]
    fn test_adjust_for_decimals() {
        assert_eq!(
            adjust_for_decimals(U256::from(1_500_000), 6, 18),
            expand_decimals(U256::from(15), 17)
        );
        assert_eq!(
            adjust_for_decimals(expand_decimals(U256::from(15), 17), 18, 6),
            U256::from(1_500_000)
        );
    }

    #[test]
    fn test_apply_fee() {
        assert_eq!(apply_fee(U256::from(10_000), 30), U256::from(9_970));
        assert_eq!(apply_fee(U256::from(10_000), 0), U256::from(10_000));
        assert_eq!(apply_fee(U256::from(10_000), 12_000), U256::ZERO);
    }

    #[test]
    fn test_gross_up_fee() {
        assert_eq!(gross_up_fee(U256::from(9_970), 30), Some(U256::from(10_000)));
        assert_eq!(gross_up_fee(U256::from(9_970), 10_000), None);
    }

    #[test]
    fn test_numeric_converter_from_unsigned() {
        assert_eq!(
            Converter::new(0).from_unsigned(U256::from(1234567890)),
            udec256!(1234567890)
        );
        assert_eq!(
            Converter::new(6).from_unsigned(U256::from(1234567890)),
            udec256!(1234.56789)
        );
        assert_eq!(
            Converter::new(18).from_unsigned(expand_decimals(U256::from(25), 16)),
            udec256!(0.25)
        );
    }

    #[test]
    fn test_numeric_converter_to_unsigned() {
        assert_eq!(
            Converter::new(6).to_unsigned(udec256!(1234.56789)),
            U256::from(1234567890)
        );
        assert_eq!(
            Converter::new(30).to_unsigned(udec256!(1)),
            PRICE_PRECISION
        );
    }

    #[test]
    fn test_numeric_converter_try_to_unsigned() {
        let converter = Converter::new(18);
        assert_eq!(
            converter.try_to_unsigned(udec256!(1.5)),
            Some(expand_decimals(U256::from(15), 17))
        );
        assert_eq!(converter.try_to_unsigned(udec256!(1e70)), None);
        assert_eq!(
            converter.try_to_unsigned(converter.from_unsigned(U256::MAX)),
            Some(U256::MAX)
        );
    }

    #[test]
    fn test_numeric_converter_display() {
        let converter = Converter::new(18);
        assert_eq!(
            converter.display(U256::from(1_234_567_890_123_456_789u64), 4),
            "1.2345"
        );
        assert_eq!(converter.display(expand_decimals(U256::from(15), 17), 6), "1.5");
        assert_eq!(Converter::new(6).display(U256::from(7_000_000), 2), "7");
        assert_eq!(Converter::new(6).display(U256::from(1_000_001), 2), "1");
        assert_eq!(Converter::new(6).display(U256::from(5_000), 2), "0");
        assert_eq!(Converter::new(6).display(U256::from(50_000), 2), "0.05");
        assert_eq!(Converter::new(6).display(U256::from(1_000_000_000), 2), "1000");
    }
}
