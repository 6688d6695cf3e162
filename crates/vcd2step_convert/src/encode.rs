//! Lossless re-encoding of marker-prefixed bit-strings.
//!
//! Signals may be arbitrarily wide, so values are parsed into a
//! [`BigUint`] rather than a machine integer.

use num::BigUint;

use crate::error::EncodeError;

/// Leading character of every binary-encoded value.
pub const BINARY_MARKER: char = 'b';

/// Output radix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    /// Base 10, used by step scripts.
    Decimal,
    /// Lowercase base 16, used by `$readmemh` data files.
    Hex,
}

impl Radix {
    fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

/// Re-encodes a bit-string such as `b1010` as `10` (decimal) or `a` (hex).
///
/// Leading zero bits produce no extra digits; an all-zero value renders as
/// `0`.
///
/// # Errors
///
/// [`EncodeError::MissingMarker`] if `bits` does not start with
/// [`BINARY_MARKER`], [`EncodeError::InvalidDigits`] if the remainder is
/// empty or contains anything other than `0` and `1` (such as `x` or `z`).
pub fn encode_bits(bits: &str, radix: Radix) -> Result<String, EncodeError> {
    let digits = bits
        .strip_prefix(BINARY_MARKER)
        .ok_or_else(|| EncodeError::MissingMarker(bits.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(EncodeError::InvalidDigits(bits.to_string()));
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 2)
        .ok_or_else(|| EncodeError::InvalidDigits(bits.to_string()))?;
    Ok(value.to_str_radix(radix.base()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_in_both_radixes() {
        assert_eq!(encode_bits("b1010", Radix::Decimal).unwrap(), "10");
        assert_eq!(encode_bits("b1010", Radix::Hex).unwrap(), "a");
    }

    #[test]
    fn all_zero_is_single_digit() {
        assert_eq!(encode_bits("b000", Radix::Decimal).unwrap(), "0");
        assert_eq!(encode_bits("b000", Radix::Hex).unwrap(), "0");
    }

    #[test]
    fn leading_zeros_add_no_digits() {
        assert_eq!(encode_bits("b00001111", Radix::Hex).unwrap(), "f");
        assert_eq!(encode_bits("b0001", Radix::Decimal).unwrap(), "1");
    }

    #[test]
    fn hex_digits_are_lowercase() {
        assert_eq!(encode_bits("b11011110101011011011111011101111", Radix::Hex).unwrap(), "deadbeef");
    }

    #[test]
    fn wider_than_u128() {
        let bits = format!("b1{}", "0".repeat(130));
        let hex = encode_bits(&bits, Radix::Hex).unwrap();
        // 2^130 = 0x4 followed by 32 zero nibbles
        assert_eq!(hex, format!("4{}", "0".repeat(32)));
        let dec = encode_bits(&bits, Radix::Decimal).unwrap();
        assert_eq!(dec, "1361129467683753853853498429727072845824");
    }

    #[test]
    fn missing_marker_is_rejected() {
        assert_eq!(
            encode_bits("x101", Radix::Decimal),
            Err(EncodeError::MissingMarker("x101".to_string()))
        );
        assert!(matches!(
            encode_bits("1010", Radix::Hex),
            Err(EncodeError::MissingMarker(_))
        ));
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert_eq!(
            encode_bits("bx1", Radix::Hex),
            Err(EncodeError::InvalidDigits("bx1".to_string()))
        );
        assert!(encode_bits("b1_0", Radix::Hex).is_err());
    }

    #[test]
    fn empty_digits_are_rejected() {
        assert!(matches!(
            encode_bits("b", Radix::Decimal),
            Err(EncodeError::InvalidDigits(_))
        ));
        assert!(matches!(
            encode_bits("", Radix::Decimal),
            Err(EncodeError::MissingMarker(_))
        ));
    }
}
