//! Bit-field extraction, concatenation, and binary rendering.
//!
//! Every value the harness handles is carried as a `u64` regardless of the
//! port width; these helpers slice and splice those values the way the
//! hardware's port declarations do (`[high:low]`, `{high, low}`).

/// Number of bits in the carrier integer.
const CARRIER_BITS: u32 = u64::BITS;

/// Error returned when a bit range is inverted or exceeds the carrier width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid bit range [{high}:{low}]")]
pub struct BitRangeError {
    /// The requested low bit index.
    pub low: u32,
    /// The requested high bit index.
    pub high: u32,
}

/// Returns a mask with the low `width` bits set.
///
/// Widths of 64 or more yield an all-ones mask.
pub fn mask(width: u32) -> u64 {
    if width >= CARRIER_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Returns `true` if bit `index` of `value` is set.
///
/// Indices past the carrier width read as zero.
pub fn bit(value: u64, index: u32) -> bool {
    index < CARRIER_BITS && (value >> index) & 1 == 1
}

/// Extracts bits `[low..=high]` of `value`, right-aligned.
///
/// Returns an error if `low > high` or `high` lies outside the carrier.
pub fn extract_bits(value: u64, low: u32, high: u32) -> Result<u64, BitRangeError> {
    if low > high || high >= CARRIER_BITS {
        return Err(BitRangeError { low, high });
    }
    Ok((value >> low) & mask(high - low + 1))
}

/// Concatenates two fields as `{high, low}` where `low` occupies `width` bits.
///
/// No overflow checking: the caller guarantees `low` fits in `width` bits.
/// Bits of `high` shifted past the carrier are discarded.
pub fn concat(width: u32, high: u64, low: u64) -> u64 {
    high.checked_shl(width).unwrap_or(0) | low
}

/// Renders `value` in binary, left-padded with zeros to at least `min_width` digits.
///
/// Zero renders as `"0"` even when `min_width` is zero.
pub fn to_binary_string(value: u64, min_width: usize) -> String {
    format!("{value:0min_width$b}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mask_widths() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(4), 0xF);
        assert_eq!(mask(8), 0xFF);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(mask(70), u64::MAX);
    }

    #[test]
    fn bit_reads() {
        assert!(bit(0x80, 7));
        assert!(!bit(0x80, 6));
        assert!(!bit(u64::MAX, 64));
    }

    #[test]
    fn extract_nibble() {
        assert_eq!(extract_bits(0xABCD, 4, 7), Ok(0xC));
        assert_eq!(extract_bits(0xABCD, 12, 15), Ok(0xA));
    }

    #[test]
    fn extract_single_bit() {
        assert_eq!(extract_bits(0b100, 2, 2), Ok(1));
        assert_eq!(extract_bits(0b100, 1, 1), Ok(0));
    }

    #[test]
    fn extract_full_width() {
        assert_eq!(extract_bits(u64::MAX, 0, 63), Ok(u64::MAX));
    }

    #[test]
    fn extract_inverted_range_fails() {
        assert_eq!(
            extract_bits(0xFF, 5, 2),
            Err(BitRangeError { low: 5, high: 2 })
        );
    }

    #[test]
    fn extract_out_of_carrier_fails() {
        assert!(extract_bits(0xFF, 0, 64).is_err());
    }

    #[test]
    fn bit_range_error_display() {
        let e = BitRangeError { low: 5, high: 2 };
        assert_eq!(e.to_string(), "invalid bit range [2:5]");
    }

    #[test]
    fn concat_fields() {
        assert_eq!(concat(4, 0xA, 0x5), 0xA5);
        assert_eq!(concat(8, 0x1, 0x00), 0x100);
        assert_eq!(concat(0, 0x3, 0x0), 0x3);
    }

    #[test]
    fn concat_shift_past_carrier_discards_high() {
        assert_eq!(concat(64, 0xFF, 0x1), 0x1);
    }

    #[test]
    fn binary_zero_is_not_empty() {
        assert_eq!(to_binary_string(0, 0), "0");
    }

    #[test]
    fn binary_padding() {
        assert_eq!(to_binary_string(5, 4), "0101");
        assert_eq!(to_binary_string(2, 3), "010");
        assert_eq!(to_binary_string(0, 4), "0000");
    }

    #[test]
    fn binary_wider_than_min_width() {
        assert_eq!(to_binary_string(0x1F, 2), "11111");
    }

    proptest! {
        #[test]
        fn concat_then_extract_recovers_fields(high in 0u64..0x1_0000, low in 0u64..0x100) {
            let packed = concat(8, high, low);
            prop_assert_eq!(extract_bits(packed, 0, 7).unwrap(), low);
            prop_assert_eq!(extract_bits(packed, 8, 23).unwrap(), high);
        }

        #[test]
        fn binary_string_parses_back(value in any::<u64>(), width in 0usize..70) {
            let s = to_binary_string(value, width);
            prop_assert!(s.len() >= width.max(1));
            prop_assert_eq!(u64::from_str_radix(&s, 2).unwrap(), value);
        }
    }
}
