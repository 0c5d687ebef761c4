//! `0x`-prefixed hex quantities as used by Ethereum JSON-RPC.

use crate::error::FormatError;

/// Parse a hex quantity (with or without `0x`) to u64.
pub fn hex_to_u64(s: &str) -> Result<u64, FormatError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() {
        return Err(FormatError::new("quantity", format!("'{s}' has no hex digits")));
    }
    // from_str_radix accepts a leading '+', which is not a hex digit.
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(FormatError::new(
            "quantity",
            format!("'{s}' contains non-hex character '{bad}'"),
        ));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|_| FormatError::new("quantity", format!("'{s}' does not fit in 64 bits")))
}

/// Encode as `0x` + lowercase hex without zero padding (`0` is `0x0`).
pub fn u64_to_hex(n: u64) -> String {
    format!("{n:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_and_without_prefix() {
        assert_eq!(hex_to_u64("0x10").unwrap(), 16);
        assert_eq!(hex_to_u64("ff").unwrap(), 255);
        assert_eq!(hex_to_u64("0XFF").unwrap(), 255);
        assert_eq!(hex_to_u64("0x0").unwrap(), 0);
        assert_eq!(hex_to_u64("0x00ab").unwrap(), 0xab);
        assert_eq!(hex_to_u64("0x12a05f200").unwrap(), 5_000_000_000);
        assert_eq!(hex_to_u64("0xffffffffffffffff").unwrap(), u64::MAX);
    }

    #[test]
    fn rejects_non_hex() {
        for bad in ["", "0x", "0xzz", "0x+1", "+1", "0x1 ", "-1", "0x1.5", "latest"] {
            let err = hex_to_u64(bad).unwrap_err();
            assert_eq!(err.field, "quantity", "input {bad:?}");
        }
    }

    #[test]
    fn rejects_overflow() {
        let err = hex_to_u64("0x10000000000000000").unwrap_err();
        assert!(err.reason.contains("64 bits"), "reason: {}", err.reason);
    }

    #[test]
    fn encodes_lowercase_unpadded() {
        assert_eq!(u64_to_hex(0), "0x0");
        assert_eq!(u64_to_hex(16), "0x10");
        assert_eq!(u64_to_hex(0xABCDEF), "0xabcdef");
        assert_eq!(u64_to_hex(u64::MAX), "0xffffffffffffffff");
    }

    #[test]
    fn round_trips_across_range() {
        let mut n: u64 = 1;
        for _ in 0..2_000 {
            assert_eq!(hex_to_u64(&u64_to_hex(n)).unwrap(), n);
            n = n.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        }
        for n in [0, 1, 15, 16, u64::MAX - 1, u64::MAX] {
            assert_eq!(hex_to_u64(&u64_to_hex(n)).unwrap(), n);
        }
    }
}
