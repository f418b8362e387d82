use std::{fmt, str::FromStr};

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use crate::errors::FetchError;

/// Decimals of a pool share token.
pub const SHARE_DECIMALS: u8 = 18;

/// Exact fixed-point amount held in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parses a plain (`12.5`) or exponent (`1.25e1`) decimal string into
    /// base units. Digits below the unit precision are rejected, never
    /// rounded.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, FetchError> {
        let err = || FetchError::InvalidAmount(input.to_string());
        let s = input.trim();

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(idx) => (
                &s[..idx],
                s[idx + 1..].parse::<i64>().map_err(|_| err())?,
            ),
            None => (s, 0),
        };
        let mantissa = mantissa.strip_prefix('+').unwrap_or(mantissa);

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let mut digits = format!("{int_part}{frac_part}");
        let mut shift = exponent
            .checked_sub(frac_part.len() as i64)
            .and_then(|v| v.checked_add(decimals as i64))
            .ok_or_else(err)?;

        if shift < 0 {
            let drop = usize::try_from(shift.unsigned_abs()).map_err(|_| err())?;
            let keep = digits.len().saturating_sub(drop);
            if digits[keep..].bytes().any(|b| b != b'0') {
                return Err(err());
            }
            digits.truncate(keep);
            shift = 0;
        }

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::new(U256::ZERO, decimals));
        }

        let base = U256::from_str_radix(digits, 10).map_err(|_| err())?;
        let factor = U256::from(10u8)
            .checked_pow(U256::from(shift as u64))
            .ok_or_else(err)?;

        base.checked_mul(factor)
            .map(|raw| Self::new(raw, decimals))
            .ok_or_else(err)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimals as usize;
        let digits = self.raw.to_string();
        if decimals == 0 {
            return f.write_str(&digits);
        }

        let padded = format!("{digits:0>width$}", width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');

        if frac_part.is_empty() {
            f.write_str(int_part)
        } else {
            write!(f, "{int_part}.{frac_part}")
        }
    }
}

/// `amount * 10^decimals` as an exact integer.
pub fn scale(amount: Decimal, decimals: u8) -> Result<U256, FetchError> {
    Ok(TokenAmount::parse(&amount.normalize().to_string(), decimals)?.raw)
}

/// EIP-55 form of a hex address. Mixed-case input must already carry a
/// valid checksum; all-lower and all-upper input is taken as is.
pub fn checksum(input: &str) -> Result<String, FetchError> {
    let invalid = || FetchError::InvalidAddress(input.to_string());
    let trimmed = input.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let mixed_case = body.bytes().any(|b| b.is_ascii_uppercase())
        && body.bytes().any(|b| b.is_ascii_lowercase());

    let address = if mixed_case {
        Address::parse_checksummed(format!("0x{body}"), None).map_err(|_| invalid())?
    } else {
        Address::from_str(body).map_err(|_| invalid())?
    };

    Ok(address.to_checksum(None))
}

/// Lowercase `0x` hex, the form the subgraph uses for ids.
pub fn lower_hex(address: &Address) -> String {
    format!("{:?}", address).to_lowercase()
}

/// Parses a decimal that may come back in scientific notation.
pub fn parse_decimal(input: &str) -> Result<Decimal, FetchError> {
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| FetchError::InvalidAmount(input.to_string()))
}

pub mod serde_address {
    use std::str::FromStr;

    use alloy_primitives::Address;

    use serde::{
        de::{Deserialize, Deserializer},
        ser::Serializer,
        Serialize,
    };

    pub fn serialize<S: Serializer>(u: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        super::lower_hex(u).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u: String = Deserialize::deserialize(deserializer)?;
        Address::from_str(&u).map_err(serde::de::Error::custom)
    }
}

pub mod serde_address_vec {
    use std::str::FromStr;

    use alloy_primitives::Address;

    use serde::{
        de::{Deserialize, Deserializer},
        ser::{SerializeSeq, Serializer},
    };

    pub fn serialize<S: Serializer>(u: &[Address], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(u.len()))?;
        for address in u {
            seq.serialize_element(&super::lower_hex(address))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Address>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u: Vec<String> = Deserialize::deserialize(deserializer)?;
        u.iter()
            .map(|s| Address::from_str(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Share amounts travel as decimal strings with 18 decimals.
pub mod serde_shares {
    use serde::{
        de::{Deserialize, Deserializer},
        ser::{Serialize, Serializer},
    };

    use super::{TokenAmount, SHARE_DECIMALS};

    pub fn serialize<S: Serializer>(u: &TokenAmount, serializer: S) -> Result<S::Ok, S::Error> {
        u.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TokenAmount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u: String = Deserialize::deserialize(deserializer)?;
        TokenAmount::parse(&u, SHARE_DECIMALS).map_err(serde::de::Error::custom)
    }
}

pub mod serde_decimal_str {
    use rust_decimal::Decimal;
    use serde::{
        de::{Deserialize, Deserializer},
        ser::{Serialize, Serializer},
    };

    pub fn serialize<S: Serializer>(u: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        u.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u: String = Deserialize::deserialize(deserializer)?;
        super::parse_decimal(&u).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_exponent_amounts() {
        let amount = TokenAmount::parse("100.5", 18).unwrap();
        assert_eq!(amount.raw, U256::from(100_500_000_000_000_000_000u128));
        assert_eq!(amount.to_string(), "100.5");

        let tiny = TokenAmount::parse("1e-18", 18).unwrap();
        assert_eq!(tiny.raw, U256::from(1u8));
        assert_eq!(tiny.to_string(), "0.000000000000000001");

        let big = TokenAmount::parse("1.5E+3", 0).unwrap();
        assert_eq!(big.raw, U256::from(1500u32));

        assert_eq!(TokenAmount::parse("0", 18).unwrap().raw, U256::ZERO);
        assert_eq!(TokenAmount::parse(".25", 2).unwrap().raw, U256::from(25u8));
    }

    #[test]
    fn keeps_precision_beyond_decimal_types() {
        let input = "123456789012345678901234567890.123456789012345678";
        let amount = TokenAmount::parse(input, 18).unwrap();
        assert_eq!(amount.to_string(), input);
    }

    #[test]
    fn rejects_sub_unit_digits_and_garbage() {
        assert!(TokenAmount::parse("0.0000000000000000001", 18).is_err());
        assert!(TokenAmount::parse("1.5", 0).is_err());
        assert!(TokenAmount::parse("-1", 18).is_err());
        assert!(TokenAmount::parse("abc", 18).is_err());
        assert!(TokenAmount::parse("", 18).is_err());
        assert!(TokenAmount::parse(".", 18).is_err());

        // trailing zeros below precision are fine
        assert_eq!(TokenAmount::parse("1.50", 1).unwrap().raw, U256::from(15u8));
    }

    #[test]
    fn scales_budget_to_base_units() {
        let budget = Decimal::from(12500);
        assert_eq!(
            scale(budget, 18).unwrap(),
            U256::from(12500u32) * U256::from(10u8).pow(U256::from(18u8))
        );
        assert_eq!(
            scale(Decimal::from_str("0.5").unwrap(), 6).unwrap(),
            U256::from(500_000u32)
        );
    }

    #[test]
    fn checksums_addresses() {
        assert_eq!(
            checksum("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
        assert_eq!(
            checksum("0xC02AAA39B223FE8D0A0E5C4F27EAD9083C756CC2").unwrap(),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
        assert_eq!(
            checksum("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
        assert!(matches!(
            checksum("0x1234"),
            Err(FetchError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rejects_mixed_case_with_bad_checksum() {
        assert_eq!(
            checksum("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap(),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
        assert!(matches!(
            checksum("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756CC2"),
            Err(FetchError::InvalidAddress(_))
        ));
    }

    #[test]
    fn decimals_accept_scientific_notation() {
        assert_eq!(parse_decimal("0.003").unwrap(), Decimal::from_str("0.003").unwrap());
        assert_eq!(parse_decimal("1e-6").unwrap(), Decimal::from_str("0.000001").unwrap());
        assert!(parse_decimal("fee").is_err());
    }
}
