//! Contract addresses and their checksummed canonical form.
//!
//! Addresses are 20-byte identifiers written as `0x`-prefixed hex. The
//! canonical spelling is the mixed-case checksum encoding (EIP-55): each hex
//! letter is uppercased when the matching nibble of the Keccak-256 hash of the
//! lowercase hex string is 8 or higher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Number of hex digits in an address (without the `0x` prefix).
const ADDRESS_HEX_LEN: usize = 40;

/// Reasons a literal address was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The `0x` prefix is missing.
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),

    /// Wrong number of hex digits.
    #[error("address must have 40 hex digits, found {found}: {input}")]
    InvalidLength { input: String, found: usize },

    /// A character outside `[0-9a-fA-F]`.
    #[error("address contains non-hex characters: {0}")]
    InvalidHex(String),

    /// Mixed-case input whose casing does not match the checksum.
    #[error("address checksum mismatch: {input} (expected {expected})")]
    InvalidChecksum { input: String, expected: String },
}

/// A 20-byte contract address.
///
/// Equality and hashing use the raw bytes, so differently-cased spellings of
/// the same address compare equal. `Display` always renders the checksummed
/// form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parses a literal address.
    ///
    /// All-lowercase and all-uppercase spellings are accepted as-is. Mixed-case
    /// spellings must carry a valid checksum.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let hex = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(input.to_string()))?;

        if hex.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::InvalidLength {
                input: input.to_string(),
                found: hex.len(),
            });
        }

        let mut bytes = [0u8; 20];
        for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
            let hi = hex_value(pair[0]).ok_or_else(|| AddressError::InvalidHex(input.to_string()))?;
            let lo = hex_value(pair[1]).ok_or_else(|| AddressError::InvalidHex(input.to_string()))?;
            bytes[i] = (hi << 4) | lo;
        }
        let address = Address(bytes);

        let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            let expected = address.to_checksum();
            if expected[2..] != *hex {
                return Err(AddressError::InvalidChecksum {
                    input: input.to_string(),
                    expected,
                });
            }
        }

        Ok(address)
    }

    /// Renders the checksummed (EIP-55) spelling, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        let lower: String = self.0.iter().map(|b| format!("{b:02x}")).collect();
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + ADDRESS_HEX_LEN);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_checksum()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}
