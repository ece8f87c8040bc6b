//! Bus address of a single ELL14 module.

use crate::error::{Ell14Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device address on the shared bus: one decimal digit, 0-9.
///
/// Every request is prefixed with the ASCII digit and every reply echoes it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "AddressRepr", into = "String")]
pub struct Address(u8);

impl Address {
    /// Create an address from its numeric value.
    pub fn new(value: u8) -> Result<Self> {
        if value <= 9 {
            Ok(Self(value))
        } else {
            Err(Ell14Error::InvalidAddress(value.to_string()))
        }
    }

    /// Numeric value, 0-9.
    pub fn value(self) -> u8 {
        self.0
    }

    /// ASCII digit used on the wire.
    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }

    /// ASCII digit used on the wire, as a byte.
    pub fn as_byte(self) -> u8 {
        b'0' + self.0
    }
}

impl TryFrom<char> for Address {
    type Error = Ell14Error;

    fn try_from(c: char) -> Result<Self> {
        match c.to_digit(10) {
            Some(d) => Self::new(d as u8),
            None => Err(Ell14Error::InvalidAddress(c.to_string())),
        }
    }
}

impl TryFrom<u8> for Address {
    type Error = Ell14Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Address {
    type Err = Ell14Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(Ell14Error::InvalidAddress(s.to_string())),
        }
    }
}

/// Accepts both `address = "2"` and `address = 2` in configuration.
#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<AddressRepr> for Address {
    type Error = Ell14Error;

    fn try_from(repr: AddressRepr) -> Result<Self> {
        match repr {
            AddressRepr::Number(value) => Self::new(value),
            AddressRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
