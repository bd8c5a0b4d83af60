//! Core types for cidrcalc
//!
//! This crate provides the value types the rest of the workspace computes with:
//! - [`Ipv4`] - IPv4 address held as a single 32-bit value
//! - [`PrefixLength`] - validated CIDR prefix length (0-32)
//! - [`CoreError`] - Error types
//!
//! ```
//! use cidrcalc_core::{Ipv4, PrefixLength};
//!
//! let ip: Ipv4 = "10.9.19.101".parse().unwrap();
//! let prefix = PrefixLength::new(23).unwrap();
//! assert_eq!(Ipv4(prefix.mask()).to_string(), "255.255.254.0");
//! assert_eq!(ip.octets(), [10, 9, 19, 101]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bits in an IPv4 address
pub const IPV4_BITS: u8 = 32;

/// IPv4 address
///
/// Stored as one `u32` in host order; octet 0 is the most significant byte.
/// All derived addresses are new values, nothing is edited in place.
///
/// # Examples
///
/// ```
/// use cidrcalc_core::Ipv4;
///
/// let ip = Ipv4::from_octets([192, 168, 1, 5]);
/// assert_eq!(ip.0, 0xC0A80105);
/// assert_eq!(ip.to_string(), "192.168.1.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4(pub u32);

impl Ipv4 {
    /// Build an address from four octets in network order
    pub fn from_octets(octets: [u8; 4]) -> Self {
        Ipv4(u32::from_be_bytes(octets))
    }

    /// The four octets in network order
    pub fn octets(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Render as four 8-bit binary groups separated by `.`
    ///
    /// ```
    /// use cidrcalc_core::Ipv4;
    ///
    /// let mask = Ipv4::from_octets([255, 255, 254, 0]);
    /// assert_eq!(mask.to_binary(), "11111111.11111111.11111110.00000000");
    /// ```
    pub fn to_binary(&self) -> String {
        let [a, b, c, d] = self.octets();
        format!("{:08b}.{:08b}.{:08b}.{:08b}", a, b, c, d)
    }
}

impl fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl From<u32> for Ipv4 {
    fn from(value: u32) -> Self {
        Ipv4(value)
    }
}

impl From<[u8; 4]> for Ipv4 {
    fn from(octets: [u8; 4]) -> Self {
        Ipv4::from_octets(octets)
    }
}

impl FromStr for Ipv4 {
    type Err = CoreError;

    /// Parse a dotted quad. Octets must be 0-255 and may not carry a
    /// leading zero (`010` is rejected, `0` is fine).
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }

        let mut octets = [0u8; 4];
        for (slot, part) in octets.iter_mut().zip(parts) {
            *slot = parse_octet(part)?;
        }

        Ok(Ipv4::from_octets(octets))
    }
}

fn parse_octet(part: &str) -> Result<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidOctet(part.to_string()));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(CoreError::LeadingZero(part.to_string()));
    }
    part.parse::<u8>()
        .map_err(|_| CoreError::InvalidOctet(part.to_string()))
}

/// CIDR prefix length
///
/// Count of leading one-bits in the subnet mask. Always within 0-32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PrefixLength(u8);

impl PrefixLength {
    /// Validate a prefix length
    ///
    /// ```
    /// use cidrcalc_core::PrefixLength;
    ///
    /// assert!(PrefixLength::new(32).is_ok());
    /// assert!(PrefixLength::new(33).is_err());
    /// ```
    pub fn new(len: u8) -> Result<Self> {
        if len > IPV4_BITS {
            return Err(CoreError::InvalidPrefixLength(len));
        }
        Ok(Self(len))
    }

    /// Raw prefix length
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Number of host bits left uncovered by the mask
    pub fn host_bits(&self) -> u8 {
        IPV4_BITS - self.0
    }

    /// Subnet mask: top `len` bits set
    pub fn mask(&self) -> u32 {
        u32::MAX.checked_shl(u32::from(self.host_bits())).unwrap_or(0)
    }

    /// Wildcard (host) mask, the complement of [`PrefixLength::mask`]
    pub fn wildcard(&self) -> u32 {
        self.mask() ^ u32::MAX
    }

    /// Total addresses in a block of this size
    pub fn block_size(&self) -> u64 {
        1u64 << self.host_bits()
    }
}

impl TryFrom<u8> for PrefixLength {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        PrefixLength::new(value)
    }
}

impl From<PrefixLength> for u8 {
    fn from(prefix: PrefixLength) -> Self {
        prefix.0
    }
}

impl fmt::Display for PrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Error types for address and prefix parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Not a four-part dotted quad
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// Octet is not a number in 0-255
    #[error("Invalid octet: {0} (must be 0-255)")]
    InvalidOctet(String),

    /// Octet written with a leading zero
    #[error("Invalid octet: {0} (leading zeros are not allowed)")]
    LeadingZero(String),

    /// Prefix length above 32
    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
