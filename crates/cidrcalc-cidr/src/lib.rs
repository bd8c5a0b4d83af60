//! CIDR parsing and subnet derivation
//!
//! Provides everything the calculator derives from one `address/prefix`
//! string:
//! - Parse CIDR notation in a single pass (shape and value checks together)
//! - Derive mask, wildcard, network and broadcast addresses
//! - Usable host range and host count, with the /31 and /32 special cases
//! - Report layout for display (see [`report`])
//!
//! # Examples
//!
//! ```
//! use cidrcalc_cidr::Cidr;
//!
//! let cidr = Cidr::parse("10.9.19.101/23").unwrap();
//! let derived = cidr.subnet().derive();
//! assert_eq!(derived.mask.to_string(), "255.255.254.0");
//! assert_eq!(derived.min_host.unwrap().to_string(), "10.9.18.1");
//! assert_eq!(derived.max_host.unwrap().to_string(), "10.9.19.254");
//! assert_eq!(derived.broadcast.unwrap().to_string(), "10.9.19.255");
//! assert_eq!(derived.host_count, Some(510));
//! ```

use cidrcalc_core::{CoreError, Ipv4, PrefixLength};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

pub mod report;

pub use report::{Rendered, Report, ReportLine, Summary};

/// Digits allowed per octet group
const MAX_OCTET_DIGITS: usize = 3;
/// Digits allowed in the prefix group
const MAX_PREFIX_DIGITS: usize = 2;

/// Which of the two failure classes an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input does not have the `d.d.d.d/d` shape; the caller shows usage
    Usage,
    /// Input has the right shape but a value is out of range
    Parse,
}

/// CIDR errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// Not shaped like `ddd.ddd.ddd.ddd/dd`
    #[error("Invalid CIDR notation: {0}")]
    Malformed(String),

    /// Address or prefix rejected after the shape check
    #[error(transparent)]
    Value(#[from] CoreError),
}

impl CidrError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CidrError::Malformed(_) => ErrorKind::Usage,
            CidrError::Value(_) => ErrorKind::Parse,
        }
    }
}

pub type Result<T> = std::result::Result<T, CidrError>;

/// An address together with its prefix length, as written by the user
///
/// The address keeps its host bits; see [`Cidr::subnet`] for the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cidr {
    address: Ipv4,
    prefix: PrefixLength,
}

impl Cidr {
    /// Parse CIDR notation string
    ///
    /// Anything not shaped like `ddd.ddd.ddd.ddd/dd` (1-3 ASCII digits per
    /// octet, 1-2 for the prefix) is an [`ErrorKind::Usage`] error. A
    /// well-shaped string with an octet above 255, an octet with a leading
    /// zero, or a prefix above 32 is an [`ErrorKind::Parse`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cidrcalc_cidr::{Cidr, ErrorKind};
    ///
    /// let cidr = Cidr::parse("192.168.1.5/32").unwrap();
    /// assert_eq!(cidr.prefix_len(), 32);
    ///
    /// assert_eq!(Cidr::parse("10.0.0.1").unwrap_err().kind(), ErrorKind::Usage);
    /// assert_eq!(Cidr::parse("10.0.0.1/33").unwrap_err().kind(), ErrorKind::Parse);
    /// ```
    pub fn parse(cidr: &str) -> Result<Self> {
        let (ip_str, prefix_str) = split_shape(cidr)?;

        let address: Ipv4 = ip_str.parse()?;
        // Shape check guarantees at most two digits, so this fits in u8
        let len: u8 = prefix_str
            .parse()
            .map_err(|_| CidrError::Malformed(cidr.to_string()))?;
        let prefix = PrefixLength::new(len)?;

        debug!(%address, prefix = len, "parsed CIDR");
        Ok(Self { address, prefix })
    }

    /// Address as given, host bits included
    pub fn address(&self) -> Ipv4 {
        self.address
    }

    /// Prefix length
    pub fn prefix(&self) -> PrefixLength {
        self.prefix
    }

    /// Prefix length as a plain number
    pub fn prefix_len(&self) -> u8 {
        self.prefix.get()
    }

    /// The subnet this address belongs to
    pub fn subnet(&self) -> Subnet {
        Subnet::new(self.address, self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        Cidr::parse(s)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix.get())
    }
}

/// Split `a.b.c.d/p` into its address and prefix parts, checking only the
/// digit-group shape.
fn split_shape(input: &str) -> Result<(&str, &str)> {
    let malformed = || CidrError::Malformed(input.to_string());

    let (ip_str, prefix_str) = input.split_once('/').ok_or_else(malformed)?;

    if !is_digit_group(prefix_str, MAX_PREFIX_DIGITS) {
        return Err(malformed());
    }

    let groups: Vec<&str> = ip_str.split('.').collect();
    if groups.len() != 4 || !groups.iter().all(|g| is_digit_group(g, MAX_OCTET_DIGITS)) {
        return Err(malformed());
    }

    Ok((ip_str, prefix_str))
}

fn is_digit_group(group: &str, max_digits: usize) -> bool {
    (1..=max_digits).contains(&group.len()) && group.bytes().all(|b| b.is_ascii_digit())
}

/// Subnet derived from a [`Cidr`]
///
/// Invariant: `network & mask == network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subnet {
    network: Ipv4,
    mask: Ipv4,
    prefix: PrefixLength,
}

impl Subnet {
    /// Subnet containing `address`
    pub fn new(address: Ipv4, prefix: PrefixLength) -> Self {
        let mask = prefix.mask();
        Self {
            network: Ipv4(address.0 & mask),
            mask: Ipv4(mask),
            prefix,
        }
    }

    /// Network address (host bits cleared)
    pub fn network(&self) -> Ipv4 {
        self.network
    }

    /// Subnet mask
    pub fn mask(&self) -> Ipv4 {
        self.mask
    }

    /// Wildcard mask (host bits set)
    pub fn wildcard(&self) -> Ipv4 {
        Ipv4(self.prefix.wildcard())
    }

    /// Prefix length
    pub fn prefix(&self) -> PrefixLength {
        self.prefix
    }

    /// Last address of the block (all host bits set)
    ///
    /// For /31 and /32 this is a plain block address, not a broadcast.
    pub fn last_address(&self) -> Ipv4 {
        Ipv4(self.network.0 | self.prefix.wildcard())
    }

    /// Usable host range, inclusive
    ///
    /// /31 blocks use both addresses. /32 has no range.
    pub fn usable_range(&self) -> Option<(Ipv4, Ipv4)> {
        let first = self.network;
        let last = self.last_address();
        match self.prefix.get() {
            32 => None,
            31 => Some((first, last)),
            _ => Some((Ipv4(first.0 + 1), Ipv4(last.0 - 1))),
        }
    }

    /// Broadcast address; only blocks of four or more addresses have one
    pub fn broadcast(&self) -> Option<Ipv4> {
        (self.prefix.get() < 31).then(|| self.last_address())
    }

    /// Usable hosts, excluding network and broadcast addresses
    ///
    /// Not reported for /31 and /32.
    pub fn host_count(&self) -> Option<u64> {
        (self.prefix.get() < 31).then(|| self.prefix.block_size() - 2)
    }

    /// Check if an address falls inside this subnet
    pub fn contains(&self, ip: Ipv4) -> bool {
        ip.0 & self.mask.0 == self.network.0
    }

    /// Compute every derived address at once
    pub fn derive(&self) -> DerivedAddresses {
        let range = self.usable_range();
        let derived = DerivedAddresses {
            mask: self.mask,
            wildcard: self.wildcard(),
            network: self.network,
            min_host: range.map(|(min, _)| min),
            max_host: range.map(|(_, max)| max),
            broadcast: self.broadcast(),
            host_count: self.host_count(),
        };
        trace!(?derived, "derived subnet addresses");
        derived
    }
}

/// Everything computed from a [`Subnet`]
///
/// Fields that do not apply to the prefix length are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedAddresses {
    pub mask: Ipv4,
    pub wildcard: Ipv4,
    pub network: Ipv4,
    pub min_host: Option<Ipv4>,
    pub max_host: Option<Ipv4>,
    pub broadcast: Option<Ipv4>,
    pub host_count: Option<u64>,
}
