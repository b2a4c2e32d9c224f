//! Content fingerprint - the key every provenance record is anchored under

use std::fmt;
use std::str::FromStr;

/// Length of a fingerprint in bytes
pub const FINGERPRINT_LEN: usize = 64;

/// Length of the canonical hex encoding of a fingerprint
pub const FINGERPRINT_HEX_LEN: usize = FINGERPRINT_LEN * 2;

/// Reasons a fingerprint could not be constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Raw input had the wrong number of bytes
    InvalidLength {
        /// Number of bytes (or hex characters) that were supplied
        actual: usize,
        /// Number that was required
        expected: usize,
    },

    /// Input contained a non-hex character
    InvalidHex(String),
}

impl fmt::Display for FingerprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintError::InvalidLength { actual, expected } => {
                write!(f, "Invalid fingerprint length: expected {}, got {}", expected, actual)
            }
            FingerprintError::InvalidHex(msg) => write!(f, "Invalid fingerprint hex: {}", msg),
        }
    }
}

impl std::error::Error for FingerprintError {}

/// A 64-byte content digest produced by the hashing collaborator
///
/// The registry treats fingerprints as opaque: it never checks that a
/// fingerprint matches any particular bytes. Two fingerprints are equal iff
/// their bytes are equal.
///
/// # Examples
///
/// ```
/// use origin_domain::ContentFingerprint;
///
/// let fp = ContentFingerprint::from_bytes([0xAA; 64]);
/// let text = fp.to_hex();
/// assert_eq!(text.len(), 128);
/// assert_eq!(text.parse::<ContentFingerprint>().unwrap(), fp);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentFingerprint([u8; FINGERPRINT_LEN]);

impl ContentFingerprint {
    /// Wrap an owned 64-byte digest
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a digest out of a slice, rejecting any length other than 64
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FingerprintError> {
        let arr: [u8; FINGERPRINT_LEN] =
            bytes.try_into().map_err(|_| FingerprintError::InvalidLength {
                actual: bytes.len(),
                expected: FINGERPRINT_LEN,
            })?;
        Ok(Self(arr))
    }

    /// Parse the wire form: exactly 128 hex characters, optional `0x` prefix
    ///
    /// Upper-case input is accepted; [`to_hex`](Self::to_hex) always emits
    /// lower-case.
    pub fn from_hex(s: &str) -> Result<Self, FingerprintError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != FINGERPRINT_HEX_LEN {
            return Err(FingerprintError::InvalidLength {
                actual: digits.len(),
                expected: FINGERPRINT_HEX_LEN,
            });
        }

        let mut arr = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(digits, &mut arr)
            .map_err(|e| FingerprintError::InvalidHex(e.to_string()))?;
        Ok(Self(arr))
    }

    /// Canonical lower-case hex encoding (128 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Borrow the raw digest
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Abbreviated form for logs and tables (first 8 bytes)
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentFingerprint({}..)", self.short())
    }
}

impl FromStr for ContentFingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for ContentFingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}
