//! SHA-256 content digests for payload verification
//!
//! Digests are stored as their raw 32 bytes and rendered as lowercase hex.
//! Parsing accepts either case, so comparing a parsed manifest digest with a
//! computed one is case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const HEX_LEN: usize = 64;

/// SHA-256 digest stored as a 32-byte array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

/// Error for strings that are not a 64-character hex digest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid SHA-256 digest: {0}")]
pub struct InvalidDigest(pub String);

impl Sha256Digest {
    /// Compute the digest of some text
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lkg_loader::app::hash::Sha256Digest;
    ///
    /// let digest = Sha256Digest::of_text("abc");
    /// assert_eq!(
    ///     digest.to_hex(),
    ///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    /// );
    /// ```
    pub fn of_text(text: &str) -> Self {
        Sha256Digest(Sha256::digest(text.as_bytes()).into())
    }

    /// Create a digest from a hex string
    ///
    /// # Arguments
    ///
    /// * `hex` - 64-character hexadecimal string (case insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, InvalidDigest> {
        let trimmed = hex.trim();
        if trimmed.len() != HEX_LEN {
            return Err(InvalidDigest(hex.to_string()));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes).map_err(|_| InvalidDigest(hex.to_string()))?;
        Ok(Sha256Digest(bytes))
    }

    /// Lowercase 64-character hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this digest equals the given hex text, ignoring case
    ///
    /// Text that is not a valid digest never matches.
    pub fn matches_hex(&self, expected: &str) -> bool {
        Self::from_hex(expected).map_or(false, |other| other == *self)
    }
}

/// Hash some text into its lowercase hex digest
pub fn hash_text(text: &str) -> String {
    Sha256Digest::of_text(text).to_hex()
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Sha256Digest {
    type Err = InvalidDigest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Sha256Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        Self::from_hex(&hex_string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_known_vectors() {
        assert_eq!(hash_text(""), EMPTY_DIGEST);
        assert_eq!(
            hash_text("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_and_fixed_length() {
        let payload = "a,b\n1,2\n3,4";
        assert_eq!(hash_text(payload), hash_text(payload));
        assert_eq!(hash_text(payload).len(), HEX_LEN);
        assert_ne!(hash_text(payload), hash_text("a,b\n1,2\n3,5"));
        assert!(hash_text(payload)
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_case_insensitive_match() {
        let digest = Sha256Digest::of_text("");
        assert!(digest.matches_hex(EMPTY_DIGEST));
        assert!(digest.matches_hex(&EMPTY_DIGEST.to_uppercase()));
        assert!(!digest.matches_hex(&hash_text("x")));
        assert!(!digest.matches_hex("not-a-digest"));
    }

    #[test]
    fn test_invalid_hex_strings() {
        let invalid_cases = [
            "",
            &EMPTY_DIGEST[..63],
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85z",
        ];

        for hex in &invalid_cases {
            assert!(Sha256Digest::from_hex(hex).is_err(), "Should reject: {}", hex);
        }
    }

    #[test]
    fn test_serialization() {
        let digest: Sha256Digest = EMPTY_DIGEST.parse().unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", EMPTY_DIGEST));

        let back: Sha256Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
        assert_eq!(back.as_bytes().len(), 32);
    }
}
