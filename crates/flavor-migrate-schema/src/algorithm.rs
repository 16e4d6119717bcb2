//! Hash bank algorithms.
//!
//! Legacy flavor parts and templates both name PCR banks by free text
//! (`"SHA256"`, `"sha256"`, `"SHA-256"`). Comparisons between the two go
//! through [`HashAlgorithm`] so spelling differences do not count as a bank
//! mismatch.

use std::fmt;

/// The cryptographic hash algorithm a PCR bank belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sm3_256,
    /// Any other bank name, kept in normalized form (upper case, no dashes
    /// or underscores) so two spellings of the same unknown name still
    /// compare equal.
    Other(String),
}

impl HashAlgorithm {
    /// Resolve a bank name as written in a flavor or template.
    pub fn from_bank_name(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_uppercase)
            .collect();
        match normalized.as_str() {
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SM3256" => Self::Sm3_256,
            _ => Self::Other(normalized),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha384 => write!(f, "SHA384"),
            Self::Sha512 => write!(f, "SHA512"),
            Self::Sm3_256 => write!(f, "SM3_256"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}
