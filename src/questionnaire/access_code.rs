use rand::Rng;
use serde::Serialize;
use std::fmt;

const CODE_LENGTH: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque retrieval key for a stored report.
///
/// Always a non-empty token of ASCII letters, digits, `-` and `_`, so it can be
/// used directly as a file-name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccessCode(String);

impl AccessCode {
    /// Draws a fresh 8-character uppercase alphanumeric code.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Sanitizes a caller-supplied code: surrounding whitespace trimmed, letters
    /// upper-cased, anything outside `[A-Za-z0-9_-]` dropped. Returns `None`
    /// when nothing usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let sanitized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if sanitized.is_empty() {
            None
        } else {
            Some(Self(sanitized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
