use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand addresses look like `.iDiagnostic2.17`; the leading dot is
/// optional because template-side comments address bits relative to the
/// parameter (`.17`) while instance comments carry the full path.
static OPERAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\.?idiagnostic([1-9])\.(\d{1,2})$").unwrap());

/// Composite address of one diagnostic bit: word ordinal + bit position.
///
/// `word` is zero-based (`iDiagnostic1` → word 0); `bit` is 0..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BitKey {
    /// Zero-based diagnostic word ordinal
    pub word: u8,
    /// Bit position within the word (0..=31)
    pub bit: u8,
}

impl BitKey {
    /// Create a key, returning `None` when the bit is out of word range.
    #[must_use]
    pub fn new(word: u8, bit: u8) -> Option<Self> {
        (bit < 32).then_some(Self { word, bit })
    }

    /// Parse an instance comment operand (`.iDiagnostic2.17`, case
    /// insensitive) into a key. Operands addressing anything other than a
    /// diagnostic word yield `None` — they belong to non-diagnostic bits
    /// and are simply not ours.
    #[must_use]
    pub fn parse_operand(operand: &str) -> Option<Self> {
        let caps = OPERAND_RE.captures(operand.trim())?;
        let word: u8 = caps[1].parse().ok()?;
        let bit: u8 = caps[2].parse().ok()?;
        Self::new(word - 1, bit)
    }

    /// Parse a template-side bit operand (`.17` under an `iDiagnostic<N>`
    /// parameter) given the word ordinal already derived from the
    /// parameter name.
    #[must_use]
    pub fn parse_bit_operand(word: u8, operand: &str) -> Option<Self> {
        let bit: u8 = operand.trim().strip_prefix('.')?.parse().ok()?;
        Self::new(word, bit)
    }

    /// Render the full instance operand for this key.
    #[must_use]
    pub fn operand(&self) -> String {
        format!(".iDiagnostic{}.{}", self.word + 1, self.bit)
    }
}

impl fmt::Display for BitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "iDiagnostic{}.{}", self.word + 1, self.bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_operand() {
        let key = BitKey::parse_operand(".iDiagnostic2.17").unwrap();
        assert_eq!(key, BitKey { word: 1, bit: 17 });
    }

    #[test]
    fn parses_case_insensitively_and_without_dot() {
        assert_eq!(
            BitKey::parse_operand(".IDIAGNOSTIC1.0"),
            BitKey::parse_operand("idiagnostic1.0"),
        );
    }

    #[test]
    fn rejects_foreign_operands() {
        assert_eq!(BitKey::parse_operand(".iStatus.3"), None);
        assert_eq!(BitKey::parse_operand(".iDiagnostic1"), None);
        assert_eq!(BitKey::parse_operand(""), None);
    }

    #[test]
    fn rejects_out_of_range_bits() {
        assert_eq!(BitKey::parse_operand(".iDiagnostic1.32"), None);
        assert!(BitKey::parse_operand(".iDiagnostic1.31").is_some());
    }

    #[test]
    fn parses_template_bit_operand() {
        let key = BitKey::parse_bit_operand(2, ".5").unwrap();
        assert_eq!(key, BitKey { word: 2, bit: 5 });
        assert_eq!(BitKey::parse_bit_operand(0, "5"), None);
    }

    #[test]
    fn operand_round_trips() {
        let key = BitKey { word: 1, bit: 17 };
        assert_eq!(BitKey::parse_operand(&key.operand()), Some(key));
    }
}
