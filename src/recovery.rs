//! # Recovery Phrase Codec (BIP39)
//!
//! Mnemonic generation, validation, and deterministic phrase-to-key
//! derivation for identity backup and recovery.
//!
//! ## Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PHRASE → KEY DERIVATION                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  12 or 24 words (128/256 bits of entropy + checksum)                   │
//! │         │                                                               │
//! │         ▼  normalize: trim, lowercase, collapse whitespace             │
//! │  PBKDF2-HMAC-SHA512(password = phrase, salt = "mnemonic",              │
//! │                     iterations = 2048) → 64-byte seed                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  First 32 bytes of the seed = secp256k1 private key scalar             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Taking the first 32 seed bytes directly is deliberately NOT BIP32
//! hierarchical derivation. Phrases were issued under this scheme, so it
//! is preserved verbatim for compatibility — switching to a proper HD
//! path would break recovery for every phrase already in the field.
//!
//! ## Security Considerations
//!
//! | Aspect | Measure |
//! |--------|---------|
//! | Entropy | 128/256 bits from OS CSPRNG |
//! | Checksum | Catches most single-word corruptions |
//! | Storage | Phrase should be written down, never stored digitally |
//! | Display | Show once, never log |

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand_core::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::crypto::{CurveEngine, KeyPair, PRIVATE_KEY_SIZE};
use crate::error::{Error, Result};

/// Maximum number of autocomplete suggestions returned
const MAX_SUGGESTIONS: usize = 10;

/// Entropy strength of a generated phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseStrength {
    /// 128 bits of entropy → 12 words
    Words12,
    /// 256 bits of entropy → 24 words
    Words24,
}

impl PhraseStrength {
    fn entropy_bytes(self) -> usize {
        match self {
            PhraseStrength::Words12 => 16,
            PhraseStrength::Words24 => 32,
        }
    }

    /// Number of words a phrase of this strength contains
    pub fn word_count(self) -> usize {
        match self {
            PhraseStrength::Words12 => 12,
            PhraseStrength::Words24 => 24,
        }
    }
}

/// A BIP39 recovery phrase for identity backup
///
/// ## Security Warning
///
/// - This phrase can fully recover the user's identity
/// - Should be shown to the user exactly once
/// - Should never be logged or stored in plaintext
#[derive(ZeroizeOnDrop)]
pub struct RecoveryPhrase {
    /// The underlying BIP39 mnemonic
    #[zeroize(skip)] // bip39::Mnemonic doesn't implement Zeroize
    mnemonic: Mnemonic,
}

impl RecoveryPhrase {
    /// Generate a new random recovery phrase
    ///
    /// Entropy comes from the OS CSPRNG and fails closed when that source
    /// is unavailable.
    pub fn generate(strength: PhraseStrength) -> Result<Self> {
        let mut entropy = vec![0u8; strength.entropy_bytes()];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|_| Error::RngFailed)?;

        let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|e| {
            Error::KeyDerivationFailed(format!("Failed to generate mnemonic: {}", e))
        })?;

        Ok(Self { mnemonic })
    }

    /// Parse a recovery phrase, normalizing it first
    ///
    /// ## Validation
    ///
    /// - Must be 12 or 24 words
    /// - All words must be in the BIP39 English wordlist
    /// - Checksum must be valid
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = normalize_phrase(phrase);

        let mnemonic = Mnemonic::parse_normalized(&normalized)
            .map_err(|e| Error::InvalidRecoveryPhrase(format!("{}", e)))?;

        let count = mnemonic.word_count();
        if count != 12 && count != 24 {
            return Err(Error::InvalidRecoveryPhrase(format!(
                "Expected 12 or 24 words, got {}",
                count
            )));
        }

        Ok(Self { mnemonic })
    }

    /// Validate a phrase without constructing a `RecoveryPhrase`
    ///
    /// Useful for UI validation before submission. Checksum failures and
    /// out-of-list words both return `false`.
    pub fn validate(phrase: &str) -> bool {
        Self::parse(phrase).is_ok()
    }

    /// Get the words as a vector
    pub fn words(&self) -> Vec<&'static str> {
        self.mnemonic.words().collect()
    }

    /// Get the phrase as a single string (words separated by spaces)
    ///
    /// ## Security Warning
    ///
    /// Only use this for display to the user. Never log or store.
    pub fn phrase(&self) -> String {
        self.mnemonic.to_string()
    }

    /// Derive the private key scalar from this phrase, hex-encoded
    ///
    /// Runs the standard BIP39 seed derivation (empty passphrase) and
    /// takes the first 32 bytes of the 64-byte seed as the scalar. See
    /// the module docs for why this is not BIP32 and must stay that way.
    pub fn derive_private_key(&self) -> Result<String> {
        let seed = self.mnemonic.to_seed("");

        let scalar = &seed[..PRIVATE_KEY_SIZE];

        // A seed prefix that is not a valid scalar has probability ~2^-128.
        // Refuse rather than silently reduce, so the phrase→key mapping
        // stays a pure function of the published scheme.
        let engine = CurveEngine::new();
        let private_key = hex::encode(scalar);
        if !engine.is_valid_private_key(&private_key) {
            return Err(Error::KeyDerivationFailed(
                "Seed does not encode a valid secp256k1 scalar".into(),
            ));
        }

        Ok(private_key)
    }

    /// Derive the full identity keypair from a phrase string
    ///
    /// This is the only entry point application code should use for
    /// restore: it composes validation, seed derivation, and public-key
    /// derivation in the correct order.
    pub fn derive_identity_from_phrase(phrase: &str) -> Result<KeyPair> {
        let parsed = Self::parse(phrase)?;
        let private_key = parsed.derive_private_key()?;
        CurveEngine::new().keypair_from_private_key(&private_key)
    }

    /// Check if a single word is in the BIP39 wordlist
    pub fn is_valid_word(word: &str) -> bool {
        let word_lower = word.to_lowercase();
        Language::English
            .word_list()
            .iter()
            .any(|w| *w == word_lower)
    }

    /// Get word suggestions for autocomplete
    ///
    /// Returns wordlist entries starting with the given prefix, capped at
    /// ten. A linear scan is fine: the list is 2048 static words.
    pub fn suggest_words(prefix: &str) -> Vec<&'static str> {
        if prefix.is_empty() {
            return vec![];
        }

        let prefix_lower = prefix.to_lowercase();
        let mut suggestions = Vec::new();

        for word in Language::English.word_list().iter() {
            if word.starts_with(&prefix_lower) {
                suggestions.push(*word);
                if suggestions.len() >= MAX_SUGGESTIONS {
                    break;
                }
            }
        }

        suggestions
    }
}

// Prevent accidental logging
impl std::fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoveryPhrase([REDACTED])")
    }
}

/// Trim, lowercase, and collapse internal whitespace.
fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Valid BIP39 test phrase (DO NOT USE FOR REAL!)
    const TEST_PHRASE_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_12_words() {
        let phrase = RecoveryPhrase::generate(PhraseStrength::Words12).unwrap();
        assert_eq!(phrase.words().len(), 12);
    }

    #[test]
    fn test_generate_24_words() {
        let phrase = RecoveryPhrase::generate(PhraseStrength::Words24).unwrap();
        assert_eq!(phrase.words().len(), 24);
    }

    #[test]
    fn test_parse_valid_phrase() {
        let phrase = RecoveryPhrase::parse(TEST_PHRASE_12).unwrap();
        assert_eq!(phrase.words().len(), 12);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let messy =
            "  Abandon ABANDON  abandon\tabandon abandon abandon abandon abandon abandon abandon abandon About ";
        let phrase = RecoveryPhrase::parse(messy).unwrap();
        assert_eq!(phrase.phrase(), TEST_PHRASE_12);
    }

    #[test]
    fn test_validate_rejects_out_of_list_word() {
        let invalid = TEST_PHRASE_12.replace("about", "notaword");
        assert!(!RecoveryPhrase::validate(&invalid));
    }

    #[test]
    fn test_validate_rejects_bad_checksum() {
        // Swapping the final word for another list word breaks the checksum
        let corrupted = TEST_PHRASE_12.replace("about", "zoo");
        assert!(!RecoveryPhrase::validate(corrupted.as_str()));
    }

    #[test]
    fn test_single_word_mutations_mostly_rejected() {
        // 24-word phrases carry an 8-bit checksum, so a random single-word
        // swap survives validation with probability ~1/256.
        let phrase = RecoveryPhrase::generate(PhraseStrength::Words24).unwrap();
        let words = phrase.words();

        let mut rejected = 0;
        for i in 0..words.len() {
            let mut mutated = words.clone();
            mutated[i] = if mutated[i] == "abandon" { "zoo" } else { "abandon" };
            if !RecoveryPhrase::validate(&mutated.join(" ")) {
                rejected += 1;
            }
        }

        assert!(rejected >= words.len() - 2, "only {} rejected", rejected);
    }

    #[test]
    fn test_wrong_word_count_rejected() {
        assert!(!RecoveryPhrase::validate("abandon abandon abandon"));
    }

    #[test]
    fn test_derivation_deterministic() {
        let kp1 = RecoveryPhrase::derive_identity_from_phrase(TEST_PHRASE_12).unwrap();
        let kp2 = RecoveryPhrase::derive_identity_from_phrase(TEST_PHRASE_12).unwrap();

        assert_eq!(kp1.private_key_hex(), kp2.private_key_hex());
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
    }

    #[test]
    fn test_different_phrases_different_keys() {
        let p1 = RecoveryPhrase::generate(PhraseStrength::Words12).unwrap();
        let p2 = RecoveryPhrase::generate(PhraseStrength::Words12).unwrap();

        let k1 = RecoveryPhrase::derive_identity_from_phrase(&p1.phrase()).unwrap();
        let k2 = RecoveryPhrase::derive_identity_from_phrase(&p2.phrase()).unwrap();

        assert_ne!(k1.public_key_hex(), k2.public_key_hex());
    }

    #[test]
    fn test_derive_from_garbage_fails() {
        let result = RecoveryPhrase::derive_identity_from_phrase("complete garbage input");
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_phrase_roundtrip() {
        let phrase = RecoveryPhrase::generate(PhraseStrength::Words24).unwrap();
        let restored = RecoveryPhrase::parse(&phrase.phrase()).unwrap();

        assert_eq!(
            restored.derive_private_key().unwrap(),
            phrase.derive_private_key().unwrap()
        );
    }

    #[test]
    fn test_is_valid_word() {
        assert!(RecoveryPhrase::is_valid_word("abandon"));
        assert!(RecoveryPhrase::is_valid_word("Zoo"));
        assert!(!RecoveryPhrase::is_valid_word("notaword"));
    }

    #[test]
    fn test_suggest_words() {
        let suggestions = RecoveryPhrase::suggest_words("ab");
        assert!(suggestions.contains(&"abandon"));
        assert!(suggestions.contains(&"ability"));
        assert!(suggestions.len() <= MAX_SUGGESTIONS);

        assert!(RecoveryPhrase::suggest_words("").is_empty());
        assert!(RecoveryPhrase::suggest_words("zzz").is_empty());
    }

    #[test]
    fn test_debug_redacts() {
        let phrase = RecoveryPhrase::parse(TEST_PHRASE_12).unwrap();
        let debug = format!("{:?}", phrase);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("abandon"));
    }
}
