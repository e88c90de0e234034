//! Symmetric obfuscation of stored credential payloads.
//!
//! Values are XORed with a SHA-256 counter keystream derived from a
//! passphrase and base64-encoded. This keeps tokens out of casual view in
//! the storage backend; it is not encryption and offers no integrity.

use super::CredentialDomainError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use std::fmt;

/// Marker prepended to obfuscated values.
const OBFUSCATED_PREFIX: &str = "obf1:";

/// Passphrase-keyed obfuscator for stored values.
#[derive(Clone)]
pub struct Obfuscator {
    key: [u8; 32],
}

impl Obfuscator {
    /// Derives an obfuscator from a passphrase.
    #[must_use]
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: Sha256::digest(passphrase.as_bytes()).into(),
        }
    }

    /// Obfuscates a plain value.
    #[must_use]
    pub fn conceal(&self, plain: &str) -> String {
        let masked = self.apply_keystream(plain.as_bytes());
        format!("{OBFUSCATED_PREFIX}{}", STANDARD.encode(masked))
    }

    /// Recovers a plain value.
    ///
    /// Values without the obfuscation marker are returned unchanged, so a
    /// store written before obfuscation was enabled stays readable.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::CorruptStoredValue`] when the payload
    /// is not valid base64 or does not decode to UTF-8.
    pub fn reveal(&self, stored: &str) -> Result<String, CredentialDomainError> {
        let Some(encoded) = stored.strip_prefix(OBFUSCATED_PREFIX) else {
            return Ok(stored.to_owned());
        };
        let masked = STANDARD
            .decode(encoded)
            .map_err(|err| CredentialDomainError::CorruptStoredValue(err.to_string()))?;
        String::from_utf8(self.apply_keystream(&masked))
            .map_err(|err| CredentialDomainError::CorruptStoredValue(err.to_string()))
    }

    fn apply_keystream(&self, input: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(input.len());
        let mut counter: u64 = 0;
        for chunk in input.chunks(32) {
            let block = self.keystream_block(counter);
            output.extend(chunk.iter().zip(block.iter()).map(|(byte, pad)| byte ^ pad));
            counter += 1;
        }
        output
    }

    fn keystream_block(&self, counter: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(counter.to_string().as_bytes());
        hasher.finalize().into()
    }
}

impl fmt::Debug for Obfuscator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Obfuscator(<redacted>)")
    }
}
