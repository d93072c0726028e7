//! Salted password digests.
//!
//! Stored form is `<salt>$<sha256 hex>`. Plain passwords never reach storage
//! and digests never leave the repository layer through a read model.

use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derives a digest with a freshly generated salt.
    pub fn derive(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest_hex(&salt, password);
        Self(format!("{salt}${digest}"))
    }

    /// Wraps a digest loaded from storage without re-hashing it.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether `password` produces this digest.
    ///
    /// Malformed stored values never match.
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt, expected)) = self.0.split_once('$') else {
            return false;
        };
        let actual = digest_hex(salt, password);
        actual.len() == expected.len()
            && actual
                .bytes()
                .zip(expected.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

// Keeps digests out of debug output and logs.
impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
