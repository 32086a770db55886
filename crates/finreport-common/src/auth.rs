//! Salted credential digests for the report delivery gate.

use sha2::{Digest, Sha256};

/// Computes the salted digest of a secret: the hex SHA-256 of the secret is
/// concatenated with the salt and hashed again. Pure function of its inputs.
pub fn salted_digest(secret: &str, salt: &str) -> String {
    let inner = hex::encode(Sha256::digest(secret.as_bytes()));
    let outer = Sha256::digest(format!("{inner}{salt}").as_bytes());
    hex::encode(outer)
}

/// Precomputed gate credentials: a salt plus the expected salted digest.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Salt mixed into the digest.
    pub salt: String,
    /// Expected digest of the correct credential.
    pub digest: String,
}

impl GateConfig {
    /// Builds a gate from a plaintext secret and a salt.
    pub fn from_secret(secret: &str, salt: &str) -> Self {
        Self {
            salt: salt.to_string(),
            digest: salted_digest(secret, salt),
        }
    }

    /// Checks a supplied credential against the expected digest. The result
    /// does not reveal which part of the comparison failed.
    pub fn verify(&self, supplied: &str) -> bool {
        salted_digest(supplied, &self.salt) == self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = salted_digest("hunter2", "pepper");
        let b = salted_digest("hunter2", "pepper");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_digest_varies_with_salt() {
        assert_ne!(salted_digest("hunter2", "a"), salted_digest("hunter2", "b"));
    }

    #[test]
    fn test_gate_accepts_correct_secret() {
        let gate = GateConfig::from_secret("myStrongPassword123!", "0ab1");
        assert!(gate.verify("myStrongPassword123!"));
    }

    #[test]
    fn test_gate_rejects_wrong_secret() {
        let gate = GateConfig::from_secret("myStrongPassword123!", "0ab1");
        assert!(!gate.verify("guess"));
        assert!(!gate.verify(""));
    }
}
