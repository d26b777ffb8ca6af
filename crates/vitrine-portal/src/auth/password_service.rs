//! Password Authentication Service
//!
//! Salted scrypt credential hashing. The stored format is
//! `hex(hash) + "." + hex(salt)`, with a fresh 16-byte salt per credential.

use rand::RngCore;
use scrypt::Params;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::shared::error::{PortalError, Result};

const HASH_LEN: usize = 64;
const SALT_LEN: usize = 16;

/// scrypt cost configuration
#[derive(Debug, Clone)]
pub struct ScryptConfig {
    /// log2 of the CPU/memory cost (default: 14 -> N = 16384)
    pub log_n: u8,
    /// Block size (default: 8)
    pub r: u32,
    /// Parallelism (default: 1)
    pub p: u32,
}

impl Default for ScryptConfig {
    fn default() -> Self {
        Self { log_n: 14, r: 8, p: 1 }
    }
}

impl ScryptConfig {
    /// Low-cost config for testing (faster but less secure)
    pub fn testing() -> Self {
        Self { log_n: 8, r: 8, p: 1 }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(self.log_n, self.r, self.p, HASH_LEN)
            .map_err(|e| PortalError::internal(format!("Invalid scrypt params: {}", e)))
    }
}

/// Password authentication service
pub struct PasswordService {
    config: ScryptConfig,
}

impl PasswordService {
    pub fn new(config: ScryptConfig) -> Self {
        Self { config }
    }

    /// Hash a password with a freshly generated salt.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let hash = self.derive(password, &salt)?;
        Ok(format!("{}.{}", hex::encode(hash), salt))
    }

    /// Verify a password against a stored `hash.salt` value.
    ///
    /// Comparison is constant-time; malformed stored values verify as false.
    pub fn verify_password(&self, password: &str, stored: &str) -> Result<bool> {
        let Some((hash_hex, salt)) = stored.split_once('.') else {
            warn!("Stored credential is not in hash.salt form");
            return Ok(false);
        };

        let Ok(stored_hash) = hex::decode(hash_hex) else {
            warn!("Stored credential hash is not valid hex");
            return Ok(false);
        };

        if stored_hash.len() != HASH_LEN {
            return Ok(false);
        }

        let computed = self.derive(password, salt)?;
        Ok(computed.ct_eq(stored_hash.as_slice()).into())
    }

    fn derive(&self, password: &str, salt: &str) -> Result<[u8; HASH_LEN]> {
        let params = self.config.to_params()?;
        let mut output = [0u8; HASH_LEN];
        scrypt::scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut output)
            .map_err(|e| PortalError::internal(format!("Failed to hash password: {}", e)))?;
        Ok(output)
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(ScryptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(ScryptConfig::testing())
    }

    #[test]
    fn test_hash_format() {
        let stored = service().hash_password("secret").unwrap();
        let (hash_hex, salt) = stored.split_once('.').unwrap();

        assert_eq!(hex::decode(hash_hex).unwrap().len(), HASH_LEN);
        assert_eq!(hex::decode(salt).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let stored = service.hash_password("correct horse").unwrap();

        assert!(service.verify_password("correct horse", &stored).unwrap());
        assert!(!service.verify_password("wrong horse", &stored).unwrap());
    }

    #[test]
    fn test_salt_uniqueness() {
        let service = service();
        let a = service.hash_password("same password").unwrap();
        let b = service.hash_password("same password").unwrap();

        assert_ne!(a, b);
        assert!(service.verify_password("same password", &a).unwrap());
        assert!(service.verify_password("same password", &b).unwrap());
    }

    #[test]
    fn test_malformed_stored_value_verifies_false() {
        let service = service();
        assert!(!service.verify_password("x", "no-dot-here").unwrap());
        assert!(!service.verify_password("x", "nothex!.cafe").unwrap());
        assert!(!service.verify_password("x", "deadbeef.cafe").unwrap());
    }
}
