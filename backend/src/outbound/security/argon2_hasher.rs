//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so
//! the salt and the work factor travel with the digest. Verification reads
//! them back from the stored string, which lets operators raise the work
//! factor without invalidating existing passwords.

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::PasswordDigest;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted Argon2id hasher with a configurable work factor.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Build a hasher, rejecting parameters Argon2 cannot use.
    ///
    /// # Errors
    /// Returns [`CredentialHashError::Hashing`] when the parameters are out of
    /// range, for example a memory cost below `8 * parallelism` KiB.
    pub fn new(params: HashingParams) -> Result<Self, CredentialHashError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, secret: &str) -> Result<PasswordDigest, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(&self, secret: &str, digest: &PasswordDigest) -> Result<bool, CredentialHashError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| CredentialHashError::malformed(err.to_string()))?;
        match self.argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::malformed(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::new(HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("cheap test parameters are valid")
    }

    #[rstest]
    fn digest_verifies_against_its_secret(hasher: Argon2CredentialHasher) {
        let digest = hasher.hash("correct horse").expect("hash");
        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &digest).expect("verify"));
    }

    #[rstest]
    fn other_secrets_do_not_verify(hasher: Argon2CredentialHasher) {
        let digest = hasher.hash("correct horse").expect("hash");
        assert!(!hasher.verify("battery staple", &digest).expect("verify"));
    }

    #[rstest]
    fn same_secret_gets_fresh_salt(hasher: Argon2CredentialHasher) {
        let first = hasher.hash("pw1").expect("hash");
        let second = hasher.hash("pw1").expect("hash");
        assert_ne!(first, second);
        assert!(hasher.verify("pw1", &first).expect("verify first"));
        assert!(hasher.verify("pw1", &second).expect("verify second"));
    }

    #[rstest]
    #[case("")]
    #[case("plaintext")]
    fn malformed_digest_is_an_error_not_a_mismatch(
        hasher: Argon2CredentialHasher,
        #[case] stored: &str,
    ) {
        let result = hasher.verify("pw1", &PasswordDigest::new(stored));
        assert!(matches!(result, Err(CredentialHashError::Malformed { .. })));
    }

    #[rstest]
    fn digests_from_other_work_factors_still_verify(hasher: Argon2CredentialHasher) {
        let stronger = Argon2CredentialHasher::new(HashingParams {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .expect("valid parameters");
        let digest = stronger.hash("pw1").expect("hash");
        assert!(hasher.verify("pw1", &digest).expect("verify"));
    }

    #[rstest]
    fn unusable_parameters_are_rejected() {
        let result = Argon2CredentialHasher::new(HashingParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(CredentialHashError::Hashing { .. })));
    }
}
