//! Password verification capability.

use async_trait::async_trait;

use crate::StoreResult;

/// Verifies a plain-text password against a stored hash.
///
/// The hashing scheme is chosen by the caller; the store only looks up the
/// stored hash and delegates the comparison.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Returns true if `plain` matches `hash`.
    async fn verify(&self, plain: &str, hash: &str) -> StoreResult<bool>;
}

#[async_trait]
impl<F> PasswordVerifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    async fn verify(&self, plain: &str, hash: &str) -> StoreResult<bool> {
        Ok(self(plain, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_verifier() {
        let verifier = |plain: &str, hash: &str| format!("hashed:{plain}") == hash;
        assert!(tokio_test::block_on(verifier.verify("secret", "hashed:secret")).unwrap());
        assert!(!tokio_test::block_on(verifier.verify("wrong", "hashed:secret")).unwrap());
    }
}
