/// Access check guarding the full-table edit and export operations.
///
/// The shared-secret gate is a placeholder until a real credential check
/// replaces it; callers only depend on this trait.
pub trait AdminGate: Send + Sync {
    fn authorize(&self, credential: &str) -> Result<(), AdminError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("administration is disabled")]
    Disabled,
    #[error("invalid administrator credential")]
    Denied,
}

/// Rejects every request. Used when no secret is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAdminGate;

impl AdminGate for DisabledAdminGate {
    fn authorize(&self, _credential: &str) -> Result<(), AdminError> {
        Err(AdminError::Disabled)
    }
}

#[derive(Clone)]
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecretGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretGate").finish_non_exhaustive()
    }
}

impl AdminGate for SharedSecretGate {
    fn authorize(&self, credential: &str) -> Result<(), AdminError> {
        let expected = self.secret.as_bytes();
        let given = credential.as_bytes();
        // Compare every byte so the rejection time does not depend on the prefix match.
        let mismatch = expected.len() != given.len()
            || expected
                .iter()
                .zip(given)
                .fold(0u8, |acc, (left, right)| acc | (left ^ right))
                != 0;
        if mismatch {
            Err(AdminError::Denied)
        } else {
            Ok(())
        }
    }
}
