//! Environment variable access behind a trait so tests can inject values

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Look up a variable
    ///
    /// # Errors
    ///
    /// Returns `VarError::NotPresent` when the variable is unset.
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}
