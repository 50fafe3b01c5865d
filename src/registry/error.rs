//! Registry error types

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// System-wide subscriber cap reached; new connections are rejected,
    /// existing ones are unaffected
    CapacityExceeded {
        /// The configured cap that was hit
        limit: usize,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::CapacityExceeded { limit } => {
                write!(f, "Subscriber capacity exceeded: {}", limit)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
