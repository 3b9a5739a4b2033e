//! Unified error type for the Vigil stack.

use vigil_lifecycle::LifecycleError;
use vigil_session::SessionError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `vigil` meta-crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant auto-generates `From` impls, so the `?` operator
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// A configuration error (startup-fatal).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A lifecycle-level error (invalid state, actor gone).
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A session-level error.
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::Missing("VIGIL_HOST");
        let vigil_err: VigilError = err.into();
        assert!(matches!(vigil_err, VigilError::Config(_)));
        assert!(vigil_err.to_string().contains("VIGIL_HOST"));
    }

    #[test]
    fn test_from_lifecycle_error() {
        let err = LifecycleError::Unavailable;
        let vigil_err: VigilError = err.into();
        assert!(matches!(vigil_err, VigilError::Lifecycle(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Timeout;
        let vigil_err: VigilError = err.into();
        assert!(matches!(vigil_err, VigilError::Session(_)));
    }
}
