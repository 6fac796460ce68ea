//! Error taxonomy for the cart store.
//!
//! [`StoreError`] is the only error type surfaced across the component
//! boundary. Transport errors and corrupt stored records both fold into
//! [`StoreError::Unavailable`]; callers map it to their own status codes and
//! must not try to distinguish finer-grained causes. The underlying cause is
//! kept as the error source for diagnostics.

use boutique_cart_core::CodecError;
use thiserror::Error;

/// Boxed underlying cause, kept for diagnostics only.
type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by cart store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connect retry budget was exhausted without a live connection.
    ///
    /// Raised at store construction (eager first connect) or when a failure
    /// episode outlasts the whole retry schedule. Fatal at construction: it
    /// propagates as a startup failure to the owning process.
    #[error("unable to connect to the backing store after {attempts} attempts")]
    ConnectionUnavailable {
        /// Number of connection attempts made before giving up.
        attempts: u32,
        /// The last connection failure.
        #[source]
        source: Cause,
    },

    /// Cart storage could not be accessed for this operation.
    ///
    /// Covers in-flight transport failures and corrupt stored records alike;
    /// the store never masks an access failure by returning an empty cart.
    #[error("can't access cart storage")]
    Unavailable(#[source] Cause),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Unavailable(Box::new(err))
    }
}

impl From<CodecError> for StoreError {
    fn from(err: CodecError) -> Self {
        // A corrupt record is operationally indistinguishable from an
        // inaccessible store and must not present as an empty cart.
        Self::Unavailable(Box::new(err))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn corrupt_record_folds_into_unavailable() {
        let codec_err = boutique_cart_core::decode(b"not a cart").unwrap_err();
        let err = StoreError::from(codec_err);

        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(err.to_string(), "can't access cart storage");
        // The cause stays reachable for diagnostics.
        assert!(
            err.source()
                .unwrap()
                .to_string()
                .starts_with("corrupt cart record")
        );
    }

    #[test]
    fn connection_unavailable_reports_attempts() {
        let err = StoreError::ConnectionUnavailable {
            attempts: 30,
            source: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "unable to connect to the backing store after 30 attempts"
        );
    }
}
