//! Error types for the semantic-query engine
//!
//! Queries in this crate are advisory and answer with `Option`/empty
//! results on bad input. A true error value crosses the boundary in only
//! two places: the typed cache (programming-sequence mistakes) and the
//! frontend analysis boundary (partial results, panics).

use thiserror::Error;

/// Main error type for semantic-engine operations
#[derive(Error, Debug, Clone)]
pub enum SemaError {
    /// A typed cache was queried before a builder was registered for its
    /// kind. Recoverable: register the builder and retry.
    #[error("no cache builder registered for kind '{kind}'")]
    UnknownCacheKind { kind: &'static str },

    /// A registered cache builder returned an error for a key.
    #[error("cache builder for kind '{kind}' failed on '{key}': {reason}")]
    CacheBuildFailed {
        kind: &'static str,
        key: String,
        reason: String,
    },

    /// The frontend oracle reported a parse/type-check failure. A partial
    /// semantic bundle may still have been produced alongside this.
    #[error("frontend analysis failed: {reason}")]
    AnalysisFailed { reason: String },

    /// The frontend oracle panicked; the panic was contained at the
    /// analysis boundary and converted into this error.
    #[error("frontend panicked during analysis: {message}")]
    FrontendPanic { message: String },
}

impl SemaError {
    /// True for the query-before-init sentinel, which callers recover from
    /// by registering the missing builder and retrying.
    pub fn is_unknown_cache_kind(&self) -> bool {
        matches!(self, Self::UnknownCacheKind { .. })
    }
}

/// Result type alias for semantic-engine operations
pub type SemaResult<T> = Result<T, SemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cache_kind_is_distinguished() {
        let err = SemaError::UnknownCacheKind { kind: "docs" };
        assert!(err.is_unknown_cache_kind());

        let err = SemaError::CacheBuildFailed {
            kind: "docs",
            key: "main.gop".to_string(),
            reason: "boom".to_string(),
        };
        assert!(!err.is_unknown_cache_kind());
    }

    #[test]
    fn error_messages_name_the_kind() {
        let err = SemaError::UnknownCacheKind { kind: "outline" };
        assert!(err.to_string().contains("outline"));
    }
}
