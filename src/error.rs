//! Error taxonomy for the atlas pipeline.
//!
//! The categories deliberately stay apart so callers can route them:
//! transport failures are retry-targetable, validation failures are not,
//! and a join-quality failure is a hard build gate that must abort the
//! pipeline run rather than ship a map with a collapsed join.

use thiserror::Error;

/// All recoverable failure modes of the pipeline and loaders.
///
/// Per-field numeric parse failures are NOT errors: sparse source
/// coverage is expected, so malformed numerics degrade to `None` inside
/// the parsers instead of surfacing here.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Fetch/read failure. Distinct from validation so a retry policy
    /// can target only transport problems.
    #[error("transport error fetching {what}: {message}")]
    Transport { what: String, message: String },

    /// A value file or document violated its shape/range contract.
    /// Never silently coerced.
    #[error("validation error: {what}: {message}")]
    Validation { what: String, message: String },

    /// Join match rate fell below the configured minimum. Names both
    /// rates so the build log explains itself.
    #[error(
        "match rate {:.1}% is below minimum {:.1}%",
        .match_rate * 100.0,
        .min_match_rate * 100.0
    )]
    JoinQuality { match_rate: f64, min_match_rate: f64 },

    /// A source document was structurally unusable (missing collection,
    /// truncated geometry, unreadable JSON).
    #[error("malformed {what}: {message}")]
    MalformedInput { what: String, message: String },
}

impl AtlasError {
    pub fn validation(what: impl Into<String>, message: impl Into<String>) -> Self {
        AtlasError::Validation {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn transport(what: impl Into<String>, message: impl Into<String>) -> Self {
        AtlasError::Transport {
            what: what.into(),
            message: message.into(),
        }
    }

    /// True for errors a retry policy is allowed to act on.
    pub fn is_transport(&self) -> bool {
        matches!(self, AtlasError::Transport { .. })
    }
}
