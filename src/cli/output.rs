//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::AssemblyFailed {
            correlation_id,
            source,
        } => format!(
            "error: assembly failed for '{}' (primary record unavailable: {})",
            correlation_id, source
        ),
        other => format!("error: {}", other),
    }
}
