use thiserror::Error;

/// Error taxonomy for the dashboard pipeline.
///
/// Precondition and parse variants carry exact user-visible messages; the
/// web layer surfaces them verbatim.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("User has no niche set")]
    NoNiche,

    #[error("Need at least 3 analyzed posts to generate insights")]
    NotEnoughAnalyzedPosts,

    #[error("No insights available. Generate insights first by analyzing posts.")]
    NoInsights,

    /// `{0}` names the operation: "analysis", "insights", or "generation".
    #[error("Failed to parse {0} response")]
    ParseResponse(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
