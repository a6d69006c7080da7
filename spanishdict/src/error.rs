use thiserror::Error;

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    /// No script tag on the page carried the component data assignment.
    #[error("could not find the component data script")]
    MissingComponentData,
    /// The component data did not deserialize; the error carries the path of
    /// the offending field.
    #[error("could not deserialize component data: {0}")]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),
}
