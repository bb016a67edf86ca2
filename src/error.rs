use thiserror::Error;

/// Broken scene-graph contracts. These indicate a programming error, not a
/// condition the frame loop is expected to recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Failures surfaced by a frame's render step.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The presentation target went away (window closed, context lost).
    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("failed to save frame to '{path}': {reason}")]
    Save { path: String, reason: String },
}
