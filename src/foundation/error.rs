/// Result alias used across the crate.
pub type QuadwarpResult<T> = Result<T, QuadwarpError>;

/// Errors surfaced by region replacement.
///
/// Every failure mode of a run maps to one variant so callers can tell an unreadable input apart
/// from a bad quadrilateral or a broken output.
#[derive(thiserror::Error, Debug)]
pub enum QuadwarpError {
    /// The source video could not be opened, probed, or has no frames.
    #[error("unreadable video: {0}")]
    UnreadableVideo(String),

    /// The overlay image could not be read or decoded.
    #[error("unreadable image: {0}")]
    UnreadableImage(String),

    /// The destination points do not span a proper quadrilateral.
    #[error("degenerate quadrilateral: {0}")]
    DegenerateQuadrilateral(String),

    /// The output could not be opened, or a frame write or finalize step failed.
    #[error("write failure: {0}")]
    WriteFailure(String),

    /// Malformed job input or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error carrying its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuadwarpError {
    /// Build an [`QuadwarpError::UnreadableVideo`].
    pub fn unreadable_video(msg: impl Into<String>) -> Self {
        Self::UnreadableVideo(msg.into())
    }

    /// Build an [`QuadwarpError::UnreadableImage`].
    pub fn unreadable_image(msg: impl Into<String>) -> Self {
        Self::UnreadableImage(msg.into())
    }

    /// Build a [`QuadwarpError::DegenerateQuadrilateral`].
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateQuadrilateral(msg.into())
    }

    /// Build a [`QuadwarpError::WriteFailure`].
    pub fn write_failure(msg: impl Into<String>) -> Self {
        Self::WriteFailure(msg.into())
    }

    /// Build a [`QuadwarpError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
