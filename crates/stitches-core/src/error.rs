use thiserror::Error;

#[derive(Debug, Error)]
pub enum StitchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid sprite '{name}': {reason}")]
    InvalidSprite { name: String, reason: String },
    #[error("Duplicate sprite name '{0}'")]
    DuplicateName(String),
    #[error("Sprite '{name}' could not be placed after {passes} canvas growth passes")]
    PlacementExhausted { name: String, passes: u32 },
    #[error("Placement of '{0}' was cancelled")]
    Cancelled(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl StitchError {
    /// True for errors reported per sprite rather than aborting a run.
    pub fn is_per_sprite(&self) -> bool {
        matches!(
            self,
            Self::InvalidSprite { .. }
                | Self::DuplicateName(_)
                | Self::PlacementExhausted { .. }
                | Self::Cancelled(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StitchError>;
