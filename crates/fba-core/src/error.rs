use thiserror::Error;

#[derive(Error, Debug)]
pub enum FbaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Reconstruction failed at pixel ({col}, {row}): no finite block contribution")]
    Reconstruction { row: usize, col: usize },

    #[error("Deblur cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, FbaError>;
