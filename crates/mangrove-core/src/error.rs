pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported path style: {value}")]
    UnsupportedPathStyle { value: String },

    #[error("Unsupported orientation: {value}")]
    UnsupportedOrientation { value: String },

    #[error("style config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
