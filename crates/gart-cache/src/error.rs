use thiserror::Error;

/// Validator store errors.
///
/// Read-side problems never surface through [`crate::ValidatorCache::get`];
/// they degrade to cold-start. Write-side problems are reported so the
/// caller can decide whether a missed cache update matters.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
