use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum FeedServiceError {
    #[error("feed session not found or expired")]
    SessionNotFound,
}

impl From<FeedServiceError> for AppError {
    fn from(err: FeedServiceError) -> Self {
        match err {
            FeedServiceError::SessionNotFound => {
                AppError::NotFound("Feed session not found".to_string())
            }
        }
    }
}
