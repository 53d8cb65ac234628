use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum WebsiteServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("website not found")]
    NotFound,
}

impl From<AppError> for WebsiteServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => WebsiteServiceError::NotFound,
            _ => WebsiteServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<WebsiteServiceError> for AppError {
    fn from(err: WebsiteServiceError) -> Self {
        match err {
            WebsiteServiceError::NotFound => AppError::NotFound("Website not found".to_string()),
            WebsiteServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
