pub mod error;
pub mod loader;
pub mod model;
pub mod service;

pub use error::FeedServiceError;
pub use loader::{FeedLoader, PageRequest};
pub use model::{FeedPhase, FeedQueryRequest, FeedSessionResponse, FeedSnapshot};
pub use service::{FeedSessionApi, FeedSessionService};
