pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::WebsiteServiceError;
pub use model::{CategoryCount, PageCursor, SitemapRow, SortOrder, Website, WebsitePage};
pub use service::{WebsiteService, WebsiteServiceApi};
pub use store::WebsiteStore;
