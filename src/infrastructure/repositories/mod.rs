pub mod cursor;
pub mod website_repository;

pub use website_repository::WebsiteRepository;
