pub mod feed;
pub mod health;
pub mod sitemap;
pub mod website;
