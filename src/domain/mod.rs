pub mod feed;
pub mod sitemap;
pub mod website;
