pub mod cache;
pub mod price_feed;
