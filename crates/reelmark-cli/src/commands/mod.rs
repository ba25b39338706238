pub mod config;
pub mod movies;
pub mod progress;
pub mod watchlist;
