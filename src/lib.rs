pub mod api;
pub mod chart;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod normalizer;
pub mod page;
pub mod services;
pub mod stations;
