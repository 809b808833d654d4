pub mod admin;
pub mod config;
pub mod content_cache;
pub mod logger;
pub mod model;
pub mod ownership;
pub mod query;
pub mod render;
pub mod server;
pub mod store;
pub mod util;
pub mod visits;
mod paginator;
mod query_string;
mod text_utils;
mod view;

#[cfg(test)]
mod test_data;
