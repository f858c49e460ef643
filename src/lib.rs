pub mod config;
pub mod data_loader;
pub mod error;
pub mod filter;
pub mod filter_options;
pub mod http_client;
pub mod lenient;
pub mod logging;
pub mod render;
pub mod state;
