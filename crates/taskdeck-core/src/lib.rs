pub mod config;
pub mod filter;
pub mod stats;
pub mod store;
pub mod task;
