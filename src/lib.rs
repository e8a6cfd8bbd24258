pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod query;
pub mod saved;
pub mod shutdown;
