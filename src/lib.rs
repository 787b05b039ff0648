pub mod analytics;
pub mod cli;
pub mod date_provider;
pub mod engine;
pub mod error;
pub mod profile;
pub mod recommendations;
pub mod report;
pub mod session;
pub mod spaced_repetition;
pub mod store;
pub mod store_factory;
pub mod time_format;
pub mod topic_performance;
