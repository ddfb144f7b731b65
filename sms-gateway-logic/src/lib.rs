pub mod error;
pub mod metrics;
pub mod queue;
pub mod repository;
pub mod sender;
pub mod services;
pub mod settings;
pub mod types;
pub mod workers;
