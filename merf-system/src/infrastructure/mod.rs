pub mod config;
mod repository;
mod service;
mod service_provider;
mod telemetry;

pub use service_provider::ServiceProvider;
pub use telemetry::initialize_telemetry;
