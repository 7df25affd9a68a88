pub mod config;
pub mod error;
pub mod services;

// Re-export specific items if needed for convenient access
pub use config::ClientConfig;
pub use error::ApiError;
pub use services::http::{ApiClient, Transport};
