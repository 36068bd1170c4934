pub mod client;
pub mod error;
pub mod types;

pub use client::BackendApiClient;
pub use error::ApiClientError;
