pub mod contracts;
pub mod errors;
pub mod models;
pub mod services;
