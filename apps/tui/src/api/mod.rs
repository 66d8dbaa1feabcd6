// API module for crimewatch
// Wire types, response-envelope normalization, and the HTTP client.

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
