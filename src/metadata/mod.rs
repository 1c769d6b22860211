//! Token metadata served as static files next to the client.

pub mod client;
pub mod types;

pub use client::MetadataClient;
pub use types::{TokenMetadata, TokenView};
