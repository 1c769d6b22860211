//! Token metadata types.

use serde::{Deserialize, Serialize};

/// Contents of `/metadata/{id}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Always `/metadata/{id}.png` on the metadata host. Any `image` field in
    /// the JSON document is replaced when fetched.
    #[serde(default)]
    pub image: String,
}

/// A token id with its metadata, as listed by the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub token_id: u64,
    pub metadata: TokenMetadata,
}
