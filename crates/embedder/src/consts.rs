//! Internal constants for embedding.

/// Prefix of every cache key and the name used in error banners.
pub const NAMESPACE: &str = "remark-embedder";
