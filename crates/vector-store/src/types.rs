use serde::{Deserialize, Serialize};

/// A keyed vector held by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub key: String,
    pub vector: Vec<f32>,
}

/// One ranked search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMatch {
    pub key: String,
    pub score: f32,
}
