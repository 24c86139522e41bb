// src/entity/link.rs
use serde::{Deserialize, Serialize};

/// A directed link between two note titles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn is_self_link(&self) -> bool {
        self.source == self.target
    }
}
