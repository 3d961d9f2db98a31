use serde::{Deserialize, Serialize};

use super::Position;

/// How serious a position conflict is.
///
/// Detection only produces `Error`; `Warning` exists for consumers that
/// want to downgrade conflicts they have acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The identifying fields of a product involved in a conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub code: String,
    pub department: String,
}

/// Two or more products claiming the same slot. Derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionConflict {
    pub position: Position,
    pub products: Vec<ProductSummary>,
    pub severity: Severity,
}

impl PositionConflict {
    pub fn involves(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }
}
