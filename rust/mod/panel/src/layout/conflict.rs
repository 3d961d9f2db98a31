//! Position conflict detection.
//!
//! A conflict is a position claimed by more than one product. Detection is
//! a pure function of a products/associations snapshot; the debounced
//! consumer lives in [`crate::monitor`].

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{
    Position, PositionConflict, Product, ProductPanelAssociation, ProductSummary, Severity,
};

/// Department label for products that have none.
pub const NO_DEPARTMENT: &str = "No department";

/// Report every position claimed by more than one product.
///
/// Associations without a position are unplaced and never conflict.
/// Associations whose product is missing from `products` are skipped.
/// Conflicts come out in the order their position was first seen; products
/// within a conflict keep association order. Positions are not bounded to
/// the display grid.
pub fn detect_conflicts(
    products: &[Product],
    associations: &[ProductPanelAssociation],
) -> Vec<PositionConflict> {
    let mut by_id: HashMap<&str, &Product> = HashMap::with_capacity(products.len());
    for product in products {
        by_id.entry(product.id.as_str()).or_insert(product);
    }

    // Insertion-ordered position -> products.
    let mut slots: Vec<(Position, Vec<ProductSummary>)> = Vec::new();
    let mut index: HashMap<Position, usize> = HashMap::new();

    for association in associations {
        let Some(position) = association.position else {
            continue;
        };
        let Some(product) = by_id.get(association.product_id.as_str()) else {
            continue;
        };

        let slot = *index.entry(position).or_insert_with(|| {
            slots.push((position, Vec::new()));
            slots.len() - 1
        });
        slots[slot].1.push(summarize(product));
    }

    slots
        .into_iter()
        .filter(|(_, claimants)| claimants.len() > 1)
        .map(|(position, products)| PositionConflict {
            position,
            products,
            severity: Severity::Error,
        })
        .collect()
}

/// Conflicts among the associations of a single panel.
pub fn detect_panel_conflicts(
    products: &[Product],
    associations: &[ProductPanelAssociation],
    panel_id: &str,
) -> Vec<PositionConflict> {
    let on_panel: Vec<ProductPanelAssociation> = associations
        .iter()
        .filter(|a| a.panel_id == panel_id)
        .cloned()
        .collect();
    detect_conflicts(products, &on_panel)
}

fn summarize(product: &Product) -> ProductSummary {
    ProductSummary {
        id: product.id.clone(),
        name: product.name.clone(),
        code: product.code.clone(),
        department: product
            .department
            .clone()
            .unwrap_or_else(|| NO_DEPARTMENT.to_string()),
    }
}

/// The outcome of one detection run, with the lookups the editing UI needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub conflicts: Vec<PositionConflict>,
}

impl ConflictReport {
    pub fn detect(products: &[Product], associations: &[ProductPanelAssociation]) -> Self {
        Self {
            conflicts: detect_conflicts(products, associations),
        }
    }

    pub fn for_position(&self, position: Position) -> Vec<&PositionConflict> {
        self.conflicts
            .iter()
            .filter(|c| c.position == position)
            .collect()
    }

    pub fn for_product(&self, product_id: &str) -> Vec<&PositionConflict> {
        self.conflicts
            .iter()
            .filter(|c| c.involves(product_id))
            .collect()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Number of colliding products, counted once per conflict they are in.
    pub fn total_conflicts(&self) -> usize {
        self.conflicts.iter().map(|c| c.products.len()).sum()
    }
}
