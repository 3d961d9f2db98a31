use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use tvpanel_core::{ServiceError, new_id, now_rfc3339};

use super::PanelService;
use crate::layout::GRID_SLOTS;
use crate::model::{Position, ProductPanelAssociation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductsResult {
    pub added_count: usize,
}

fn parse_position(value: &serde_json::Value) -> Result<Option<Position>, ServiceError> {
    if value.is_null() {
        return Ok(None);
    }
    let position = value
        .as_i64()
        .ok_or_else(|| ServiceError::Validation("position must be an integer".into()))?;
    if !(1..=GRID_SLOTS as Position).contains(&position) {
        return Err(ServiceError::Validation(format!(
            "position must be between 1 and {GRID_SLOTS}"
        )));
    }
    Ok(Some(position))
}

pub(super) fn sort_placements(placements: &mut [ProductPanelAssociation]) {
    placements.sort_by(|a, b| {
        let key = |p: &ProductPanelAssociation| p.position.unwrap_or(Position::MAX);
        key(a)
            .cmp(&key(b))
            .then(a.seq.cmp(&b.seq))
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl PanelService {
    /// Placements of one panel, ordered by position (unplaced last).
    ///
    /// Placements sharing a position keep attach order (`seq`, then id), so
    /// the grid and conflict reports always favour the earlier placement.
    pub fn list_panel_associations(
        &self,
        panel_id: &str,
    ) -> Result<Vec<ProductPanelAssociation>, ServiceError> {
        self.panels.get(panel_id)?;
        let mut placements = self.associations.filter(|a| a.panel_id == panel_id)?;
        sort_placements(&mut placements);
        Ok(placements)
    }

    /// Attach products to a panel without a position.
    ///
    /// Unknown products and products already on the panel are skipped.
    pub fn add_products_to_panel(
        &self,
        panel_id: &str,
        product_ids: &[String],
    ) -> Result<AddProductsResult, ServiceError> {
        self.panels.get(panel_id)?;

        let existing = self.associations.filter(|a| a.panel_id == panel_id)?;
        let mut seq = existing.iter().map(|a| a.seq).max().unwrap_or(0);
        let mut attached: HashSet<String> = existing.into_iter().map(|a| a.product_id).collect();

        let now = now_rfc3339();
        let mut added_count = 0;
        for product_id in product_ids {
            if attached.contains(product_id) || !self.products.exists(product_id)? {
                debug!(panel = panel_id, product = %product_id, "skipping product");
                continue;
            }
            seq += 1;
            let mut placement = ProductPanelAssociation::new(new_id(), product_id.clone(), panel_id, None);
            placement.seq = seq;
            placement.create_at = Some(now.clone());
            placement.update_at = Some(now.clone());
            self.associations.insert(&placement)?;
            attached.insert(product_id.clone());
            added_count += 1;
        }

        info!(panel = panel_id, added_count, "products added to panel");
        Ok(AddProductsResult { added_count })
    }

    fn find_placement(
        &self,
        panel_id: &str,
        product_id: &str,
    ) -> Result<ProductPanelAssociation, ServiceError> {
        self.associations
            .filter(|a| a.panel_id == panel_id && a.product_id == product_id)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "product '{product_id}' is not on panel '{panel_id}'"
                ))
            })
    }

    /// Change a placement's `position` and/or `activeInPanel`.
    ///
    /// `position: null` unplaces the product. Collisions with other
    /// placements are allowed here; conflict detection reports them.
    pub fn update_association(
        &self,
        panel_id: &str,
        product_id: &str,
        patch: serde_json::Value,
    ) -> Result<ProductPanelAssociation, ServiceError> {
        let Some(fields) = patch.as_object() else {
            return Err(ServiceError::Validation("patch must be a JSON object".into()));
        };
        let mut placement = self.find_placement(panel_id, product_id)?;

        if let Some(value) = fields.get("position") {
            placement.position = parse_position(value)?;
        }
        if let Some(value) = fields.get("activeInPanel") {
            placement.active_in_panel = value
                .as_bool()
                .ok_or_else(|| ServiceError::Validation("activeInPanel must be a boolean".into()))?;
        }
        placement.update_at = Some(now_rfc3339());

        self.associations.put(&placement)?;
        debug!(
            panel = panel_id,
            product = product_id,
            position = ?placement.position,
            active = placement.active_in_panel,
            "placement updated"
        );
        Ok(placement)
    }

    pub fn remove_product_from_panel(&self, panel_id: &str, product_id: &str) -> Result<(), ServiceError> {
        let placement = self.find_placement(panel_id, product_id)?;
        self.associations.remove(&placement.id)?;
        info!(panel = panel_id, product = product_id, "product removed from panel");
        Ok(())
    }
}
