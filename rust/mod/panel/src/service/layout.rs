use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tvpanel_core::ServiceError;

use super::PanelService;
use super::association::sort_placements;
use crate::layout::{
    ConflictReport, PanelStats, PositionCheck, PositionalGrid, check_position,
    create_positional_grid, organize_by_position, suggest_available_positions,
    suggest_next_position,
};
use crate::model::{PanelProduct, Position, Product, ProductPanelAssociation};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePositionRequest {
    #[serde(default)]
    pub position: Option<Position>,
    pub product_id: String,
    #[serde(default)]
    pub ignore_association_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSuggestions {
    pub available: Vec<Position>,
    pub next: Position,
}

impl PanelService {
    /// Placements of a panel at the position the TV will use: their own,
    /// or the product's default when unplaced. Same order as
    /// [`PanelService::list_panel_associations`], by effective position.
    fn effective_placements(
        &self,
        panel_id: &str,
    ) -> Result<(Vec<Product>, Vec<ProductPanelAssociation>), ServiceError> {
        let mut placements = self.list_panel_associations(panel_id)?;
        let products = self.products.all()?;
        let defaults: HashMap<&str, Position> = products
            .iter()
            .filter_map(|p| p.position.map(|pos| (p.id.as_str(), pos)))
            .collect();

        for placement in placements.iter_mut().filter(|a| a.position.is_none()) {
            placement.position = defaults.get(placement.product_id.as_str()).copied();
        }
        sort_placements(&mut placements);
        Ok((products, placements))
    }

    pub fn panel_conflicts(&self, panel_id: &str) -> Result<ConflictReport, ServiceError> {
        let (products, placements) = self.effective_placements(panel_id)?;
        Ok(ConflictReport::detect(&products, &placements))
    }

    pub fn validate_position(
        &self,
        panel_id: &str,
        request: &ValidatePositionRequest,
    ) -> Result<PositionCheck, ServiceError> {
        let (_, placements) = self.effective_placements(panel_id)?;
        Ok(check_position(
            request.position,
            &request.product_id,
            &placements,
            request.ignore_association_id.as_deref(),
        ))
    }

    pub fn suggest_positions(
        &self,
        panel_id: &str,
        limit: usize,
    ) -> Result<PositionSuggestions, ServiceError> {
        let (_, placements) = self.effective_placements(panel_id)?;
        Ok(PositionSuggestions {
            available: suggest_available_positions(&placements, limit),
            next: suggest_next_position(&placements),
        })
    }

    /// Visible placements of a panel joined with their products.
    ///
    /// Hidden placements and placements whose product is gone are left
    /// out; inactive products are kept so callers can count them.
    pub fn panel_products(&self, panel_id: &str) -> Result<Vec<PanelProduct>, ServiceError> {
        let (products, placements) = self.effective_placements(panel_id)?;
        let products: HashMap<String, Product> =
            products.into_iter().map(|p| (p.id.clone(), p)).collect();

        Ok(placements
            .iter()
            .filter(|a| a.active_in_panel)
            .filter_map(|a| {
                products
                    .get(&a.product_id)
                    .map(|p| PanelProduct::from_association(p, a))
            })
            .collect())
    }

    pub fn panel_grid(&self, panel_id: &str) -> Result<PositionalGrid, ServiceError> {
        let products = self.panel_products(panel_id)?;
        Ok(create_positional_grid(&organize_by_position(&products)))
    }

    pub fn panel_stats(&self, panel_id: &str) -> Result<PanelStats, ServiceError> {
        Ok(PanelStats::from_products(&self.panel_products(panel_id)?))
    }
}
