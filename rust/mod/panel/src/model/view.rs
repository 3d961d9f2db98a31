use serde::{Deserialize, Serialize};

use super::{Department, Panel, Position, Product, ProductPanelAssociation};

/// A product as the TV sees it: the association's position wins over the
/// product's default slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelProduct {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl PanelProduct {
    pub fn from_association(product: &Product, association: &ProductPanelAssociation) -> Self {
        Self {
            id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
            position: association.position.or(product.position),
            active: product.active,
            unit: product.unit.clone(),
        }
    }
}

/// Display settings delivered alongside the products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    /// Seconds between TV re-fetches. Zero means "client default".
    #[serde(default)]
    pub polling_interval: u64,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
}

/// Everything a TV needs to render one panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelView {
    pub panel: Panel,
    pub department: Department,
    pub products: Vec<PanelProduct>,
    pub config: PanelConfig,
}

impl PanelConfig {
    /// Title falls back to the upper-cased department name.
    pub fn for_panel(panel: &Panel, department: &Department) -> Self {
        let title = match panel.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => department.name.to_uppercase(),
        };
        Self {
            polling_interval: panel.polling_interval,
            title,
            subtitle: panel.subtitle.clone(),
            footer_text: panel.footer_text.clone(),
        }
    }
}
