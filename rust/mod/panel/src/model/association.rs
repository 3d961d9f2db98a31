use serde::{Deserialize, Serialize};

use super::Position;
use super::product::default_true;

/// Placement of one product on one panel.
///
/// Nothing in storage stops two associations of the same panel from
/// sharing a position; collisions are surfaced by conflict detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPanelAssociation {
    pub id: String,
    pub product_id: String,
    pub panel_id: String,

    /// `None` means unplaced; unplaced associations never conflict.
    #[serde(default)]
    pub position: Option<Position>,

    /// Attach order within the panel, starting at 1. Placements sharing a
    /// position are ordered by it, so the earliest one owns the grid slot.
    /// Zero for records written before it existed.
    #[serde(default)]
    pub seq: u64,

    /// Hidden associations stay attached but are not rendered on the TV.
    #[serde(default = "default_true")]
    pub active_in_panel: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

impl ProductPanelAssociation {
    /// Bare association, handy for building edit-session snapshots.
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        panel_id: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            panel_id: panel_id.into(),
            position,
            seq: 0,
            active_in_panel: true,
            create_at: None,
            update_at: None,
        }
    }
}
