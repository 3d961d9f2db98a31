//! Per-edit position validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Position, ProductPanelAssociation};

/// Outcome of validating one candidate position.
///
/// `warning` is advisory and never makes a position invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCheck {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PositionCheck {
    fn valid() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    fn invalid(error: String) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            warning: None,
        }
    }

    fn advisory(warning: String) -> Self {
        Self {
            is_valid: true,
            error: None,
            warning: Some(warning),
        }
    }
}

/// Validate assigning `position` to `product_id` against the associations
/// already on the panel.
///
/// `ignore_association_id` is the association being edited, so an entry
/// never collides with its own stored value.
pub fn check_position(
    position: Option<Position>,
    product_id: &str,
    existing: &[ProductPanelAssociation],
    ignore_association_id: Option<&str>,
) -> PositionCheck {
    let Some(position) = position else {
        return PositionCheck::valid();
    };

    if position <= 0 {
        return PositionCheck::invalid("position must be greater than 0".to_string());
    }

    let taken = existing.iter().any(|a| {
        a.position == Some(position)
            && a.product_id != product_id
            && Some(a.id.as_str()) != ignore_association_id
    });
    if taken {
        return PositionCheck::invalid(format!(
            "position {position} is already in use by another product"
        ));
    }

    let max = existing
        .iter()
        .filter_map(|a| a.position)
        .fold(0, Position::max);
    let after_max = max.saturating_add(1);
    if max > 0 && position > after_max {
        return PositionCheck::advisory(format!(
            "position {position} leaves a gap; consider using {after_max}"
        ));
    }

    PositionCheck::valid()
}

/// Validation messages of one editing session, keyed by product id.
///
/// Errors and warnings are tracked independently. Owned by whatever drives
/// the edit session; dropping or resetting it discards all messages.
#[derive(Debug, Default)]
pub struct PositionValidator {
    errors: HashMap<String, String>,
    warnings: HashMap<String, String>,
}

impl PositionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run [`check_position`] and record the outcome for `product_id`.
    pub fn validate(
        &mut self,
        position: Option<Position>,
        product_id: &str,
        existing: &[ProductPanelAssociation],
        ignore_association_id: Option<&str>,
    ) -> PositionCheck {
        let check = check_position(position, product_id, existing, ignore_association_id);

        match (&check.error, &check.warning) {
            (Some(error), _) => {
                self.errors.insert(product_id.to_string(), error.clone());
            }
            (None, Some(warning)) => {
                self.errors.remove(product_id);
                self.warnings.insert(product_id.to_string(), warning.clone());
            }
            (None, None) => self.clear(product_id),
        }

        check
    }

    /// Forget messages for one product.
    pub fn clear(&mut self, product_id: &str) {
        self.errors.remove(product_id);
        self.warnings.remove(product_id);
    }

    /// Forget everything (edit session discarded).
    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    pub fn error_for(&self, product_id: &str) -> Option<&str> {
        self.errors.get(product_id).map(String::as_str)
    }

    pub fn warning_for(&self, product_id: &str) -> Option<&str> {
        self.warnings.get(product_id).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn warnings(&self) -> &HashMap<String, String> {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
