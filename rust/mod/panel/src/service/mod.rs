pub mod association;
pub mod department;
pub mod layout;
pub mod panel;
pub mod product;
pub mod sync;
pub mod view;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use tvpanel_core::{ServiceError, merge_patch, now_rfc3339};
use tvpanel_kv::KVStore;

use crate::model::{Department, Panel, Product, ProductPanelAssociation};
use crate::store::Collection;

pub use association::AddProductsResult;
pub use layout::{PositionSuggestions, ValidatePositionRequest};
pub use sync::{AutoCategorizeRequest, AutoCategorizeResult, SyncRequest, SyncResult};

/// Owns the KV store and the business rules around
/// products, departments, panels and their placements.
pub struct PanelService {
    pub(crate) products: Collection<Product>,
    pub(crate) departments: Collection<Department>,
    pub(crate) panels: Collection<Panel>,
    pub(crate) associations: Collection<ProductPanelAssociation>,
}

impl PanelService {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            products: Collection::new(kv.clone()),
            departments: Collection::new(kv.clone()),
            panels: Collection::new(kv.clone()),
            associations: Collection::new(kv),
        }
    }

    /// Apply a JSON merge-patch to a record.
    ///
    /// `id` and `createAt` cannot be patched; `updateAt` is always bumped.
    pub(crate) fn apply_patch<T: Serialize + DeserializeOwned>(
        current: &T,
        patch: serde_json::Value,
    ) -> Result<T, ServiceError> {
        let mut json =
            serde_json::to_value(current).map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut patch = patch;
        let Some(obj) = patch.as_object_mut() else {
            return Err(ServiceError::Validation("patch must be a JSON object".into()));
        };
        obj.remove("id");
        obj.remove("createAt");
        obj.insert("updateAt".into(), serde_json::json!(now_rfc3339()));

        merge_patch(&mut json, &patch);
        serde_json::from_value(json).map_err(|e| ServiceError::Validation(e.to_string()))
    }
}

/// Trimmed value of a required text field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
