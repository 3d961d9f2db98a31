use tracing::info;

use tvpanel_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use super::{PanelService, required};
use crate::model::{CreateProduct, Product};

impl PanelService {
    pub fn create_product(&self, input: CreateProduct) -> Result<Product, ServiceError> {
        let now = now_rfc3339();
        let product = Product {
            id: new_id(),
            code: required("code", &input.code)?,
            name: required("name", &input.name)?,
            department: input.department,
            price: input.price,
            position: input.position,
            active: input.active,
            unit: input.unit,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };
        self.products.insert(&product)?;
        info!(id = %product.id, code = %product.code, "product created");
        Ok(product)
    }

    pub fn get_product(&self, id: &str) -> Result<Product, ServiceError> {
        self.products.get(id)
    }

    /// Products ordered by name, then code.
    pub fn list_products(&self, params: &ListParams) -> Result<ListResult<Product>, ServiceError> {
        let mut all = self.products.all()?;
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        Ok(ListResult::paginate(all, params))
    }

    pub fn update_product(&self, id: &str, patch: serde_json::Value) -> Result<Product, ServiceError> {
        let current = self.products.get(id)?;
        let mut updated: Product = Self::apply_patch(&current, patch)?;
        updated.code = required("code", &updated.code)?;
        updated.name = required("name", &updated.name)?;
        self.products.put(&updated)?;
        Ok(updated)
    }

    /// Delete a product and detach it from every panel.
    pub fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        self.products.get(id)?;
        let attached = self.associations.filter(|a| a.product_id == id)?;
        self.associations
            .remove_many(attached.iter().map(|a| a.id.as_str()))?;
        self.products.remove(id)?;
        info!(id, detached = attached.len(), "product deleted");
        Ok(())
    }
}
