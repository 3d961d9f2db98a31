use tracing::info;

use tvpanel_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use super::{PanelService, required};
use crate::keywords::clean_keywords;
use crate::model::{CreateDepartment, Department};

impl PanelService {
    pub fn create_department(&self, input: CreateDepartment) -> Result<Department, ServiceError> {
        let now = now_rfc3339();
        let department = Department {
            id: new_id(),
            name: required("name", &input.name)?,
            code: input.code.trim().to_string(),
            description: input.description,
            color: input.color,
            keywords: clean_keywords(input.keywords),
            active: true,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };
        self.departments.insert(&department)?;
        info!(id = %department.id, name = %department.name, "department created");
        Ok(department)
    }

    pub fn get_department(&self, id: &str) -> Result<Department, ServiceError> {
        self.departments.get(id)
    }

    pub fn list_departments(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Department>, ServiceError> {
        let mut all = self.departments.all()?;
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ListResult::paginate(all, params))
    }

    /// Editing `keywords` re-syncs the default panel; an `exactMatch` flag
    /// in the patch picks the matching mode (exact when absent).
    pub fn update_department(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Department, ServiceError> {
        let current = self.departments.get(id)?;
        let keywords_changed = patch.get("keywords").is_some();
        let exact_match = patch
            .get("exactMatch")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true);

        let mut updated: Department = Self::apply_patch(&current, patch)?;
        updated.name = required("name", &updated.name)?;
        updated.keywords = clean_keywords(updated.keywords);
        self.departments.put(&updated)?;

        if keywords_changed {
            if let Some(sync) = self.resync_default_panel(&updated, exact_match)? {
                info!(id, removed = sync.removed_count, added = sync.added_count, "default panel resynced");
            }
        }
        Ok(updated)
    }

    /// Refused while any panel still belongs to the department.
    pub fn delete_department(&self, id: &str) -> Result<(), ServiceError> {
        self.departments.get(id)?;
        let panels = self.panels.filter(|p| p.department_id == id)?;
        if !panels.is_empty() {
            return Err(ServiceError::Conflict(format!(
                "department '{}' still has {} panel(s)",
                id,
                panels.len()
            )));
        }
        self.departments.remove(id)?;
        info!(id, "department deleted");
        Ok(())
    }
}
