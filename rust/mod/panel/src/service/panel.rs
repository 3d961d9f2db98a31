use tracing::info;

use tvpanel_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use super::{PanelService, required};
use crate::model::{CreatePanel, Panel};

pub(super) fn by_display_order(panels: &mut [Panel]) {
    panels.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

impl PanelService {
    pub fn create_panel(&self, input: CreatePanel) -> Result<Panel, ServiceError> {
        let name = required("name", &input.name)?;
        let department_id = required("departmentId", &input.department_id)?;
        self.departments.get(&department_id)?;

        let now = now_rfc3339();
        let panel = Panel {
            id: new_id(),
            name,
            department_id,
            layout_type: input.layout_type,
            title: input.title,
            subtitle: input.subtitle,
            footer_text: input.footer_text,
            polling_interval: input.polling_interval,
            is_default: input.is_default,
            display_order: input.display_order,
            active: true,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };
        self.panels.insert(&panel)?;
        info!(id = %panel.id, department = %panel.department_id, "panel created");
        Ok(panel)
    }

    pub fn get_panel(&self, id: &str) -> Result<Panel, ServiceError> {
        self.panels.get(id)
    }

    pub fn list_panels(&self, params: &ListParams) -> Result<ListResult<Panel>, ServiceError> {
        let mut all = self.panels.all()?;
        by_display_order(&mut all);
        Ok(ListResult::paginate(all, params))
    }

    /// Panels of one department in display order.
    pub fn list_department_panels(&self, department_id: &str) -> Result<Vec<Panel>, ServiceError> {
        self.departments.get(department_id)?;
        let mut panels = self.panels.filter(|p| p.department_id == department_id)?;
        by_display_order(&mut panels);
        Ok(panels)
    }

    pub fn update_panel(&self, id: &str, patch: serde_json::Value) -> Result<Panel, ServiceError> {
        let current = self.panels.get(id)?;
        let mut updated: Panel = Self::apply_patch(&current, patch)?;
        updated.name = required("name", &updated.name)?;
        if updated.department_id != current.department_id {
            self.departments.get(&updated.department_id)?;
        }
        self.panels.put(&updated)?;
        Ok(updated)
    }

    /// Delete a panel together with its product placements.
    pub fn delete_panel(&self, id: &str) -> Result<(), ServiceError> {
        self.panels.get(id)?;
        let placements = self.associations.filter(|a| a.panel_id == id)?;
        self.associations
            .remove_many(placements.iter().map(|a| a.id.as_str()))?;
        self.panels.remove(id)?;
        info!(id, detached = placements.len(), "panel deleted");
        Ok(())
    }
}
