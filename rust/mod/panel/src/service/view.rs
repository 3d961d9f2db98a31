use tracing::debug;

use tvpanel_core::ServiceError;

use super::PanelService;
use crate::model::{Department, Panel, PanelConfig, PanelView};

impl PanelService {
    /// An active panel of `department_id`, with its department.
    pub(crate) fn department_panel(
        &self,
        department_id: &str,
        panel_id: &str,
    ) -> Result<(Department, Panel), ServiceError> {
        let department = self.departments.get(department_id)?;
        let panel = self
            .panels
            .find(panel_id)?
            .filter(|p| p.active && p.department_id == department_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "panel '{panel_id}' not found in department '{department_id}'"
                ))
            })?;
        Ok((department, panel))
    }

    /// What a TV shows for `panel_id` under `department_id`.
    ///
    /// Inactive panels and panels of another department are reported as
    /// missing. Only visible placements of active products are included.
    pub fn view_panel(&self, department_id: &str, panel_id: &str) -> Result<PanelView, ServiceError> {
        let (department, panel) = self.department_panel(department_id, panel_id)?;

        let products: Vec<_> = self
            .panel_products(panel_id)?
            .into_iter()
            .filter(|p| p.active)
            .collect();
        let config = PanelConfig::for_panel(&panel, &department);

        debug!(panel = panel_id, products = products.len(), "panel view built");
        Ok(PanelView {
            panel,
            department,
            products,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{department, panel, place, product, service};
    use super::*;

    #[test]
    fn view_joins_active_products_and_config() {
        let svc = service();
        let dep = department(&svc, "Açougue");
        let tv = panel(&svc, &dep.id, "TV 1");
        let a = product(&svc, "Picanha", None);
        let b = product(&svc, "Cupim", None);
        place(&svc, &tv.id, &a, Some(1));
        place(&svc, &tv.id, &b, Some(2));
        svc.update_product(&b.id, serde_json::json!({"active": false}))
            .unwrap();

        let view = svc.view_panel(&dep.id, &tv.id).unwrap();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].id, a.id);
        assert_eq!(view.config.title, "AÇOUGUE");
        assert_eq!(view.config.polling_interval, 10);
    }

    #[test]
    fn panel_title_overrides_department_name() {
        let svc = service();
        let dep = department(&svc, "Açougue");
        let tv = panel(&svc, &dep.id, "TV 1");
        svc.update_panel(&tv.id, serde_json::json!({"title": "Ofertas do dia"}))
            .unwrap();
        assert_eq!(svc.view_panel(&dep.id, &tv.id).unwrap().config.title, "Ofertas do dia");
    }

    #[test]
    fn inactive_or_foreign_panel_is_not_found() {
        let svc = service();
        let dep = department(&svc, "Açougue");
        let other = department(&svc, "Padaria");
        let tv = panel(&svc, &dep.id, "TV 1");

        assert!(matches!(svc.view_panel(&other.id, &tv.id), Err(ServiceError::NotFound(_))));

        svc.update_panel(&tv.id, serde_json::json!({"active": false}))
            .unwrap();
        assert!(matches!(svc.view_panel(&dep.id, &tv.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.view_panel("ghost", &tv.id), Err(ServiceError::NotFound(_))));
    }
}
