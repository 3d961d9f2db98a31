//! Startup checks run before the server accepts requests.

use tracing::{info, warn};

use panel::model::Panel;
use panel::service::PanelService;
use tvpanel_core::ListParams;
use tvpanel_core::types::MAX_PAGE_SIZE;

/// Log every panel whose placements collide. Returns the number of
/// panels with at least one conflict.
pub fn audit_layouts(service: &PanelService) -> anyhow::Result<usize> {
    let mut params = ListParams {
        limit: MAX_PAGE_SIZE,
        offset: 0,
    };
    let mut audited = 0;
    let mut conflicted = 0;
    loop {
        let page = service.list_panels(&params)?;
        for panel in &page.items {
            if audit_panel(service, panel)? {
                conflicted += 1;
            }
        }
        audited += page.items.len();
        if page.items.is_empty() || audited >= page.total {
            break;
        }
        params.offset += page.items.len();
    }

    info!(panels = audited, conflicted, "layout audit finished");
    Ok(conflicted)
}

/// Warn about each conflict of one panel; true when it has any.
fn audit_panel(service: &PanelService, panel: &Panel) -> anyhow::Result<bool> {
    let report = service.panel_conflicts(&panel.id)?;
    for conflict in &report.conflicts {
        let names: Vec<&str> = conflict.products.iter().map(|p| p.name.as_str()).collect();
        warn!(
            panel = %panel.name,
            position = conflict.position,
            products = ?names,
            "position conflict"
        );
    }
    Ok(report.has_conflicts())
}
