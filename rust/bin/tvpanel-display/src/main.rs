//! `tvpanel-display`: terminal stand-in for a store TV.
//!
//! Usage:
//!   tvpanel-display --department <id> --panel <id> [--server <url>]
//!
//! Polls the panel view, redraws the 6×4 grid on every refresh and warns
//! when colliding positions hide products from the screen.

mod render;
mod source;

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use panel::display::{self, DisplayConfig};
use panel::layout::ConflictReport;
use panel::model::{PanelView, Product, ProductPanelAssociation};
use panel::monitor::ConflictMonitor;
use tvpanel_core::ServiceConfig;
use tvpanel_core::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_POLLING_INTERVAL_SECS};

use source::HttpViewSource;

/// TV panel display client.
#[derive(Parser, Debug)]
#[command(name = "tvpanel-display", about = "Render a TV panel in the terminal")]
struct Cli {
    /// Base URL of tvpaneld.
    #[arg(long = "server", default_value = "http://localhost:8080")]
    server: String,

    #[arg(long = "department")]
    department: String,

    #[arg(long = "panel")]
    panel: String,

    /// Seconds between fetches when the panel does not set an interval.
    #[arg(long = "polling-interval", default_value_t = DEFAULT_POLLING_INTERVAL_SECS)]
    polling_interval: u64,

    /// Debounce window for collision warnings, in milliseconds.
    #[arg(long = "debounce-ms", default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Render the first frame and exit.
    #[arg(long = "once")]
    once: bool,
}

/// Rebuild a conflict-detection snapshot from what the TV received.
fn conflict_snapshot(view: &PanelView) -> (Vec<Product>, Vec<ProductPanelAssociation>) {
    view.products
        .iter()
        .map(|p| {
            let product = Product {
                id: p.id.clone(),
                code: p.code.clone(),
                name: p.name.clone(),
                department: Some(view.department.name.clone()),
                price: p.price,
                position: None,
                active: p.active,
                unit: p.unit.clone(),
                create_at: None,
                update_at: None,
            };
            let placement =
                ProductPanelAssociation::new(p.id.clone(), p.id.clone(), view.panel.id.clone(), p.position);
            (product, placement)
        })
        .unzip()
}

fn warn_conflicts(report: &ConflictReport) {
    for conflict in &report.conflicts {
        let names: Vec<&str> = conflict.products.iter().map(|p| p.name.as_str()).collect();
        warn!(
            position = conflict.position,
            products = ?names,
            "products share a slot; only the first is shown"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig {
        polling_interval: cli.polling_interval,
        debounce_ms: cli.debounce_ms,
        ..Default::default()
    };

    let source = Arc::new(HttpViewSource::new(&cli.server, &cli.department, &cli.panel));
    let handle = display::start(
        source,
        DisplayConfig {
            fallback_interval: config.polling_interval(),
        },
    );
    info!(server = %cli.server, panel = %cli.panel, "display started");

    let monitor = ConflictMonitor::new(config.debounce()).with_callback(Arc::new(warn_conflicts));

    let mut rx = handle.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if let Some(err) = &state.last_error {
                    warn!(error = %err, "refresh failed, showing last frame");
                }
                let Some(frame) = state.frame else {
                    continue;
                };
                print!("\x1b[2J\x1b[H{}", render::render_frame(&frame));

                let (products, placements) = conflict_snapshot(&frame.view);
                if cli.once {
                    warn_conflicts(&ConflictReport::detect(&products, &placements));
                    break;
                }
                monitor.check(products, placements);
            }
        }
    }

    handle.stop();
    info!("display stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel::model::{Department, Panel, PanelConfig, PanelProduct};

    fn item(id: &str, position: Option<i64>) -> PanelProduct {
        PanelProduct {
            id: id.into(),
            code: id.into(),
            name: id.into(),
            price: 10.0,
            position,
            active: true,
            unit: None,
        }
    }

    #[test]
    fn snapshot_reports_screen_collisions() {
        let department: Department =
            serde_json::from_value(serde_json::json!({"id": "d", "name": "Açougue"})).unwrap();
        let panel: Panel =
            serde_json::from_value(serde_json::json!({"id": "p", "name": "TV", "departmentId": "d"}))
                .unwrap();
        let config = PanelConfig::for_panel(&panel, &department);
        let view = PanelView {
            panel,
            department,
            products: vec![item("a", Some(2)), item("b", Some(2)), item("c", None)],
            config,
        };

        let (products, placements) = conflict_snapshot(&view);
        assert_eq!(products.len(), 3);
        assert!(placements.iter().all(|a| a.panel_id == "p"));

        let report = ConflictReport::detect(&products, &placements);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].position, 2);
        assert_eq!(report.conflicts[0].products[0].department, "Açougue");
    }
}
