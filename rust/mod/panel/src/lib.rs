//! TV panel module: products placed on the 6×4 grid of in-store TV panels.
//!
//! - [`layout`] holds the pure placement logic (conflicts, validation,
//!   suggestions, the grid).
//! - [`service`] stores records in a [`tvpanel_kv::KVStore`].
//! - [`api`] exposes the service over HTTP under `/panel/v1`.
//! - [`monitor`] and [`display`] are the long-running consumers used by
//!   editors and TVs.

pub mod api;
pub mod display;
pub mod keywords;
pub mod layout;
pub mod model;
pub mod monitor;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use tvpanel_core::Module;

use service::PanelService;

/// Department TV panels and their product layout.
pub struct PanelModule {
    service: Arc<PanelService>,
}

impl PanelModule {
    pub fn new(service: PanelService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Shared handle for in-process consumers such as a display poller.
    pub fn service(&self) -> Arc<PanelService> {
        self.service.clone()
    }
}

impl Module for PanelModule {
    fn name(&self) -> &str {
        "panel"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
