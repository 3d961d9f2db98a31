//! The TV-side polling loop.
//!
//! A display fetches its [`PanelView`], lays the products out on the grid
//! and publishes a [`DisplayFrame`]. The next fetch is scheduled from the
//! polling interval of the view just received.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tvpanel_core::config::DEFAULT_POLLING_INTERVAL_SECS;
use tvpanel_core::{ServiceError, now_rfc3339};

use crate::layout::{PanelStats, PositionalGrid, create_positional_grid, organize_by_position};
use crate::model::{PanelConfig, PanelView};
use crate::service::PanelService;

/// Where a display gets its data from.
#[async_trait]
pub trait PanelViewSource: Send + Sync {
    async fn fetch(&self) -> Result<PanelView, ServiceError>;
}

/// In-process source reading straight from the service.
pub struct ServiceViewSource {
    service: Arc<PanelService>,
    department_id: String,
    panel_id: String,
}

impl ServiceViewSource {
    pub fn new(
        service: Arc<PanelService>,
        department_id: impl Into<String>,
        panel_id: impl Into<String>,
    ) -> Self {
        Self {
            service,
            department_id: department_id.into(),
            panel_id: panel_id.into(),
        }
    }
}

#[async_trait]
impl PanelViewSource for ServiceViewSource {
    /// Store reads are blocking; they run on the blocking pool.
    async fn fetch(&self) -> Result<PanelView, ServiceError> {
        let service = self.service.clone();
        let department_id = self.department_id.clone();
        let panel_id = self.panel_id.clone();
        tokio::task::spawn_blocking(move || service.view_panel(&department_id, &panel_id))
            .await
            .map_err(|e| ServiceError::Internal(format!("view task failed: {e}")))?
    }
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Used when the view carries no interval (or zero).
    pub fallback_interval: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_interval: Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
        }
    }
}

/// One rendered state of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub view: PanelView,
    pub grid: PositionalGrid,
    pub stats: PanelStats,
    pub fetched_at: String,
}

impl DisplayFrame {
    pub fn build(view: PanelView) -> Self {
        let organized = organize_by_position(&view.products);
        let grid = create_positional_grid(&organized);
        let stats = PanelStats::from_products(&view.products);
        Self {
            view,
            grid,
            stats,
            fetched_at: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    /// Last successful frame. Survives failed fetches.
    pub frame: Option<DisplayFrame>,
    /// Error of the most recent fetch, cleared on success.
    pub last_error: Option<String>,
    pub fetches: u64,
}

/// Owns a running poller. Dropping it stops the loop.
pub struct DisplayHandle {
    cancel: CancellationToken,
    state: watch::Receiver<DisplayState>,
}

impl DisplayHandle {
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    pub fn current(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn interval_for(config: &PanelConfig, fallback: Duration) -> Duration {
    match config.polling_interval {
        0 => fallback,
        secs => Duration::from_secs(secs),
    }
}

/// Start polling `source`. Must be called from within a Tokio runtime.
pub fn start(source: Arc<dyn PanelViewSource>, config: DisplayConfig) -> DisplayHandle {
    let (tx, rx) = watch::channel(DisplayState::default());
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        let mut interval = config.fallback_interval;

        loop {
            let result = tokio::select! {
                _ = token.cancelled() => break,
                result = source.fetch() => result,
            };

            match result {
                Ok(view) => {
                    let next = interval_for(&view.config, config.fallback_interval);
                    if next != interval {
                        info!(
                            panel = %view.panel.id,
                            secs = next.as_secs(),
                            "polling interval changed"
                        );
                        interval = next;
                    }
                    let frame = DisplayFrame::build(view);
                    debug!(products = frame.view.products.len(), "panel view refreshed");
                    tx.send_modify(|s| {
                        s.frame = Some(frame);
                        s.last_error = None;
                        s.fetches += 1;
                    });
                }
                Err(e) => {
                    if e.is_transient() {
                        warn!(error = %e, "panel view fetch failed, keeping last frame");
                    } else {
                        error!(error = %e, "panel view rejected, keeping last frame");
                    }
                    tx.send_modify(|s| {
                        s.last_error = Some(e.to_string());
                        s.fetches += 1;
                    });
                }
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("display poller stopped");
    });

    DisplayHandle { cancel, state: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

    use crate::model::{Department, LayoutType, Panel, PanelProduct};

    struct FakeSource {
        calls: AtomicUsize,
        interval: AtomicU64,
        fail: AtomicBool,
    }

    impl FakeSource {
        fn new(interval: u64) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                interval: AtomicU64::new(interval),
                fail: AtomicBool::new(false),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn view(interval: u64) -> PanelView {
        let department = Department {
            id: "dep".into(),
            name: "Açougue".into(),
            code: "ACG".into(),
            description: None,
            color: None,
            keywords: Vec::new(),
            active: true,
            create_at: None,
            update_at: None,
        };
        let panel = Panel {
            id: "panel".into(),
            name: "TV 1".into(),
            department_id: "dep".into(),
            layout_type: LayoutType::Layout1,
            title: None,
            subtitle: None,
            footer_text: None,
            polling_interval: interval,
            is_default: true,
            display_order: 0,
            active: true,
            create_at: None,
            update_at: None,
        };
        let products = vec![
            PanelProduct {
                id: "p1".into(),
                code: "101".into(),
                name: "Picanha".into(),
                price: 79.9,
                position: Some(2),
                active: true,
                unit: Some("kg".into()),
            },
            PanelProduct {
                id: "p2".into(),
                code: "102".into(),
                name: "Cupim".into(),
                price: 39.9,
                position: None,
                active: true,
                unit: Some("kg".into()),
            },
        ];
        let config = PanelConfig::for_panel(&panel, &department);
        PanelView {
            panel,
            department,
            products,
            config,
        }
    }

    #[async_trait]
    impl PanelViewSource for FakeSource {
        async fn fetch(&self) -> Result<PanelView, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ServiceError::Unavailable("tv offline".into()));
            }
            Ok(view(self.interval.load(Ordering::SeqCst)))
        }
    }

    async fn tick(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test]
    async fn service_source_reads_the_store() {
        use crate::service::testutil::{department, panel, place, product, service};

        let svc = Arc::new(service());
        let dep = department(&svc, "Açougue");
        let tv = panel(&svc, &dep.id, "TV 1");
        let p = product(&svc, "Picanha", None);
        place(&svc, &tv.id, &p, Some(4));

        let source = ServiceViewSource::new(svc.clone(), dep.id.clone(), tv.id.clone());
        let view = source.fetch().await.unwrap();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].position, Some(4));

        let missing = ServiceViewSource::new(svc, dep.id, "ghost");
        assert!(matches!(missing.fetch().await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_on_interval() {
        let source = FakeSource::new(5);
        let handle = start(source.clone(), DisplayConfig::default());

        tick(1).await;
        assert_eq!(source.calls(), 1);

        tick(5_000).await;
        assert_eq!(source.calls(), 2);

        tick(10_000).await;
        assert_eq!(source.calls(), 4);
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_carries_the_grid() {
        let source = FakeSource::new(10);
        let handle = start(source, DisplayConfig::default());
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();

        let state = rx.borrow().clone();
        let frame = state.frame.expect("frame after first fetch");
        assert_eq!(frame.grid.len(), 24);
        assert_eq!(frame.grid.get(0).map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(frame.grid.get(1).map(|p| p.id.as_str()), Some("p1"));
        assert_eq!(frame.stats.active, 2);
        assert_eq!(frame.view.config.title, "AÇOUGUE");
        assert_eq!(state.fetches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_replaces_the_schedule() {
        let source = FakeSource::new(5);
        let _handle = start(source.clone(), DisplayConfig::default());

        tick(1).await;
        source.interval.store(20, Ordering::SeqCst);

        // Fetch at 5s picks up the 20s interval; next one is at 25s.
        tick(23_000).await;
        assert_eq!(source.calls(), 2);
        tick(2_000).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_uses_fallback() {
        let source = FakeSource::new(0);
        let config = DisplayConfig {
            fallback_interval: Duration::from_secs(3),
        };
        let _handle = start(source.clone(), config);

        tick(3_500).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_frame() {
        let source = FakeSource::new(5);
        let handle = start(source.clone(), DisplayConfig::default());

        tick(1).await;
        source.fail.store(true, Ordering::SeqCst);
        tick(5_000).await;

        let state = handle.current();
        assert!(state.frame.is_some());
        assert_eq!(state.last_error.as_deref(), Some("tv offline"));
        assert_eq!(state.fetches, 2);

        source.fail.store(false, Ordering::SeqCst);
        tick(5_000).await;
        assert!(handle.current().last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_polling() {
        let source = FakeSource::new(5);
        let handle = start(source.clone(), DisplayConfig::default());

        tick(1).await;
        handle.stop();
        assert!(handle.is_stopped());

        tick(60_000).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_halts_polling() {
        let source = FakeSource::new(5);
        let handle = start(source.clone(), DisplayConfig::default());
        tick(1).await;
        drop(handle);

        tick(60_000).await;
        assert_eq!(source.calls(), 1);
    }
}
