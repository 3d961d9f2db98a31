//! Debounced conflict detection for editing sessions.
//!
//! Every edit calls [`ConflictMonitor::check`] with the latest snapshot.
//! Calls inside the debounce window supersede each other; only the last
//! one computes and publishes. Dropping the monitor cancels whatever is
//! still pending.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::layout::ConflictReport;
use crate::model::{Product, ProductPanelAssociation};

/// Called once per published detection result.
pub type DetectedFn = Arc<dyn Fn(&ConflictReport) + Send + Sync>;

/// What subscribers see. Replaced as a whole on every publish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictState {
    pub report: ConflictReport,
    /// A computation is scheduled and has not published yet.
    pub checking: bool,
}

#[derive(Default)]
struct Pending {
    generation: u64,
    cancel: Option<CancellationToken>,
}

pub struct ConflictMonitor {
    debounce: Duration,
    state: Arc<watch::Sender<ConflictState>>,
    pending: Arc<Mutex<Pending>>,
    on_detected: Option<DetectedFn>,
}

impl ConflictMonitor {
    pub fn new(debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(ConflictState::default());
        Self {
            debounce,
            state: Arc::new(tx),
            pending: Arc::new(Mutex::new(Pending::default())),
            on_detected: None,
        }
    }

    /// Register a callback fired after each published result.
    pub fn with_callback(mut self, on_detected: DetectedFn) -> Self {
        self.on_detected = Some(on_detected);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ConflictState> {
        self.state.subscribe()
    }

    /// Last published report.
    pub fn latest(&self) -> ConflictReport {
        self.state.borrow().report.clone()
    }

    pub fn is_checking(&self) -> bool {
        self.state.borrow().checking
    }

    /// Schedule detection over a new snapshot, replacing any pending one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn check(&self, products: Vec<Product>, associations: Vec<ProductPanelAssociation>) {
        let token = CancellationToken::new();
        let generation = {
            let mut pending = lock(&self.pending);
            if let Some(previous) = pending.cancel.replace(token.clone()) {
                previous.cancel();
            }
            pending.generation += 1;
            pending.generation
        };
        self.state.send_modify(|s| s.checking = true);

        let debounce = self.debounce;
        let state = Arc::clone(&self.state);
        let pending = Arc::clone(&self.pending);
        let on_detected = self.on_detected.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "conflict check superseded");
                    return;
                }
                _ = tokio::time::sleep(debounce) => {}
            }

            let report = ConflictReport::detect(&products, &associations);

            {
                // Publishing under the lock keeps a concurrent `check` or
                // `cancel` from interleaving with a stale result.
                let mut pending = lock(&pending);
                if pending.generation != generation {
                    return;
                }
                pending.cancel = None;
                state.send_replace(ConflictState {
                    report: report.clone(),
                    checking: false,
                });
            }

            debug!(
                generation,
                conflicts = report.conflicts.len(),
                "conflict check published"
            );
            if let Some(callback) = on_detected {
                callback(&report);
            }
        });
    }

    /// Drop any pending computation. The last published report stays.
    pub fn cancel(&self) {
        let mut pending = lock(&self.pending);
        if let Some(token) = pending.cancel.take() {
            token.cancel();
        }
        pending.generation += 1;
        self.state.send_modify(|s| s.checking = false);
    }
}

impl Drop for ConflictMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::model::Position;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            code: id.into(),
            name: id.into(),
            department: None,
            price: 0.0,
            position: None,
            active: true,
            unit: None,
            create_at: None,
            update_at: None,
        }
    }

    fn assoc(id: &str, product_id: &str, position: Position) -> ProductPanelAssociation {
        ProductPanelAssociation::new(id, product_id, "panel", Some(position))
    }

    fn counting_monitor(debounce_ms: u64) -> (ConflictMonitor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let monitor = ConflictMonitor::new(Duration::from_millis(debounce_ms)).with_callback(
            Arc::new(move |_: &ConflictReport| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (monitor, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_checks_publish_only_the_last() {
        let (monitor, calls) = counting_monitor(300);
        let products = vec![product("a"), product("b")];

        monitor.check(products.clone(), vec![assoc("1", "a", 1), assoc("2", "b", 2)]);
        tokio::time::sleep(Duration::from_millis(100)).await;
        monitor.check(products.clone(), vec![assoc("1", "a", 4), assoc("2", "b", 4)]);
        assert!(monitor.is_checking());

        tokio::time::sleep(Duration::from_millis(250)).await;
        // First check would have fired at 300ms; it was superseded.
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let state = monitor.subscribe().borrow().clone();
        assert!(!state.checking);
        assert_eq!(state.report.conflicts.len(), 1);
        assert_eq!(state.report.conflicts[0].position, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_the_published_state() {
        let (monitor, _calls) = counting_monitor(50);
        let mut rx = monitor.subscribe();

        monitor.check(vec![product("a"), product("b")], vec![assoc("1", "a", 2), assoc("2", "b", 2)]);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().checking);

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert!(!state.checking);
        assert!(state.report.has_conflicts());
        assert_eq!(monitor.latest(), state.report);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_check() {
        let (monitor, calls) = counting_monitor(300);
        monitor.check(vec![product("a"), product("b")], vec![assoc("1", "a", 1), assoc("2", "b", 1)]);
        monitor.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!monitor.is_checking());
        assert!(!monitor.latest().has_conflicts());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_pending_check() {
        let (monitor, calls) = counting_monitor(300);
        monitor.check(vec![product("a"), product("b")], vec![assoc("1", "a", 1), assoc("2", "b", 1)]);
        drop(monitor);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_checks_each_publish() {
        let (monitor, calls) = counting_monitor(300);
        monitor.check(vec![product("a")], vec![assoc("1", "a", 1)]);
        tokio::time::sleep(Duration::from_millis(400)).await;
        monitor.check(vec![product("a")], vec![assoc("1", "a", 2)]);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
