//! Network reachability signal
//!
//! Purely reactive: the platform driver reports flips via
//! [`ConnectivityMonitor::set_online`]; consumers read the current
//! value or watch for changes. Best-effort only, never fails.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Shared connectivity state
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Monitor with the given initial reachability
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    /// Current reachability
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Record a platform reachability flip.
    ///
    /// Emits no notification when the value is unchanged.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(
                "network {}",
                if online { "reachable" } else { "unreachable" }
            );
        }
    }

    /// Subscribe to reachability changes
    pub fn changes(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flip_notifies_watchers() {
        let monitor = ConnectivityMonitor::new(true);
        let mut changes = monitor.changes();
        assert!(monitor.is_online());

        monitor.set_online(false);
        changes.changed().await.unwrap();
        assert!(!*changes.borrow());
        assert!(!monitor.is_online());
    }

    #[tokio::test]
    async fn test_redundant_set_is_silent() {
        let monitor = ConnectivityMonitor::new(true);
        let mut changes = monitor.changes();
        changes.mark_unchanged();

        monitor.set_online(true);
        assert!(!changes.has_changed().unwrap());

        monitor.set_online(false);
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let monitor = ConnectivityMonitor::new(true);
        let other = monitor.clone();

        other.set_online(false);
        assert!(!monitor.is_online());
    }
}
