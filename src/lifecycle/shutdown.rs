//! Stopping the HTTP server and the health monitor together.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals;

/// Stop switch shared by the load balancer's long-running tasks.
///
/// `HttpServer::run` hands one receiver to axum's graceful shutdown and a
/// second one to the health monitor. A single `trigger` stops both.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// A receiver for one task. Only triggers sent after this call are seen.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Stop every subscribed task. Returns false if nothing was listening.
    pub fn trigger(&self) -> bool {
        self.notify.send(()).is_ok()
    }

    /// Trigger once the process receives Ctrl+C or SIGTERM.
    pub fn trigger_on_signal(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            signals::wait_for_shutdown_signal().await;
            if !shutdown.trigger() {
                tracing::warn!("Shutdown signal received with no running tasks");
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_stops_server_and_monitor() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut monitor = server.resubscribe();

        assert!(shutdown.trigger());

        assert!(server.recv().await.is_ok());
        assert!(monitor.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_clone_triggers_original_subscribers() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();

        shutdown.clone().trigger();

        assert!(server.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers() {
        assert!(!Shutdown::new().trigger());
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_trigger() {
        let shutdown = Shutdown::new();
        let _early = shutdown.subscribe();
        shutdown.trigger();

        let mut late = shutdown.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signal_waiter_idles_until_signal() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();

        let waiter = shutdown.trigger_on_signal();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!waiter.is_finished());
        assert!(server.try_recv().is_err());
        waiter.abort();
    }
}
