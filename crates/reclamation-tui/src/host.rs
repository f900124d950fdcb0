use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

/// Lifecycle signals understood by the container that embeds the form.
pub trait HostContainer: Send {
    /// The page has finished loading.
    fn ready(&self);
    /// Ask for the whole viewport.
    fn expand(&self);
    /// Dismiss the page.
    fn close(&self);
}

/// The terminal session the form runs in.
///
/// `close` raises a flag the event loop polls; the other two signals only
/// record that they happened.
#[derive(Debug, Clone, Default)]
pub struct TerminalHost {
    ready: Arc<AtomicBool>,
    expanded: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::SeqCst)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested.load(Ordering::SeqCst)
    }
}

impl HostContainer for TerminalHost {
    fn ready(&self) {
        info!("host: page ready");
        self.ready.store(true, Ordering::SeqCst);
    }

    fn expand(&self) {
        info!("host: expand to full viewport");
        self.expanded.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        info!("host: close requested");
        self.close_requested.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_signals() {
        let host = TerminalHost::new();
        let handle = host.clone();
        assert!(!handle.close_requested());

        host.ready();
        host.expand();
        host.close();

        assert!(handle.is_ready());
        assert!(handle.is_expanded());
        assert!(handle.close_requested());
    }
}
