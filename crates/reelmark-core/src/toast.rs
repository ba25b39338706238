use reelmark_models::{Toast, ToastKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);

struct ToastInner {
    sender: watch::Sender<Option<Toast>>,
    generation: AtomicU64,
    opened: AtomicU64,
    ttl: Duration,
}

/// Single-slot notification channel.
///
/// Opening a toast replaces whatever is showing and restarts the expiry timer.
/// Each toast carries a generation number so a stale timer never clears a
/// newer toast.
#[derive(Clone)]
pub struct ToastChannel {
    inner: Arc<ToastInner>,
}

impl ToastChannel {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(ToastInner {
                sender,
                generation: AtomicU64::new(0),
                opened: AtomicU64::new(0),
                ttl,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub fn open_toast(&self, toast: Toast) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        match toast.kind {
            ToastKind::Error => warn!("Toast: {}", toast.message),
            ToastKind::Success => info!("Toast: {}", toast.message),
        }
        self.inner.sender.send_replace(Some(toast));

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime for toast expiry; toast stays until replaced");
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(inner.ttl).await;
            inner.expire(generation);
        });
    }

    /// Toast currently showing, if any
    pub fn current(&self) -> Option<Toast> {
        self.inner.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.inner.sender.subscribe()
    }

    pub fn dismiss(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.sender.send_replace(None);
    }

    /// Number of toasts opened so far
    pub fn opened(&self) -> u64 {
        self.inner.opened.load(Ordering::SeqCst)
    }
}

impl ToastInner {
    /// Clear the toast opened as `generation` unless a newer one replaced it.
    ///
    /// The check runs under the channel's lock. `open_toast` bumps the
    /// generation before sending, so a newer toast is never cleared here.
    fn expire(&self, generation: u64) -> bool {
        self.sender.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation || current.is_none() {
                return false;
            }
            *current = None;
            true
        })
    }
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}
