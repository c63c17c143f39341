//! Single-slot, auto-dismissing notifications.
//!
//! # Design
//! A `ToastChannel` holds at most one live `Toast`. `show` replaces whatever
//! is displayed and schedules a dismissal timer on the current tokio runtime;
//! the superseded toast's timer is aborted, and each timer also checks the
//! toast id before clearing so a late wakeup is a no-op. `dismiss` clears the
//! slot and cancels the pending timer.
//!
//! Channels are cheap to clone and are normally passed explicitly. Code that
//! cannot be handed one can use the process-wide fallback: `register` a
//! channel once at startup and call `toast::show`. Before registration that
//! call only logs.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::sync::{lock, read, write};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Increases with every `show` on the same channel.
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub dismiss_at: Instant,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Toast>,
    last_id: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone)]
pub struct ToastChannel {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastChannel {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Display `text`, replacing any current toast. Returns the new toast id.
    pub fn show(&self, text: impl Into<String>, severity: Severity) -> u64 {
        let text = text.into();
        let created_at = Instant::now();

        let mut slot = lock(&self.slot);
        slot.last_id += 1;
        let id = slot.last_id;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        debug!(id, severity = %severity, text = %text, "showing toast");
        slot.current = Some(Toast {
            id,
            text,
            severity,
            created_at,
            dismiss_at: created_at + self.duration,
        });
        slot.timer = self.schedule_dismiss(id);
        id
    }

    /// Clear the current toast and cancel its timer.
    pub fn dismiss(&self) {
        let mut slot = lock(&self.slot);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if let Some(toast) = slot.current.take() {
            debug!(id = toast.id, "toast dismissed");
        }
    }

    pub fn current(&self) -> Option<Toast> {
        lock(&self.slot).current.clone()
    }

    fn schedule_dismiss(&self, id: u64) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            warn!(id, "no async runtime; toast stays until dismissed");
            return None;
        };
        let slot = Arc::clone(&self.slot);
        let duration = self.duration;
        Some(handle.spawn(async move {
            sleep(duration).await;
            expire(&slot, id);
        }))
    }
}

fn expire(slot: &Mutex<Slot>, id: u64) {
    let mut slot = lock(slot);
    if slot.current.as_ref().is_some_and(|toast| toast.id == id) {
        slot.current = None;
        slot.timer = None;
        debug!(id, "toast expired");
    }
}

static AMBIENT: RwLock<Option<ToastChannel>> = RwLock::new(None);

/// Install `channel` as the process-wide fallback used by [`show`].
pub fn register(channel: ToastChannel) {
    *write(&AMBIENT) = Some(channel);
}

pub fn unregister() {
    *write(&AMBIENT) = None;
}

pub fn registered() -> Option<ToastChannel> {
    read(&AMBIENT).clone()
}

/// Show on the registered channel, or just log when none is registered.
pub fn show(text: &str, severity: Severity) -> Option<u64> {
    match registered() {
        Some(channel) => Some(channel.show(text, severity)),
        None => {
            info!("[Toast {}]: {text}", severity.as_str().to_uppercase());
            None
        }
    }
}
